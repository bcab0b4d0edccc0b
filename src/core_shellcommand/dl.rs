use crate::core_shellcommand::error::ShellError;
use crate::core_transfer::{send_file, write_abort, TransferDirection};
use crate::session::{Connection, Session, SessionState};
use log::info;
use std::path::PathBuf;
use tokio::fs;

/// Handles `dl <dstName> <srcPath>`; the file goes back as a transfer frame.
///
/// `dstName` only matters to the client. When the source is rejected the frame
/// is ended with ABORT and the reason follows as a normal response.
pub async fn handle_dl_command<S: Connection>(
    session: &mut Session<S>,
    args: &[&str],
) -> Result<Vec<u8>, ShellError> {
    let src = args[2];

    session.set_state(SessionState::InTransfer(TransferDirection::Send));
    let result = send_download(session, src).await;
    session.set_state(SessionState::AwaitingCommand);

    result.map(|_| Vec::new())
}

async fn send_download<S: Connection>(session: &mut Session<S>, src: &str) -> Result<(), ShellError> {
    let source = match download_source(session, src).await {
        Ok(source) => source,
        Err(e) => {
            write_abort(session.stream_mut()).await?;
            return Err(e);
        }
    };

    let chunk_size = session.chunk_size();
    let sent = send_file(session.stream_mut(), &source, chunk_size).await?;
    info!(
        "[{}] Download of {} bytes from {:?} complete",
        session.peer(),
        sent,
        source
    );
    Ok(())
}

async fn download_source<S: Connection>(session: &Session<S>, src: &str) -> Result<PathBuf, ShellError> {
    let resolved = session.sandbox().resolve(session.current_dir(), src)?;
    if !fs::metadata(resolved.absolute()).await?.is_file() {
        return Err(ShellError::NotAFile(src.to_string()));
    }
    Ok(resolved.absolute().to_path_buf())
}
