use crate::core_sandbox::SandboxError;
use crate::core_shellcommand::error::ShellError;
use crate::core_shellcommand::utils::file_name_of;
use crate::core_transfer::{drain_frame, receive_file, TransferDirection};
use crate::session::{Connection, Session, SessionState};
use log::info;
use std::path::PathBuf;
use tokio::fs;

/// Handles `ul <destDir> <srcName>`; a transfer frame follows the command line.
///
/// The frame is consumed in every case, so a rejected upload still leaves the
/// connection at the start of the next command line.
pub async fn handle_ul_command<S: Connection>(
    session: &mut Session<S>,
    args: &[&str],
) -> Result<Vec<u8>, ShellError> {
    let (dest_dir, src_name) = (args[1], args[2]);

    session.set_state(SessionState::InTransfer(TransferDirection::Receive));
    let result = receive_upload(session, dest_dir, src_name).await;
    session.set_state(SessionState::AwaitingCommand);

    result.map(|_| Vec::new())
}

async fn receive_upload<S: Connection>(
    session: &mut Session<S>,
    dest_dir: &str,
    src_name: &str,
) -> Result<(), ShellError> {
    let target = match upload_target(session, dest_dir, src_name).await {
        Ok(target) => target,
        Err(e) => {
            drain_frame(session.stream_mut()).await?;
            return Err(e);
        }
    };

    let received = receive_file(session.stream_mut(), &target).await?;
    info!(
        "[{}] Upload of {} bytes to {:?} complete",
        session.peer(),
        received,
        target
    );
    Ok(())
}

async fn upload_target<S: Connection>(
    session: &Session<S>,
    dest_dir: &str,
    src_name: &str,
) -> Result<PathBuf, ShellError> {
    let resolved = session.sandbox().resolve(session.current_dir(), dest_dir)?;
    if !fs::metadata(resolved.absolute()).await?.is_dir() {
        return Err(ShellError::NotADirectory(dest_dir.to_string()));
    }

    let name = file_name_of(src_name).ok_or_else(|| ShellError::InvalidFileName(src_name.to_string()))?;
    let target = resolved.absolute().join(name);
    if !session.sandbox().contains(&target) {
        return Err(SandboxError::Violation(src_name.to_string()).into());
    }
    Ok(target)
}
