use crate::core_shellcommand::error::ShellError;
use crate::session::{Connection, Session};
use log::info;
use tokio::fs;

/// Handles `cd <path>`.
///
/// The target must resolve inside the root and be an existing directory.
/// On any failure the current directory is left as it was.
pub async fn handle_cd_command<S: Connection>(
    session: &mut Session<S>,
    args: &[&str],
) -> Result<Vec<u8>, ShellError> {
    let target = args[1];
    let resolved = session.sandbox().resolve(session.current_dir(), target)?;

    let metadata = fs::metadata(resolved.absolute()).await?;
    if !metadata.is_dir() {
        return Err(ShellError::NotADirectory(target.to_string()));
    }

    info!(
        "[{}] Directory successfully changed to: {:?}",
        session.peer(),
        resolved.relative()
    );
    session.set_current_dir(resolved.into_relative());
    Ok(Vec::new())
}
