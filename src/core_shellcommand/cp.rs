use crate::core_sandbox::SandboxError;
use crate::core_shellcommand::error::ShellError;
use crate::core_shellcommand::utils::same_file;
use crate::session::{Connection, Session};
use log::{debug, info};
use tokio::fs::{self, File};
use tokio::io::{self, AsyncWriteExt};

/// Handles `cp <dst> <src>`, overwriting `dst` if it exists.
pub async fn handle_cp_command<S: Connection>(
    session: &mut Session<S>,
    args: &[&str],
) -> Result<Vec<u8>, ShellError> {
    let (dst, src) = (args[1], args[2]);

    let source = session.sandbox().resolve(session.current_dir(), src)?;
    let target = session.sandbox().resolve(session.current_dir(), dst)?;
    let parent_inside = target
        .absolute()
        .parent()
        .map(|parent| session.sandbox().contains(parent))
        .unwrap_or(false);
    if !parent_inside {
        return Err(SandboxError::Violation(dst.to_string()).into());
    }

    let source_meta = fs::metadata(source.absolute()).await?;
    if !source_meta.is_file() {
        return Err(ShellError::NotAFile(src.to_string()));
    }

    // Creating the target would truncate the source if both are one file.
    if let Ok(target_meta) = fs::metadata(target.absolute()).await {
        if same_file(source.absolute(), &source_meta, target.absolute(), &target_meta) {
            debug!("[{}] {} and {} are the same file", session.peer(), dst, src);
            return Ok(Vec::new());
        }
    }

    let mut reader = File::open(source.absolute()).await?;
    let mut writer = File::create(target.absolute()).await?;
    let copied = io::copy(&mut reader, &mut writer).await?;
    writer.flush().await?;

    info!(
        "[{}] Copied {} bytes from {:?} to {:?}",
        session.peer(),
        copied,
        source.relative(),
        target.relative()
    );
    Ok(Vec::new())
}
