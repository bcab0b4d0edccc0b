use crate::core_shellcommand::error::ShellError;
use crate::core_shellcommand::shellcommand::ShellCommand;
use crate::core_shellcommand::utils::format_mode;
use crate::session::{Connection, Session};
use log::{info, warn};
use tokio::fs;

/// Handles `ls [-l] [path]`.
///
/// Plain mode puts every name followed by a tab on one line. Long mode prints
/// one `mode\tsize\tname` line per entry. Entries are sorted by name.
pub async fn handle_ls_command<S: Connection>(
    session: &mut Session<S>,
    args: &[&str],
) -> Result<Vec<u8>, ShellError> {
    let (long, target) = match args {
        [_] => (false, "."),
        [_, "-l"] => (true, "."),
        [_, path] => (false, *path),
        [_, "-l", path] => (true, *path),
        _ => return Err(ShellError::Usage(ShellCommand::LS.usage())),
    };

    let resolved = session.sandbox().resolve(session.current_dir(), target)?;
    info!("[{}] Listing {:?}", session.peer(), resolved.relative());

    let mut entries = Vec::new();
    let mut dir = fs::read_dir(resolved.absolute()).await?;
    while let Some(entry) = dir.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    "Failed to get metadata for entry: {:?}, error: {:?}",
                    entry.path(),
                    e
                );
                continue;
            }
        };
        entries.push((entry.file_name().to_string_lossy().into_owned(), metadata));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut listing = String::new();
    if long {
        for (name, metadata) in &entries {
            listing.push_str(&format!(
                "{}\t{}\t{}\n",
                format_mode(metadata),
                metadata.len(),
                name
            ));
        }
    } else {
        for (name, _) in &entries {
            listing.push_str(name);
            listing.push('\t');
        }
        listing.push('\n');
    }

    Ok(listing.into_bytes())
}
