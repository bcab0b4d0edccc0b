use crate::core_shellcommand::error::ShellError;
use crate::core_shellcommand::shellcommand::ShellCommand;
use crate::session::{Connection, Session};
use log::{error, warn};

/// Parses one command line and runs it.
///
/// Returns the bytes to send back to the client. Every error that leaves the
/// connection usable is turned into a response here; only fatal errors are
/// returned as `Err`, and they end the session.
pub async fn dispatch<S: Connection>(
    session: &mut Session<S>,
    line: &str,
) -> Result<Vec<u8>, ShellError> {
    let args: Vec<&str> = line.split_whitespace().collect();

    let result = match args.first().and_then(|name| ShellCommand::from_str(name)) {
        None => Err(ShellError::UnknownCommand),
        Some(command) if !command.accepts(args.len()) => Err(ShellError::Usage(command.usage())),
        Some(command) => run_command(command, session, &args).await,
    };

    match result {
        Ok(response) => Ok(response),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            match &e {
                ShellError::Sandbox(_) => warn!("[{}] {}: {}", session.peer(), line, e),
                ShellError::Io(_) | ShellError::Transfer(_) => {
                    error!("[{}] {}: {}", session.peer(), line, e)
                }
                _ => warn!("[{}] Rejected command {:?}: {}", session.peer(), line, e),
            }
            Ok(e.to_shell_response().into_bytes())
        }
    }
}

async fn run_command<S: Connection>(
    command: ShellCommand,
    session: &mut Session<S>,
    args: &[&str],
) -> Result<Vec<u8>, ShellError> {
    match command {
        ShellCommand::CD => crate::core_shellcommand::cd::handle_cd_command(session, args).await,
        ShellCommand::LS => crate::core_shellcommand::ls::handle_ls_command(session, args).await,
        ShellCommand::CP => crate::core_shellcommand::cp::handle_cp_command(session, args).await,
        ShellCommand::UL => crate::core_shellcommand::ul::handle_ul_command(session, args).await,
        ShellCommand::DL => crate::core_shellcommand::dl::handle_dl_command(session, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_sandbox::Sandbox;
    use crate::session::SessionState;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tokio::io::{duplex, DuplexStream};

    fn session_in(root: &Path) -> (Session<DuplexStream>, DuplexStream) {
        let (client, server) = duplex(64 * 1024);
        let sandbox = Arc::new(Sandbox::new(root));
        (Session::new(server, sandbox, 1024, "test"), client)
    }

    #[tokio::test]
    async fn test_unknown_and_empty_commands() {
        let dir = tempdir().unwrap();
        let (mut session, _client) = session_in(dir.path());

        assert_eq!(dispatch(&mut session, "foo bar").await.unwrap(), b"unknown command\n");
        assert_eq!(dispatch(&mut session, "").await.unwrap(), b"unknown command\n");
        assert_eq!(dispatch(&mut session, "   ").await.unwrap(), b"unknown command\n");
        assert_eq!(session.state(), SessionState::AwaitingCommand);
    }

    #[tokio::test]
    async fn test_wrong_argument_counts_change_nothing() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let (mut session, _client) = session_in(dir.path());

        let cases = [
            ("cd", "cd <path>\n"),
            ("cd sub extra", "cd <path>\n"),
            ("ls -l sub extra", "ls [-l] [path]\n"),
            ("ls sub extra", "ls [-l] [path]\n"),
            ("cp a.txt", "cp <dst> <src>\n"),
            ("cp b.txt a.txt extra", "cp <dst> <src>\n"),
            ("ul sub", "ul <destDir> <srcName>\n"),
            ("dl a.txt", "dl <dstName> <srcPath>\n"),
        ];
        for (line, usage) in cases {
            let response = dispatch(&mut session, line).await.unwrap();
            assert_eq!(String::from_utf8(response).unwrap(), usage, "{}", line);
        }

        assert_eq!(session.current_dir(), Path::new("."));
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "sub"]);
    }
}
