use crate::constants::{MAX_LINE_LENGTH, PROMPT_DELIMITER};
use crate::core_sandbox::Sandbox;
use crate::core_shellcommand::error::ShellError;
use crate::core_shellcommand::handlers::dispatch;
use crate::core_transfer::TransferDirection;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufStream};

/// Anything a session can run over: a `TcpStream` in production, a duplex pipe in tests.
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Connection for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingCommand,
    InTransfer(TransferDirection),
    Closed,
}

enum CommandLine {
    Line(String),
    TooLong,
    Eof,
}

/// One accepted connection and its working directory.
pub struct Session<S> {
    current_dir: PathBuf,
    state: SessionState,
    sandbox: Arc<Sandbox>,
    chunk_size: usize,
    stream: BufStream<S>,
    peer: String,
}

impl<S: Connection> Session<S> {
    pub fn new(stream: S, sandbox: Arc<Sandbox>, chunk_size: usize, peer: impl Into<String>) -> Self {
        Self {
            current_dir: PathBuf::from("."),
            state: SessionState::AwaitingCommand,
            sandbox,
            chunk_size,
            stream: BufStream::new(stream),
            peer: peer.into(),
        }
    }

    /// Relative to the root, `.` for the root itself.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn set_current_dir(&mut self, dir: PathBuf) {
        debug!("[{}] current directory is now {:?}", self.peer, dir);
        self.current_dir = dir;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn stream_mut(&mut self) -> &mut BufStream<S> {
        &mut self.stream
    }

    /// Drives the prompt/command/response loop until the connection goes away.
    pub async fn run(mut self) {
        while self.state != SessionState::Closed {
            if let Err(e) = self.step().await {
                error!("[{}] Session ended: {}", self.peer, e);
                self.state = SessionState::Closed;
            }
        }
        if let Err(e) = self.stream.shutdown().await {
            debug!("[{}] Failed to shut down connection: {}", self.peer, e);
        }
    }

    /// One prompt, one command, one response.
    pub async fn step(&mut self) -> Result<(), ShellError> {
        let prompt = format!("{}{}", self.current_dir.display(), PROMPT_DELIMITER);
        self.write_response(prompt.as_bytes()).await?;

        let line = match self.read_command_line().await? {
            CommandLine::Line(line) => line,
            CommandLine::TooLong => {
                let response = ShellError::LineTooLong.to_shell_response();
                return self.write_response(response.as_bytes()).await;
            }
            CommandLine::Eof => {
                info!("[{}] Client disconnected", self.peer);
                self.state = SessionState::Closed;
                return Ok(());
            }
        };

        info!("[{}] Received command: {}", self.peer, line);
        let response = dispatch(self, &line).await?;
        self.write_response(&response).await
    }

    async fn write_response(&mut self, bytes: &[u8]) -> Result<(), ShellError> {
        self.stream
            .write_all(bytes)
            .await
            .map_err(ShellError::Connection)?;
        self.stream.flush().await.map_err(ShellError::Connection)
    }

    async fn read_command_line(&mut self) -> Result<CommandLine, ShellError> {
        let limit = MAX_LINE_LENGTH as u64 + 1;
        let mut buffer = Vec::new();
        let n = (&mut self.stream)
            .take(limit)
            .read_until(b'\n', &mut buffer)
            .await
            .map_err(ShellError::Connection)?;

        if n == 0 {
            return Ok(CommandLine::Eof);
        }

        if buffer.last() != Some(&b'\n') && buffer.len() > MAX_LINE_LENGTH {
            // Skip the rest of the oversized line.
            loop {
                buffer.clear();
                let n = (&mut self.stream)
                    .take(limit)
                    .read_until(b'\n', &mut buffer)
                    .await
                    .map_err(ShellError::Connection)?;
                if n == 0 {
                    return Ok(CommandLine::Eof);
                }
                if buffer.last() == Some(&b'\n') {
                    break;
                }
            }
            return Ok(CommandLine::TooLong);
        }

        let line = String::from_utf8_lossy(&buffer);
        Ok(CommandLine::Line(
            line.trim_end_matches(['\r', '\n']).to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::{duplex, DuplexStream};

    fn session_in(root: &Path) -> (Session<DuplexStream>, DuplexStream) {
        let (client, server) = duplex(64 * 1024);
        let sandbox = Arc::new(Sandbox::new(root));
        (Session::new(server, sandbox, 1024, "test"), client)
    }

    async fn read_available(client: &mut DuplexStream) -> String {
        let mut buffer = vec![0; 4096];
        let n = client.read(&mut buffer).await.unwrap();
        String::from_utf8_lossy(&buffer[..n]).to_string()
    }

    #[tokio::test]
    async fn test_prompt_shows_current_dir() {
        let dir = tempdir().unwrap();
        let (mut session, mut client) = session_in(dir.path());

        client.write_all(b"foo bar\n").await.unwrap();
        session.step().await.unwrap();

        let output = read_available(&mut client).await;
        assert_eq!(output, ".# unknown command\n");
        assert_eq!(session.state(), SessionState::AwaitingCommand);
    }

    #[tokio::test]
    async fn test_eof_closes_session() {
        let dir = tempdir().unwrap();
        let (mut session, mut client) = session_in(dir.path());
        client.shutdown().await.unwrap();

        session.step().await.unwrap();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_run_returns_when_client_goes_away() {
        let dir = tempdir().unwrap();
        let (session, client) = session_in(dir.path());
        drop(client);

        session.run().await;
    }

    #[tokio::test]
    async fn test_long_line_is_rejected_and_skipped() {
        let dir = tempdir().unwrap();
        let (mut session, mut client) = session_in(dir.path());

        let mut line = vec![b'x'; MAX_LINE_LENGTH + 100];
        line.push(b'\n');
        client.write_all(&line).await.unwrap();
        client.write_all(b"cd .\n").await.unwrap();

        session.step().await.unwrap();
        session.step().await.unwrap();

        let output = read_available(&mut client).await;
        assert_eq!(output, ".# command line too long\n.# ");
        assert_eq!(session.current_dir(), Path::new("."));
    }

    #[tokio::test]
    async fn test_crlf_is_accepted() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let (mut session, mut client) = session_in(dir.path());

        client.write_all(b"cd sub\r\n").await.unwrap();
        session.step().await.unwrap();
        assert_eq!(session.current_dir(), Path::new("sub"));
    }
}
