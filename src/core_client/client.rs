use crate::constants::{DEFAULT_CHUNK_SIZE, PROMPT_DELIMITER};
use crate::core_client::ClientError;
use crate::core_shellcommand::shellcommand::ShellCommand;
use crate::core_shellcommand::utils::file_name_of;
use crate::core_transfer::{receive_file, send_file};
use crate::session::Connection;
use log::debug;
use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufStream};

/// Client side of one shell connection.
pub struct ShellClient<S> {
    stream: BufStream<S>,
}

impl<S: Connection> ShellClient<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufStream::new(stream),
        }
    }

    /// Reads server output up to and including the next prompt.
    ///
    /// The prompt is recognised as a trailing `# ` on a line without tabs,
    /// which rules out listing lines but not every possible error message.
    pub async fn read_until_prompt(&mut self) -> Result<Vec<u8>, ClientError> {
        let delimiter = PROMPT_DELIMITER.as_bytes();
        let last = delimiter[delimiter.len() - 1];
        let mut output = Vec::new();

        loop {
            let n = self
                .stream
                .read_until(last, &mut output)
                .await
                .map_err(ClientError::Connection)?;
            if n == 0 {
                return Err(ClientError::Disconnected);
            }
            if output.ends_with(delimiter) && !last_line(&output).contains(&b'\t') {
                return Ok(output);
            }
        }
    }

    pub async fn send_line(&mut self, line: &str) -> Result<(), ClientError> {
        debug!("Sending command: {}", line);
        self.stream
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(ClientError::Connection)?;
        self.stream.flush().await.map_err(ClientError::Connection)
    }

    /// Sends a plain command and returns everything up to the next prompt.
    pub async fn execute(&mut self, line: &str) -> Result<Vec<u8>, ClientError> {
        self.send_line(line).await?;
        self.read_until_prompt().await
    }

    /// `ul <dest_dir> <local>`: sends the local file as a transfer frame.
    pub async fn upload(&mut self, dest_dir: &str, local: &Path) -> Result<u64, ClientError> {
        let usage = ShellCommand::UL.usage();
        let line = format!("ul {} {}", single_word(dest_dir, usage)?, path_word(local, usage)?);

        let metadata = fs::metadata(local).await.map_err(ClientError::Local)?;
        if !metadata.is_file() {
            return Err(ClientError::Local(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}: not a regular file", local.display()),
            )));
        }

        self.send_line(&line).await?;
        Ok(send_file(&mut self.stream, local, DEFAULT_CHUNK_SIZE).await?)
    }

    /// `dl <local_dir> <remote>`: stores the remote file as `local_dir/basename(remote)`.
    pub async fn download(&mut self, local_dir: &Path, remote: &str) -> Result<u64, ClientError> {
        let usage = ShellCommand::DL.usage();
        let line = format!("dl {} {}", path_word(local_dir, usage)?, single_word(remote, usage)?);

        let metadata = fs::metadata(local_dir).await.map_err(ClientError::Local)?;
        if !metadata.is_dir() {
            return Err(ClientError::Local(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}: not a directory", local_dir.display()),
            )));
        }
        let name = file_name_of(remote).ok_or(ClientError::Usage(usage))?;
        let target = local_dir.join(name);

        self.send_line(&line).await?;
        Ok(receive_file(&mut self.stream, &target).await?)
    }
}

/// The server splits command lines on whitespace, so every argument must be one word.
fn single_word<'a>(arg: &'a str, usage: &'static str) -> Result<&'a str, ClientError> {
    if arg.is_empty() || arg.chars().any(char::is_whitespace) {
        return Err(ClientError::Usage(usage));
    }
    Ok(arg)
}

fn path_word<'a>(path: &'a Path, usage: &'static str) -> Result<&'a str, ClientError> {
    let arg = path.to_str().ok_or(ClientError::Usage(usage))?;
    single_word(arg, usage)
}

fn last_line(output: &[u8]) -> &[u8] {
    let start = output
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    &output[start..]
}
