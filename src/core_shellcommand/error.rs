// Errors produced while running one shell command
use crate::constants::UNKNOWN_COMMAND;
use crate::core_sandbox::SandboxError;
use crate::core_transfer::TransferError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown command")]
    UnknownCommand,

    #[error("command line too long")]
    LineTooLong,

    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("{0}: not a directory")]
    NotADirectory(String),

    #[error("{0}: not a regular file")]
    NotAFile(String),

    #[error("{0}: no file name")]
    InvalidFileName(String),

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("connection error: {0}")]
    Connection(#[source] io::Error),
}

impl ShellError {
    /// Text sent back to the client, always newline-terminated.
    pub fn to_shell_response(&self) -> String {
        match self {
            ShellError::Usage(usage) => format!("{}\n", usage),
            ShellError::UnknownCommand => UNKNOWN_COMMAND.to_string(),
            ShellError::Sandbox(e) => e.to_shell_response(),
            other => format!("{}\n", other),
        }
    }

    /// Fatal errors end the session instead of being reported to the client.
    pub fn is_fatal(&self) -> bool {
        match self {
            ShellError::Connection(_) => true,
            ShellError::Transfer(e) => e.is_fatal(),
            _ => false,
        }
    }
}
