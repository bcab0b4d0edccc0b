// Errors seen by the interactive client
use crate::core_transfer::TransferError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Local(#[source] io::Error),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("connection error: {0}")]
    Connection(#[source] io::Error),

    #[error("server closed the connection")]
    Disconnected,
}

impl ClientError {
    /// The command never reached the server, so no prompt will follow.
    pub fn before_send(&self) -> bool {
        matches!(self, ClientError::Usage(_) | ClientError::Local(_))
    }

    pub fn is_fatal(&self) -> bool {
        match self {
            ClientError::Connection(_) | ClientError::Disconnected => true,
            ClientError::Transfer(e) => e.is_fatal(),
            _ => false,
        }
    }
}
