// Errors raised while a transfer frame is on the wire
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("connection error during transfer: {0}")]
    Connection(#[source] io::Error),

    #[error("{0}")]
    File(#[source] io::Error),

    #[error("malformed transfer frame: unexpected tag 0x{0:02x}")]
    Malformed(u8),

    #[error("transfer aborted by peer")]
    Aborted,
}

impl TransferError {
    /// The stream can no longer be trusted to be on a frame or line boundary.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransferError::Connection(_) | TransferError::Malformed(_))
    }
}
