//! Transfer frame encoding.
//!
//! A frame is a run of chunks read straight off the connection:
//!
//! ```text
//! DATA  : 0x01  len:u16 (big-endian)  payload[len]
//! END   : 0xDA
//! ABORT : 0x15
//! ```
//!
//! Payload bytes are length-delimited, so a `0xDA` inside file content is
//! always data and only a tag byte can end the frame.

use crate::constants::{FRAME_ABORT, FRAME_DATA, FRAME_END, MAX_CHUNK_SIZE};
use crate::core_transfer::TransferError;
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, PartialEq, Eq)]
pub enum Chunk {
    Data(Vec<u8>),
    End,
    Abort,
}

/// Writes `payload` as one or more DATA chunks.
pub async fn write_data<W>(writer: &mut W, payload: &[u8]) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    for piece in payload.chunks(MAX_CHUNK_SIZE) {
        let mut header = [FRAME_DATA, 0, 0];
        header[1..].copy_from_slice(&(piece.len() as u16).to_be_bytes());
        writer
            .write_all(&header)
            .await
            .map_err(TransferError::Connection)?;
        writer
            .write_all(piece)
            .await
            .map_err(TransferError::Connection)?;
    }
    Ok(())
}

pub async fn write_end<W>(writer: &mut W) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    write_tag(writer, FRAME_END).await
}

pub async fn write_abort<W>(writer: &mut W) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    write_tag(writer, FRAME_ABORT).await
}

async fn write_tag<W>(writer: &mut W, tag: u8) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(&[tag])
        .await
        .map_err(TransferError::Connection)?;
    writer.flush().await.map_err(TransferError::Connection)
}

/// Reads the next chunk. A short read or an unknown tag is an error.
pub async fn read_chunk<R>(reader: &mut R) -> Result<Chunk, TransferError>
where
    R: AsyncRead + Unpin,
{
    let tag = reader.read_u8().await.map_err(TransferError::Connection)?;
    match tag {
        FRAME_DATA => {
            let len = reader.read_u16().await.map_err(TransferError::Connection)? as usize;
            let mut payload = vec![0; len];
            reader
                .read_exact(&mut payload)
                .await
                .map_err(TransferError::Connection)?;
            debug!("Received data chunk of {} bytes", len);
            Ok(Chunk::Data(payload))
        }
        FRAME_END => Ok(Chunk::End),
        FRAME_ABORT => Ok(Chunk::Abort),
        other => Err(TransferError::Malformed(other)),
    }
}
