use crate::core_transfer::codec::{read_chunk, write_abort, write_data, write_end, Chunk};
use crate::core_transfer::TransferError;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// Client to server (`ul`).
    Receive,
    /// Server to client (`dl`).
    Send,
}

/// Streams the file at `path` as one frame.
///
/// The frame always ends: with END once the whole file went out, or with
/// ABORT if the file could not be opened or read. Returns the number of
/// payload bytes sent.
pub async fn send_file<W>(writer: &mut W, path: &Path, chunk_size: usize) -> Result<u64, TransferError>
where
    W: AsyncWrite + Unpin,
{
    let mut file = match File::open(path).await {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to open {:?} for sending: {}", path, e);
            write_abort(writer).await?;
            return Err(TransferError::File(e));
        }
    };

    let mut buffer = vec![0; chunk_size];
    let mut sent: u64 = 0;

    loop {
        let bytes_read = match file.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("Error reading {:?} after {} bytes: {}", path, sent, e);
                write_abort(writer).await?;
                return Err(TransferError::File(e));
            }
        };
        write_data(writer, &buffer[..bytes_read]).await?;
        sent += bytes_read as u64;
    }

    write_end(writer).await?;
    debug!("Sent {} bytes from {:?}", sent, path);
    Ok(sent)
}

/// Reads one frame into `path`, replacing any existing file once the frame ends.
///
/// Bytes go to a hidden sibling file that is renamed over `path` only after END
/// and a successful flush, so a failed transfer leaves an existing `path`
/// untouched and no partial file behind. The frame is always consumed up to its
/// END, even when nothing can be written. Returns the number of bytes written.
pub async fn receive_file<R>(reader: &mut R, path: &Path) -> Result<u64, TransferError>
where
    R: AsyncRead + Unpin,
{
    let part = part_path(path);
    let mut file = match File::create(&part).await {
        Ok(f) => Some(f),
        Err(e) => {
            error!("Failed to create {:?}: {}", part, e);
            drain_frame(reader).await?;
            return Err(TransferError::File(e));
        }
    };

    let mut received: u64 = 0;
    let mut write_error: Option<std::io::Error> = None;

    loop {
        let chunk = match read_chunk(reader).await {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file.take());
                discard_partial(&part).await;
                return Err(e);
            }
        };

        match chunk {
            Chunk::Data(payload) => {
                if let Some(f) = file.as_mut() {
                    if let Err(e) = f.write_all(&payload).await {
                        error!("Error writing to {:?}: {}", part, e);
                        write_error = Some(e);
                        file = None;
                    } else {
                        received += payload.len() as u64;
                    }
                }
            }
            Chunk::End => break,
            Chunk::Abort => {
                warn!("Transfer into {:?} aborted by the peer", path);
                drop(file.take());
                discard_partial(&part).await;
                return Err(TransferError::Aborted);
            }
        }
    }

    if let Some(mut f) = file.take() {
        if let Err(e) = f.flush().await {
            write_error.get_or_insert(e);
        }
    }

    if let Some(e) = write_error {
        discard_partial(&part).await;
        return Err(TransferError::File(e));
    }

    if let Err(e) = fs::rename(&part, path).await {
        error!("Failed to move {:?} into place at {:?}: {}", part, path, e);
        discard_partial(&part).await;
        return Err(TransferError::File(e));
    }

    info!("Stored {} bytes in {:?}", received, path);
    Ok(received)
}

/// Consumes and discards one frame. An aborted frame counts as consumed.
pub async fn drain_frame<R>(reader: &mut R) -> Result<(), TransferError>
where
    R: AsyncRead + Unpin,
{
    loop {
        match read_chunk(reader).await? {
            Chunk::Data(_) => {}
            Chunk::End | Chunk::Abort => return Ok(()),
        }
    }
}

/// `dir/.name.<pid>-<n>.part`, unique per transfer in this process.
fn part_path(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}-{}.part", name, std::process::id(), n))
}

async fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!("Failed to remove partial file {:?}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FRAME_DATA, FRAME_END};
    use tempfile::tempdir;

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| [FRAME_END, 0x00, 0x41, 0xFF][i % 4]).collect()
    }

    #[tokio::test]
    async fn test_send_then_receive_sizes() {
        let dir = tempdir().unwrap();

        for size in [0usize, 1, 1023, 1024, 1025, 2048] {
            let source = dir.path().join(format!("src-{}", size));
            let target = dir.path().join(format!("dst-{}", size));
            let content = payload(size);
            std::fs::write(&source, &content).unwrap();

            let mut wire = Vec::new();
            assert_eq!(send_file(&mut wire, &source, 1024).await.unwrap(), size as u64);
            assert_eq!(wire.last(), Some(&FRAME_END));

            let mut reader = wire.as_slice();
            assert_eq!(receive_file(&mut reader, &target).await.unwrap(), size as u64);
            assert!(reader.is_empty());
            assert_eq!(std::fs::read(&target).unwrap(), content);
        }
    }

    #[tokio::test]
    async fn test_send_missing_file_aborts_frame() {
        let dir = tempdir().unwrap();
        let mut wire = Vec::new();

        let err = send_file(&mut wire, &dir.path().join("nope"), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::File(_)));
        assert_eq!(wire, vec![crate::constants::FRAME_ABORT]);
    }

    #[tokio::test]
    async fn test_receive_aborted_removes_partial_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("partial");
        let mut wire = Vec::new();
        write_data(&mut wire, b"half").await.unwrap();
        write_abort(&mut wire).await.unwrap();

        let err = receive_file(&mut wire.as_slice(), &target).await.unwrap_err();
        assert!(matches!(err, TransferError::Aborted));
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_receive_aborted_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("report.txt");
        std::fs::write(&target, b"precious original").unwrap();
        let mut wire = Vec::new();
        write_data(&mut wire, b"half").await.unwrap();
        write_abort(&mut wire).await.unwrap();

        let err = receive_file(&mut wire.as_slice(), &target).await.unwrap_err();
        assert!(matches!(err, TransferError::Aborted));
        assert_eq!(std::fs::read(&target).unwrap(), b"precious original");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_receive_replaces_existing_file_after_end() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("report.txt");
        std::fs::write(&target, b"a much longer old version").unwrap();
        let mut wire = Vec::new();
        write_data(&mut wire, b"new").await.unwrap();
        write_end(&mut wire).await.unwrap();

        assert_eq!(receive_file(&mut wire.as_slice(), &target).await.unwrap(), 3);
        assert_eq!(std::fs::read(&target).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_receive_truncated_frame_removes_partial_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("partial");
        let wire = vec![FRAME_DATA, 0, 4, b'a', b'b'];

        let err = receive_file(&mut wire.as_slice(), &target).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_receive_into_missing_directory_drains_frame() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("file");
        let mut wire = Vec::new();
        write_data(&mut wire, b"payload").await.unwrap();
        write_end(&mut wire).await.unwrap();
        wire.extend_from_slice(b"ls\n");

        let mut reader = wire.as_slice();
        let err = receive_file(&mut reader, &target).await.unwrap_err();
        assert!(matches!(err, TransferError::File(_)));
        assert_eq!(reader, b"ls\n");
    }
}
