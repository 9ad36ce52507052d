//! Streaming writes for uploaded file parts

use std::io;
use std::path::Path;

use tokio::fs::OpenOptions;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// Copy `reader` into the file at `path`, `chunk_size` bytes at a time.
///
/// The destination is created or truncated. Returns the number of bytes written.
pub async fn upload_stream_write<R>(mut reader: R, path: &Path, chunk_size: usize) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    if chunk_size == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "chunk size must be greater than 0",
        ));
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await?;

    let mut chunk = vec![0u8; chunk_size];
    let mut written: u64 = 0;
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        file.write_all(&chunk[..read]).await?;
        written += read as u64;
    }
    file.flush().await?;

    tracing::debug!(path = %path.display(), bytes = written, chunk_size, "Upload stream written");
    Ok(written)
}
