use std::io::SeekFrom;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use crate::http::Error;

/// The content of an upload session.
///
/// The session asks for the size once, before the first range is sent, and then
/// reads the content front to back in range sized pieces.
#[async_trait]
pub trait UploadSource: Send {
    /// The number of bytes left to read.
    async fn size(&mut self) -> Result<u64, Error>;

    /// Reads up to `len` bytes. Fewer bytes are returned only at the end of the content.
    async fn read(&mut self, len: usize) -> Result<Bytes, Error>;
}

#[async_trait]
impl UploadSource for Bytes {
    async fn size(&mut self) -> Result<u64, Error> {
        Ok(self.len() as u64)
    }

    async fn read(&mut self, len: usize) -> Result<Bytes, Error> {
        let len = len.min(self.len());
        Ok(self.split_to(len))
    }
}

/// The size of a file is taken from its metadata, less what has already been read.
#[async_trait]
impl UploadSource for tokio::fs::File {
    async fn size(&mut self) -> Result<u64, Error> {
        let len = self.metadata().await?.len();
        let position = self.stream_position().await?;
        Ok(len.saturating_sub(position))
    }

    async fn read(&mut self, len: usize) -> Result<Bytes, Error> {
        read_up_to(self, len).await
    }
}

/// Any reader whose size is known up front, e.g. a decompressed or network stream.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    size: u64,
}

impl<R> ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(reader: R, size: u64) -> Self {
        Self { reader, size }
    }
}

#[async_trait]
impl<R> UploadSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn size(&mut self) -> Result<u64, Error> {
        Ok(self.size)
    }

    async fn read(&mut self, len: usize) -> Result<Bytes, Error> {
        read_up_to(&mut self.reader, len).await
    }
}

/// A seekable reader. The size is found by seeking to the end when first asked for.
#[derive(Debug)]
pub struct SeekableSource<R> {
    reader: R,
    size: Option<u64>,
}

impl<R> SeekableSource<R>
where
    R: AsyncRead + AsyncSeek + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self { reader, size: None }
    }
}

#[async_trait]
impl<R> UploadSource for SeekableSource<R>
where
    R: AsyncRead + AsyncSeek + Unpin + Send,
{
    async fn size(&mut self) -> Result<u64, Error> {
        if let Some(size) = self.size {
            return Ok(size);
        }
        let position = self.reader.stream_position().await?;
        let end = self.reader.seek(SeekFrom::End(0)).await?;
        self.reader.seek(SeekFrom::Start(position)).await?;
        let size = end.saturating_sub(position);
        self.size = Some(size);
        Ok(size)
    }

    async fn read(&mut self, len: usize) -> Result<Bytes, Error> {
        read_up_to(&mut self.reader, len).await
    }
}

async fn read_up_to<R>(reader: &mut R, len: usize) -> Result<Bytes, Error>
where
    R: AsyncRead + Unpin + Send,
{
    let mut buf = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut buf).await?;
    Ok(Bytes::from(buf))
}
