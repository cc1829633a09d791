//! Async helpers that move length-prefixed frames between tokio transports and the
//! synchronous codec.
//!
//! Each helper buffers one whole frame in memory; the typed codec itself never awaits.

use std::io::Cursor;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::encoding::{VARINT64_MAX_LEN, VarintBuf, encode_varint64_into, read_varint64};
use crate::error::{Error, Result};
use crate::stream::{DEFAULT_MAX_EMBEDDED_LEN, StreamOptions, ValueStream};

async fn read_frame_len<R>(source: &mut R) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = VarintBuf::new();
    loop {
        let byte = source.read_u8().await?;
        prefix.push(byte);
        if byte & 0x80 == 0 || prefix.len() == VARINT64_MAX_LEN {
            break;
        }
    }
    read_varint64(&mut prefix.as_slice())
}

/// Reads one length-prefixed frame and returns it as an in-memory stream positioned at
/// its start.
pub async fn read_frame<R>(source: &mut R) -> Result<Cursor<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    read_frame_with_limit(source, DEFAULT_MAX_EMBEDDED_LEN).await
}

/// [`read_frame`] with an explicit upper bound on the frame length.
pub async fn read_frame_with_limit<R>(source: &mut R, limit: u64) -> Result<Cursor<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let len = read_frame_len(source).await?;
    if len > limit {
        return Err(Error::SizeExceedsLimit { len, limit });
    }
    let mut buffer = Vec::new();
    let copied = (&mut *source).take(len).read_to_end(&mut buffer).await?;
    if copied as u64 != len {
        return Err(Error::EndOfStream);
    }
    Ok(Cursor::new(buffer))
}

/// Writes `payload` as one length-prefixed frame and flushes the sink.
pub async fn write_frame<W>(sink: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut prefix = VarintBuf::new();
    encode_varint64_into(payload.len() as u64, &mut prefix);
    sink.write_all(&prefix).await?;
    sink.write_all(payload).await?;
    sink.flush().await?;
    Ok(())
}

/// Collects typed writes in memory and emits them as one frame on
/// [`finish`](AsyncFrameWriter::finish).
pub struct AsyncFrameWriter<W> {
    sink: W,
    buffer: Vec<u8>,
    options: StreamOptions,
}

impl<W> AsyncFrameWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a frame writer for `sink` with default options.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buffer: Vec::new(),
            options: StreamOptions::default(),
        }
    }

    /// Creates a frame writer with explicit options.
    pub fn with_options(sink: W, options: StreamOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            sink,
            buffer: Vec::new(),
            options,
        })
    }

    /// Returns a [`ValueStream`] appending to the pending frame, so every
    /// [`ValueWriter`](crate::ValueWriter) method is available.
    pub fn values(&mut self) -> ValueStream<'_, Vec<u8>> {
        ValueStream::from_validated(&mut self.buffer, self.options.clone())
    }

    /// Number of bytes buffered for the pending frame.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Writes the buffered values as one frame, returning the sink on completion.
    pub async fn finish(self) -> Result<W> {
        let AsyncFrameWriter {
            mut sink, buffer, ..
        } = self;
        write_frame(&mut sink, &buffer).await?;
        Ok(sink)
    }
}
