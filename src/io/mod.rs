//! Byte-stream capability helpers shared by the codec and the stream adapter.
//!
//! The codec runs against `std::io::Read`/`Write`; cursor position and length come
//! from `std::io::Seek`.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};

/// Reads one byte, returning `None` once the stream is exhausted.
pub fn read_byte<R: Read + ?Sized>(reader: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Reads one byte, failing with [`Error::EndOfStream`] on exhaustion.
#[inline]
pub fn read_exact_byte<R: Read + ?Sized>(reader: &mut R) -> Result<u8> {
    read_byte(reader)?.ok_or(Error::EndOfStream)
}

/// Reads an exact number of bytes into a fixed-size array.
#[inline]
pub fn read_array<const N: usize, R: Read + ?Sized>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Returns the number of bytes between the cursor and the end of the stream.
///
/// The cursor is restored before returning. A cursor past the end yields zero.
pub fn remaining_len<S: Seek + ?Sized>(stream: &mut S) -> Result<u64> {
    let position = stream.stream_position()?;
    let end = stream.seek(SeekFrom::End(0))?;
    if end != position {
        stream.seek(SeekFrom::Start(position))?;
    }
    Ok(end.saturating_sub(position))
}

/// Copies at most `limit` bytes from `reader` to `writer` through a `buffer_size`
/// scratch buffer, returning the number of bytes moved.
///
/// Stops early if `reader` is exhausted; the caller decides whether that is an error.
pub fn copy_bounded<R, W>(
    reader: &mut R,
    writer: &mut W,
    limit: u64,
    buffer_size: usize,
) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let scratch_len = usize::try_from(limit).map_or(buffer_size, |limit| buffer_size.min(limit));
    let mut scratch = vec![0u8; scratch_len.max(1)];
    let mut copied = 0u64;
    while copied < limit {
        let want = usize::try_from(limit - copied)
            .unwrap_or(usize::MAX)
            .min(scratch.len());
        let read = match reader.read(&mut scratch[..want]) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        writer.write_all(&scratch[..read])?;
        copied += read as u64;
    }
    Ok(copied)
}
