use std::io::{Cursor, Read, Seek, Write};

use crate::codec::{WireDecode, WireEncode};
use crate::encoding::{read_varint32, read_varint64, varint32_len, write_varint32, write_varint64};
use crate::error::{Error, Result};
use crate::io::{copy_bounded, remaining_len};

/// Largest element count a `length + 1` prefix can carry.
const MAX_SEQUENCE_LEN: u64 = u32::MAX as u64 - 1;

/// Upper bound on speculative preallocation while decoding untrusted lengths.
const MAX_PREALLOC: usize = 64 * 1024;

fn sequence_prefix(len: usize) -> Result<u32> {
    let len = len as u64;
    if len > MAX_SEQUENCE_LEN {
        return Err(Error::SizeExceedsLimit {
            len,
            limit: MAX_SEQUENCE_LEN,
        });
    }
    Ok(len as u32 + 1)
}

/// Appends exactly `len` bytes from `reader` to `buf`, growing it only as data arrives.
fn read_exactly<R: Read + ?Sized>(reader: &mut R, buf: &mut Vec<u8>, len: u64) -> Result<()> {
    let read = (&mut *reader).take(len).read_to_end(buf)?;
    if read as u64 != len {
        return Err(Error::EndOfStream);
    }
    Ok(())
}

/// Writes an optional string as a `length + 1` prefix followed by its UTF-16 code
/// units, each encoded like a `char`.
pub fn write_string<W: Write + ?Sized>(writer: &mut W, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        write_varint32(writer, 0)?;
        return Ok(());
    };
    let prefix = sequence_prefix(value.encode_utf16().count())?;
    write_varint32(writer, prefix)?;
    for unit in value.encode_utf16() {
        unit.encode(writer)?;
    }
    Ok(())
}

/// Reads a string written by [`write_string`]. A zero prefix yields `None`.
pub fn read_string<R: Read + ?Sized>(reader: &mut R) -> Result<Option<String>> {
    let len = match read_varint32(reader)? {
        0 => return Ok(None),
        prefix => (prefix - 1) as usize,
    };
    let mut units = Vec::with_capacity(len.min(MAX_PREALLOC));
    for _ in 0..len {
        units.push(u16::decode(reader)?);
    }
    String::from_utf16(&units)
        .map(Some)
        .map_err(|_| Error::InvalidUtf16)
}

/// Number of bytes [`write_string`] emits for `value`.
pub fn string_encoded_len(value: Option<&str>) -> usize {
    match value {
        None => 1,
        Some(value) => {
            let (count, payload) = value
                .encode_utf16()
                .fold((0u32, 0usize), |(count, payload), unit| {
                    (count.saturating_add(1), payload + unit.encoded_len())
                });
            varint32_len(count.saturating_add(1)) + payload
        }
    }
}

/// Writes an optional byte array as a `length + 1` prefix followed by the raw bytes.
pub fn write_byte_array<W: Write + ?Sized>(writer: &mut W, value: Option<&[u8]>) -> Result<()> {
    let Some(value) = value else {
        write_varint32(writer, 0)?;
        return Ok(());
    };
    write_varint32(writer, sequence_prefix(value.len())?)?;
    writer.write_all(value)?;
    Ok(())
}

/// Reads a byte array written by [`write_byte_array`]. A zero prefix yields `None`.
pub fn read_byte_array<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let len = match read_varint32(reader)? {
        0 => return Ok(None),
        prefix => u64::from(prefix - 1),
    };
    let mut buf = Vec::with_capacity((len as usize).min(MAX_PREALLOC));
    read_exactly(reader, &mut buf, len)?;
    Ok(Some(buf))
}

/// Number of bytes [`write_byte_array`] emits for `value`.
pub fn byte_array_encoded_len(value: Option<&[u8]>) -> usize {
    match value {
        None => 1,
        Some(value) => varint32_len((value.len() as u32).saturating_add(1)) + value.len(),
    }
}

/// Copies the bytes between `source`'s cursor and its end into `writer`, prefixed by
/// their count as a u64 varint. Returns the number of payload bytes copied.
///
/// Fails with [`Error::SizeExceedsLimit`] when the count exceeds `limit`, and with
/// [`Error::ShortCopy`] when fewer bytes than counted could be read from `source`.
/// Bytes appended to `source` after the count is taken are not copied.
pub fn write_length_prefixed<W, S>(
    writer: &mut W,
    source: &mut S,
    buffer_size: usize,
    limit: u64,
) -> Result<u64>
where
    W: Write + ?Sized,
    S: Read + Seek + ?Sized,
{
    let len = remaining_len(source)?;
    if len > limit {
        return Err(Error::SizeExceedsLimit { len, limit });
    }
    write_varint64(writer, len)?;
    let copied = copy_bounded(source, writer, len, buffer_size)?;
    if copied != len {
        return Err(Error::ShortCopy {
            expected: len,
            copied,
        });
    }
    Ok(copied)
}

/// Reads a u64 varint length and materializes that many bytes into a new in-memory
/// stream positioned at its start.
///
/// Fails with [`Error::SizeExceedsLimit`] when the length exceeds `limit` or the
/// platform's addressable buffer size, and with [`Error::EndOfStream`] when `reader`
/// ends early. At most `buffer_size` bytes are reserved before any data arrives.
pub fn read_length_prefixed<R: Read + ?Sized>(
    reader: &mut R,
    buffer_size: usize,
    limit: u64,
) -> Result<Cursor<Vec<u8>>> {
    let len = read_varint64(reader)?;
    let addressable = usize::try_from(len).ok().filter(|&len| len <= isize::MAX as usize);
    let Some(capacity) = addressable.filter(|_| len <= limit) else {
        return Err(Error::SizeExceedsLimit {
            len,
            limit: limit.min(isize::MAX as u64),
        });
    };
    let mut buf = Vec::with_capacity(capacity.min(buffer_size));
    read_exactly(reader, &mut buf, len)?;
    Ok(Cursor::new(buf))
}
