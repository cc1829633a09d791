use std::io::{Read, Write};

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::io::read_exact_byte;

/// Maximum number of bytes that a u32 varint can occupy.
pub const VARINT32_MAX_LEN: usize = 5;
/// Maximum number of bytes that a u64 varint can occupy.
pub const VARINT64_MAX_LEN: usize = 10;

/// Stack buffer large enough for any varint.
pub type VarintBuf = SmallVec<[u8; VARINT64_MAX_LEN]>;

/// Encodes `value` as a minimal-length varint and appends it to `out`.
pub fn encode_varint64_into(mut value: u64, out: &mut VarintBuf) -> usize {
    let start_len = out.len();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
            out.push(byte);
        } else {
            out.push(byte);
            break;
        }
    }
    out.len() - start_len
}

/// Writes a u32 varint, returning the number of bytes written.
pub fn write_varint32<W: Write + ?Sized>(writer: &mut W, value: u32) -> Result<usize> {
    write_varint64(writer, u64::from(value))
}

/// Writes a u64 varint, returning the number of bytes written.
pub fn write_varint64<W: Write + ?Sized>(writer: &mut W, value: u64) -> Result<usize> {
    let mut buf = VarintBuf::new();
    let len = encode_varint64_into(value, &mut buf);
    writer.write_all(&buf)?;
    Ok(len)
}

/// Reads a u32 varint.
///
/// Payload bits above bit 31 in the fifth byte are discarded. A sixth byte is never
/// read: if the fifth byte still carries a continuation flag the varint is rejected.
pub fn read_varint32<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    let mut value = 0u32;
    for i in 0..VARINT32_MAX_LEN {
        let byte = read_exact_byte(reader)?;
        value |= u32::from(byte & 0x7f) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(Error::MalformedVarint {
        max_len: VARINT32_MAX_LEN,
    })
}

/// Reads a u64 varint. Same bounds as [`read_varint32`] over ten bytes.
pub fn read_varint64<R: Read + ?Sized>(reader: &mut R) -> Result<u64> {
    let mut value = 0u64;
    for i in 0..VARINT64_MAX_LEN {
        let byte = read_exact_byte(reader)?;
        value |= u64::from(byte & 0x7f) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(Error::MalformedVarint {
        max_len: VARINT64_MAX_LEN,
    })
}

/// Number of bytes [`write_varint32`] emits for `value`.
#[inline]
pub const fn varint32_len(value: u32) -> usize {
    varint64_len(value as u64)
}

/// Number of bytes [`write_varint64`] emits for `value`.
#[inline]
pub const fn varint64_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}
