use std::io::{Read, Write};

use crate::codec::{WireDecode, WireEncode};
use crate::encoding::{
    read_varint32, read_varint64, varint32_len, varint64_len, write_varint32, write_varint64,
    zigzag,
};
use crate::error::{Error, Result};
use crate::io::read_exact_byte;

impl WireEncode for bool {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[u8::from(*self)])?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl WireDecode for bool {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        match read_exact_byte(reader)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::discriminant("bool", other)),
        }
    }
}

// Eight-bit values skip the varint layer: a varint would only ever add a byte.
impl WireEncode for u8 {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[*self])?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl WireDecode for u8 {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        read_exact_byte(reader)
    }
}

impl WireEncode for i8 {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[*self as u8])?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl WireDecode for i8 {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(read_exact_byte(reader)? as i8)
    }
}

/// Implements the codec for a type carried as a varint of a 32- or 64-bit word.
///
/// Decoded words wider than the target type are truncated to it.
macro_rules! impl_varint_scalar {
    ($($ty:ty => $write:ident, $read:ident, $len:ident, |$v:ident| $to:expr, |$w:ident| $from:expr;)*) => {
        $(
            impl WireEncode for $ty {
                fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
                    let $v = *self;
                    $write(writer, $to)?;
                    Ok(())
                }

                fn encoded_len(&self) -> usize {
                    let $v = *self;
                    $len($to)
                }
            }

            impl WireDecode for $ty {
                fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
                    let $w = $read(reader)?;
                    Ok($from)
                }
            }
        )*
    };
}

impl_varint_scalar! {
    u16 => write_varint32, read_varint32, varint32_len, |v| u32::from(v), |w| w as u16;
    i16 => write_varint32, read_varint32, varint32_len,
        |v| zigzag::encode32(i32::from(v)), |w| zigzag::decode32(w) as i16;
    u32 => write_varint32, read_varint32, varint32_len, |v| v, |w| w;
    i32 => write_varint32, read_varint32, varint32_len,
        |v| zigzag::encode32(v), |w| zigzag::decode32(w);
    u64 => write_varint64, read_varint64, varint64_len, |v| v, |w| w;
    i64 => write_varint64, read_varint64, varint64_len,
        |v| zigzag::encode64(v), |w| zigzag::decode64(w);
    f64 => write_varint64, read_varint64, varint64_len,
        |v| zigzag::encode64(v.to_bits() as i64), |w| f64::from_bits(zigzag::decode64(w) as u64);
}

// No narrow float format: f32 rides on the f64 encoding.
impl WireEncode for f32 {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        f64::from(*self).encode(writer)
    }

    fn encoded_len(&self) -> usize {
        f64::from(*self).encoded_len()
    }
}

impl WireDecode for f32 {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(f64::decode(reader)? as f32)
    }
}
