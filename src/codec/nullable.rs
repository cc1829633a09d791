//! The fixed per-type absence conventions.
//!
//! Two conventions coexist on the wire and each type is bound to exactly one of them:
//!
//! | convention | types |
//! |---|---|
//! | presence byte | `bool`, `f32`, `f64`, `Decimal`, `Guid`, `i64`, `u64`, `Timestamp` |
//! | offset by one, 32-bit carrier | `u8`, `i8`, `u16`, `i16`, `char` |
//! | offset by one, 64-bit carrier | `u32`, `i32` |
//!
//! Signed offset-by-one types add one to their zigzag image, so `-1` never lands on the
//! absence sentinel.

use std::io::{Read, Write};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::codec::{Nullable, WireDecode, WireEncode};
use crate::encoding::{
    VARINT32_MAX_LEN, read_varint32, read_varint64, varint32_len, varint64_len, write_varint32,
    write_varint64, zigzag,
};
use crate::error::{Error, Result};
use crate::io::read_exact_byte;
use crate::types::{NullEncoding, Timestamp};

const ABSENT: u8 = 0;
const PRESENT: u8 = 1;

macro_rules! impl_presence_byte {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Nullable for $ty {
                const NULL_ENCODING: NullEncoding = NullEncoding::PresenceByte;

                fn encode_nullable<W: Write + ?Sized>(
                    value: Option<&Self>,
                    writer: &mut W,
                ) -> Result<()> {
                    match value {
                        None => writer.write_all(&[ABSENT])?,
                        Some(value) => {
                            writer.write_all(&[PRESENT])?;
                            value.encode(writer)?;
                        }
                    }
                    Ok(())
                }

                fn decode_nullable<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Self>> {
                    match read_exact_byte(reader)? {
                        ABSENT => Ok(None),
                        PRESENT => Ok(Some(<$ty>::decode(reader)?)),
                        other => Err(Error::discriminant("nullable presence", other)),
                    }
                }

                fn nullable_encoded_len(value: Option<&Self>) -> usize {
                    1 + value.map_or(0, WireEncode::encoded_len)
                }
            }
        )*
    };
}

impl_presence_byte!(bool, f32, f64, Decimal, Uuid, i64, u64, Timestamp);

macro_rules! impl_offset_by_one {
    ($($ty:ty => $write:ident, $read:ident, $len:ident, |$v:ident| $to:expr, |$c:ident| $from:expr;)*) => {
        $(
            impl Nullable for $ty {
                const NULL_ENCODING: NullEncoding = NullEncoding::OffsetByOne;

                fn encode_nullable<W: Write + ?Sized>(
                    value: Option<&Self>,
                    writer: &mut W,
                ) -> Result<()> {
                    let carrier = match value {
                        None => 0,
                        Some(&$v) => $to + 1,
                    };
                    $write(writer, carrier)?;
                    Ok(())
                }

                fn decode_nullable<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Self>> {
                    match $read(reader)? {
                        0 => Ok(None),
                        carrier => {
                            let $c = carrier - 1;
                            Ok(Some($from?))
                        }
                    }
                }

                fn nullable_encoded_len(value: Option<&Self>) -> usize {
                    match value {
                        None => 1,
                        Some(&$v) => $len($to + 1),
                    }
                }
            }
        )*
    };
}

/// Narrows a 64-bit carrier payload back to the 32 bits it was widened from.
fn narrow_carrier(payload: u64) -> Result<u32> {
    u32::try_from(payload).map_err(|_| Error::MalformedVarint {
        max_len: VARINT32_MAX_LEN,
    })
}

impl_offset_by_one! {
    u8 => write_varint32, read_varint32, varint32_len, |v| u32::from(v), |c| Ok::<_, Error>(c as u8);
    i8 => write_varint32, read_varint32, varint32_len,
        |v| zigzag::encode32(i32::from(v)), |c| Ok::<_, Error>(zigzag::decode32(c) as i8);
    u16 => write_varint32, read_varint32, varint32_len, |v| u32::from(v), |c| Ok::<_, Error>(c as u16);
    i16 => write_varint32, read_varint32, varint32_len,
        |v| zigzag::encode32(i32::from(v)), |c| Ok::<_, Error>(zigzag::decode32(c) as i16);
    u32 => write_varint64, read_varint64, varint64_len, |v| u64::from(v), |c| narrow_carrier(c);
    i32 => write_varint64, read_varint64, varint64_len,
        |v| u64::from(zigzag::encode32(v)), |c| narrow_carrier(c).map(zigzag::decode32);
}
