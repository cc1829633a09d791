use std::io::{Read, Write};

use bytes::Bytes;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::codec::{
    Nullable, WireDecode, WireEncode, byte_array_encoded_len, read_byte_array, read_string,
    string_encoded_len, write_byte_array, write_string,
};
use crate::error::{Error, Result};
use crate::types::{Slot, Timestamp, Value, ValueKind};

impl WireEncode for Value {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        match self {
            Value::Bool(v) => v.encode(writer),
            Value::U8(v) => v.encode(writer),
            Value::I8(v) => v.encode(writer),
            Value::U16(v) | Value::Char(v) => v.encode(writer),
            Value::I16(v) => v.encode(writer),
            Value::U32(v) => v.encode(writer),
            Value::I32(v) => v.encode(writer),
            Value::U64(v) => v.encode(writer),
            Value::I64(v) => v.encode(writer),
            Value::F32(v) => v.encode(writer),
            Value::F64(v) => v.encode(writer),
            Value::Decimal(v) => v.encode(writer),
            Value::Timestamp(v) => v.encode(writer),
            Value::Guid(v) => v.encode(writer),
            Value::String(v) => write_string(writer, v.as_deref()),
            Value::Bytes(v) => write_byte_array(writer, v.as_deref()),
        }
    }

    fn encoded_len(&self) -> usize {
        match self {
            Value::Bool(v) => v.encoded_len(),
            Value::U8(v) => v.encoded_len(),
            Value::I8(v) => v.encoded_len(),
            Value::U16(v) | Value::Char(v) => v.encoded_len(),
            Value::I16(v) => v.encoded_len(),
            Value::U32(v) => v.encoded_len(),
            Value::I32(v) => v.encoded_len(),
            Value::U64(v) => v.encoded_len(),
            Value::I64(v) => v.encoded_len(),
            Value::F32(v) => v.encoded_len(),
            Value::F64(v) => v.encoded_len(),
            Value::Decimal(v) => v.encoded_len(),
            Value::Timestamp(v) => v.encoded_len(),
            Value::Guid(v) => v.encoded_len(),
            Value::String(v) => string_encoded_len(v.as_deref()),
            Value::Bytes(v) => byte_array_encoded_len(v.as_deref()),
        }
    }
}

fn mismatch(kind: ValueKind, found: Option<&Value>) -> Error {
    Error::TypeMismatch {
        expected: kind.name(),
        found: found.map_or("null", |value| value.kind().name()),
    }
}

/// Expands `$body!(ty, Variant)` for the kind of `$kind`, excluding strings and
/// byte arrays which the callers handle themselves.
macro_rules! dispatch_scalar {
    ($kind:expr, $body:ident) => {
        match $kind {
            ValueKind::Bool => $body!(bool, Bool),
            ValueKind::U8 => $body!(u8, U8),
            ValueKind::I8 => $body!(i8, I8),
            ValueKind::U16 => $body!(u16, U16),
            ValueKind::I16 => $body!(i16, I16),
            ValueKind::U32 => $body!(u32, U32),
            ValueKind::I32 => $body!(i32, I32),
            ValueKind::U64 => $body!(u64, U64),
            ValueKind::I64 => $body!(i64, I64),
            ValueKind::Char => $body!(u16, Char),
            ValueKind::F32 => $body!(f32, F32),
            ValueKind::F64 => $body!(f64, F64),
            ValueKind::Decimal => $body!(Decimal, Decimal),
            ValueKind::Timestamp => $body!(Timestamp, Timestamp),
            ValueKind::Guid => $body!(Uuid, Guid),
            ValueKind::String | ValueKind::Bytes => {
                unreachable!("sequence kinds are dispatched by the caller")
            }
        }
    };
}

impl Slot {
    /// Writes `value` into this slot.
    ///
    /// `None` is accepted for nullable slots and for string/byte-array slots, whose
    /// absence lives in the length prefix. Fails with [`Error::TypeMismatch`] when the
    /// value's kind differs from the slot's.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W, value: Option<&Value>) -> Result<()> {
        let (kind, nullable) = (self.kind, self.nullable);
        match (kind, value) {
            (ValueKind::String, None) => return write_string(writer, None),
            (ValueKind::Bytes, None) => return write_byte_array(writer, None),
            (ValueKind::String | ValueKind::Bytes, Some(value)) if value.kind() == kind => {
                return value.encode(writer);
            }
            (ValueKind::String | ValueKind::Bytes, Some(_)) => return Err(mismatch(kind, value)),
            _ => {}
        }

        macro_rules! write_as {
            ($ty:ty, $variant:ident) => {
                match value {
                    Some(Value::$variant(v)) if nullable => {
                        <$ty as Nullable>::encode_nullable(Some(v), writer)
                    }
                    Some(Value::$variant(v)) => WireEncode::encode(v, writer),
                    None if nullable => <$ty as Nullable>::encode_nullable(None, writer),
                    _ => Err(mismatch(kind, value)),
                }
            };
        }
        dispatch_scalar!(kind, write_as)
    }

    /// Reads one value from this slot. Absent nullable values yield `None`; strings and
    /// byte arrays always yield `Some`, carrying their own null state.
    pub fn read<R: Read + ?Sized>(&self, reader: &mut R) -> Result<Option<Value>> {
        let (kind, nullable) = (self.kind, self.nullable);
        match kind {
            ValueKind::String => return Ok(Some(Value::String(read_string(reader)?))),
            ValueKind::Bytes => {
                let bytes = read_byte_array(reader)?.map(Bytes::from);
                return Ok(Some(Value::Bytes(bytes)));
            }
            _ => {}
        }

        macro_rules! read_as {
            ($ty:ty, $variant:ident) => {
                if nullable {
                    Ok(<$ty as Nullable>::decode_nullable(reader)?.map(Value::$variant))
                } else {
                    Ok(Some(Value::$variant(<$ty as WireDecode>::decode(reader)?)))
                }
            };
        }
        dispatch_scalar!(kind, read_as)
    }

    /// Number of bytes [`write`](Self::write) emits for `value`.
    pub fn encoded_len(&self, value: Option<&Value>) -> Result<usize> {
        let (kind, nullable) = (self.kind, self.nullable);
        match (kind, value) {
            (ValueKind::String, None) => return Ok(string_encoded_len(None)),
            (ValueKind::Bytes, None) => return Ok(byte_array_encoded_len(None)),
            (ValueKind::String | ValueKind::Bytes, Some(value)) if value.kind() == kind => {
                return Ok(value.encoded_len());
            }
            (ValueKind::String | ValueKind::Bytes, Some(_)) => return Err(mismatch(kind, value)),
            _ => {}
        }

        macro_rules! len_as {
            ($ty:ty, $variant:ident) => {
                match value {
                    Some(Value::$variant(v)) if nullable => {
                        Ok(<$ty as Nullable>::nullable_encoded_len(Some(v)))
                    }
                    Some(Value::$variant(v)) => Ok(WireEncode::encoded_len(v)),
                    None if nullable => Ok(<$ty as Nullable>::nullable_encoded_len(None)),
                    _ => Err(mismatch(kind, value)),
                }
            };
        }
        dispatch_scalar!(kind, len_as)
    }
}

/// Writes `values` against `layout`, slot by slot.
pub fn write_values<W: Write + ?Sized>(
    writer: &mut W,
    layout: &[Slot],
    values: &[Option<Value>],
) -> Result<()> {
    if layout.len() != values.len() {
        return Err(Error::invalid_option(format!(
            "layout has {} slots but {} values were supplied",
            layout.len(),
            values.len()
        )));
    }
    for (slot, value) in layout.iter().zip(values) {
        slot.write(writer, value.as_ref())?;
    }
    Ok(())
}

/// Reads one value per slot of `layout`.
pub fn read_values<R: Read + ?Sized>(reader: &mut R, layout: &[Slot]) -> Result<Vec<Option<Value>>> {
    layout.iter().map(|slot| slot.read(reader)).collect()
}
