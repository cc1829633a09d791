use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use rust_decimal::Decimal;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Timestamp, ValueKind};

/// Any value the codec can put on the wire.
///
/// Strings and byte arrays carry their own null state because absence is part of their
/// length prefix; every other kind is made nullable through a [`Slot`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// Single `0`/`1` byte.
    Bool(bool),
    /// Single raw byte.
    U8(u8),
    /// Single raw byte (two's complement).
    I8(i8),
    /// Varint.
    U16(u16),
    /// Zigzag varint.
    I16(i16),
    /// Varint.
    U32(u32),
    /// Zigzag varint.
    I32(i32),
    /// Varint.
    U64(u64),
    /// Zigzag varint.
    I64(i64),
    /// UTF-16 code unit.
    Char(u16),
    /// Promoted to `f64` on the wire.
    F32(f32),
    /// Bit pattern as a zigzag varint.
    F64(f64),
    /// Four zigzag varint components.
    Decimal(Decimal),
    /// Kind byte plus UTC ticks.
    Timestamp(Timestamp),
    /// Sixteen raw bytes.
    Guid(Uuid),
    /// Length-prefixed UTF-16 code units.
    String(Option<String>),
    /// Length-prefixed raw bytes.
    Bytes(Option<Bytes>),
}

impl Value {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::U8(_) => ValueKind::U8,
            Value::I8(_) => ValueKind::I8,
            Value::U16(_) => ValueKind::U16,
            Value::I16(_) => ValueKind::I16,
            Value::U32(_) => ValueKind::U32,
            Value::I32(_) => ValueKind::I32,
            Value::U64(_) => ValueKind::U64,
            Value::I64(_) => ValueKind::I64,
            Value::Char(_) => ValueKind::Char,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Guid(_) => ValueKind::Guid,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::Char(unit) => match char::from_u32(u32::from(*unit)) {
                Some(ch) => write!(f, "{ch:?}"),
                None => write!(f, "\\u{{{unit:04x}}}"),
            },
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Timestamp(ts) => match ts.to_naive() {
                Ok(naive) => write!(f, "{naive} ({:?})", ts.kind()),
                Err(_) => write!(f, "{} ticks ({:?})", ts.ticks(), ts.kind()),
            },
            Value::Guid(v) => write!(f, "{v}"),
            Value::String(Some(s)) => write!(f, "{s:?}"),
            Value::Bytes(Some(b)) => {
                for byte in b.iter() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Value::String(None) | Value::Bytes(None) => f.write_str("null"),
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Bool,
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    Timestamp => Timestamp,
    Uuid => Guid,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Some(value.to_owned()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Some(value))
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Bytes(Some(value))
    }
}

/// One position in a sequence of wire values: a kind and whether it may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slot {
    /// Kind stored in the slot.
    pub kind: ValueKind,
    /// Whether the slot uses the kind's nullable envelope.
    pub nullable: bool,
}

impl Slot {
    /// A slot that always holds a value.
    pub const fn required(kind: ValueKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// A slot that may hold no value.
    pub const fn nullable(kind: ValueKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl FromStr for Slot {
    type Err = Error;

    /// Parses `kind` or `kind?`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_suffix('?') {
            Some(kind) => Ok(Slot::nullable(kind.trim().parse()?)),
            None => Ok(Slot::required(s.parse()?)),
        }
    }
}

/// Parses a comma-separated slot layout such as `"bool,i32?,string"`.
pub fn parse_layout(layout: &str) -> Result<Vec<Slot>> {
    layout
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}
