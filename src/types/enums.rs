#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Timezone tag carried in front of every encoded [`Timestamp`](crate::Timestamp).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum DateTimeKind {
    /// Neither local nor UTC; ticks are written as-is.
    #[default]
    Unspecified = 0,
    /// Ticks are already UTC.
    Utc = 1,
    /// Ticks are local wall-clock time; normalized to UTC on the wire.
    Local = 2,
}

/// How a nullable value marks absence on the wire.
///
/// The assignment per type is fixed by [`Nullable::NULL_ENCODING`](crate::Nullable)
/// and must not change, or previously written data stops decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullEncoding {
    /// A `0`/`1` presence byte followed by the value when present.
    PresenceByte,
    /// `0` for absent, otherwise the carrier value plus one.
    OffsetByOne,
}

/// Every type the codec knows how to put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ValueKind {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    /// UTF-16 code unit.
    Char,
    F32,
    F64,
    Decimal,
    Timestamp,
    Guid,
    String,
    Bytes,
}

impl ValueKind {
    /// All kinds, in declaration order.
    pub const ALL: [ValueKind; 17] = [
        ValueKind::Bool,
        ValueKind::U8,
        ValueKind::I8,
        ValueKind::U16,
        ValueKind::I16,
        ValueKind::U32,
        ValueKind::I32,
        ValueKind::U64,
        ValueKind::I64,
        ValueKind::Char,
        ValueKind::F32,
        ValueKind::F64,
        ValueKind::Decimal,
        ValueKind::Timestamp,
        ValueKind::Guid,
        ValueKind::String,
        ValueKind::Bytes,
    ];

    /// Short lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::U8 => "u8",
            ValueKind::I8 => "i8",
            ValueKind::U16 => "u16",
            ValueKind::I16 => "i16",
            ValueKind::U32 => "u32",
            ValueKind::I32 => "i32",
            ValueKind::U64 => "u64",
            ValueKind::I64 => "i64",
            ValueKind::Char => "char",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Decimal => "decimal",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Guid => "guid",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
        }
    }

    /// The absence convention used by the nullable form of this kind.
    ///
    /// Strings and byte arrays fold absence into their `length + 1` prefix.
    pub const fn null_encoding(self) -> NullEncoding {
        match self {
            ValueKind::Bool
            | ValueKind::U64
            | ValueKind::I64
            | ValueKind::F32
            | ValueKind::F64
            | ValueKind::Decimal
            | ValueKind::Timestamp
            | ValueKind::Guid => NullEncoding::PresenceByte,
            ValueKind::U8
            | ValueKind::I8
            | ValueKind::U16
            | ValueKind::I16
            | ValueKind::U32
            | ValueKind::I32
            | ValueKind::Char
            | ValueKind::String
            | ValueKind::Bytes => NullEncoding::OffsetByOne,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::parse(format!("unknown value kind `{s}`")))
    }
}
