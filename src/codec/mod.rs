//! Typed value codec: per-type wire encoders and decoders built on the varint and
//! zigzag layers.
//!
//! Every supported type implements [`WireEncode`] and [`WireDecode`]; types with a
//! nullable form additionally implement [`Nullable`], whose
//! [`NULL_ENCODING`](Nullable::NULL_ENCODING) pins the absence convention used on the
//! wire. Strings and byte arrays are nullable through their length prefix and have
//! dedicated functions in this module.

use std::io::{Read, Write};

use crate::error::Result;
use crate::types::NullEncoding;

mod composite;
mod dynamic;
mod nullable;
mod scalar;
mod sequence;

pub use composite::{decimal_from_bits, decimal_to_bits};
pub use dynamic::{read_values, write_values};
pub use sequence::{
    byte_array_encoded_len, read_byte_array, read_length_prefixed, read_string,
    string_encoded_len, write_byte_array, write_length_prefixed, write_string,
};

/// Types that can be written to the wire.
pub trait WireEncode {
    /// Writes `self` to `writer`.
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()>;

    /// Number of bytes [`encode`](Self::encode) writes for `self`.
    fn encoded_len(&self) -> usize;
}

/// Types that can be read back from the wire.
pub trait WireDecode: Sized {
    /// Reads one value from `reader`, consuming exactly its encoded bytes.
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self>;
}

/// Types with a nullable wire form.
pub trait Nullable: WireEncode + WireDecode {
    /// Absence convention of this type. Fixed for wire compatibility.
    const NULL_ENCODING: NullEncoding;

    /// Writes an optional value using the type's absence convention.
    fn encode_nullable<W: Write + ?Sized>(value: Option<&Self>, writer: &mut W) -> Result<()>;

    /// Reads an optional value using the type's absence convention.
    fn decode_nullable<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Self>>;

    /// Number of bytes [`encode_nullable`](Self::encode_nullable) writes.
    fn nullable_encoded_len(value: Option<&Self>) -> usize;
}

/// Writes `value` to `writer`.
#[inline]
pub fn write_value<T, W>(writer: &mut W, value: &T) -> Result<()>
where
    T: WireEncode + ?Sized,
    W: Write + ?Sized,
{
    value.encode(writer)
}

/// Reads a `T` from `reader`.
#[inline]
pub fn read_value<T, R>(reader: &mut R) -> Result<T>
where
    T: WireDecode,
    R: Read + ?Sized,
{
    T::decode(reader)
}

/// Writes an optional `T` to `writer`.
#[inline]
pub fn write_nullable<T, W>(writer: &mut W, value: Option<&T>) -> Result<()>
where
    T: Nullable,
    W: Write + ?Sized,
{
    T::encode_nullable(value, writer)
}

/// Reads an optional `T` from `reader`.
#[inline]
pub fn read_nullable<T, R>(reader: &mut R) -> Result<Option<T>>
where
    T: Nullable,
    R: Read + ?Sized,
{
    T::decode_nullable(reader)
}
