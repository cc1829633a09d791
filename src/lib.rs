#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Typed value codec built on the varint and zigzag layers.
pub mod codec;
/// Varint and zigzag primitives.
pub mod encoding;
/// Shared error and result types.
pub mod error;
/// Byte-stream helpers over `std::io`.
pub mod io;
/// Reader/writer adapter binding the codec to one stream.
pub mod stream;
/// Domain types carried by the codec.
pub mod types;

/// Tokio helpers for length-prefixed frames.
#[cfg(feature = "async")]
pub mod async_support;

#[cfg(feature = "async")]
pub use async_support::{AsyncFrameWriter, read_frame, write_frame};
pub use codec::{
    Nullable, WireDecode, WireEncode, read_byte_array, read_nullable, read_string, read_value,
    read_values, write_byte_array, write_nullable, write_string, write_value, write_values,
};
pub use encoding::{read_varint32, read_varint64, write_varint32, write_varint64};
pub use error::{Error, Result};
pub use stream::{StreamBuilder, StreamOptions, ValueReader, ValueStream, ValueWriter};
pub use types::*;
