//! Encoding helpers (varints, zig-zag encoding).

mod varint;
pub mod zigzag;

pub use varint::{
    VARINT32_MAX_LEN, VARINT64_MAX_LEN, VarintBuf, encode_varint64_into, read_varint32,
    read_varint64, varint32_len, varint64_len, write_varint32, write_varint64,
};
