//! ZigZag mapping between signed integers and unsigned integers of the same width.
//!
//! Small magnitudes of either sign map to small unsigned values:
//! `0 -> 0`, `-1 -> 1`, `1 -> 2`, `-2 -> 3`, ...

/// Maps an `i32` onto a `u32`.
#[inline]
pub const fn encode32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`encode32`].
#[inline]
pub const fn decode32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Maps an `i64` onto a `u64`.
#[inline]
pub const fn encode64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`encode64`].
#[inline]
pub const fn decode64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
