use std::io::Cursor;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::codec::{Nullable, WireDecode};
use crate::error::Result;
use crate::types::{Slot, Timestamp, Value};

macro_rules! typed_reads {
    ($($read:ident, $read_nullable:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Reads a `", stringify!($ty), "`.")]
            fn $read(&mut self) -> Result<$ty> {
                self.read_value()
            }

            #[doc = concat!("Reads an optional `", stringify!($ty), "`.")]
            fn $read_nullable(&mut self) -> Result<Option<$ty>> {
                self.read_nullable()
            }
        )*
    };
}

/// Reading half of the typed value protocol.
pub trait ValueReader {
    /// Reads any [`WireDecode`] type.
    fn read_value<T: WireDecode>(&mut self) -> Result<T>;

    /// Reads any [`Nullable`] type in its nullable form.
    fn read_nullable<T: Nullable>(&mut self) -> Result<Option<T>>;

    /// Reads a length-prefixed string; `None` is a null string.
    fn read_string(&mut self) -> Result<Option<String>>;

    /// Reads a length-prefixed byte array; `None` is a null array.
    fn read_byte_array(&mut self) -> Result<Option<Vec<u8>>>;

    /// Reads one dynamically typed value.
    fn read_slot(&mut self, slot: &Slot) -> Result<Option<Value>>;

    /// Reads an embedded stream into a new in-memory stream positioned at its start.
    fn read_length_prefixed(&mut self) -> Result<Cursor<Vec<u8>>>;

    /// [`read_length_prefixed`](Self::read_length_prefixed) with an explicit copy
    /// buffer size.
    fn read_length_prefixed_with(&mut self, buffer_size: usize) -> Result<Cursor<Vec<u8>>>;

    /// Reads a UTF-16 code unit.
    fn read_char(&mut self) -> Result<u16> {
        self.read_value()
    }

    /// Reads an optional UTF-16 code unit.
    fn read_nullable_char(&mut self) -> Result<Option<u16>> {
        self.read_nullable()
    }

    typed_reads! {
        read_bool, read_nullable_bool => bool;
        read_u8, read_nullable_u8 => u8;
        read_i8, read_nullable_i8 => i8;
        read_u16, read_nullable_u16 => u16;
        read_i16, read_nullable_i16 => i16;
        read_u32, read_nullable_u32 => u32;
        read_i32, read_nullable_i32 => i32;
        read_u64, read_nullable_u64 => u64;
        read_i64, read_nullable_i64 => i64;
        read_f32, read_nullable_f32 => f32;
        read_f64, read_nullable_f64 => f64;
        read_decimal, read_nullable_decimal => Decimal;
        read_timestamp, read_nullable_timestamp => Timestamp;
        read_guid, read_nullable_guid => Uuid;
    }
}
