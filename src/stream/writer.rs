use std::io::{Read, Seek};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::codec::{Nullable, WireEncode};
use crate::error::Result;
use crate::types::{Slot, Timestamp, Value};

macro_rules! typed_writes {
    ($($write:ident, $write_nullable:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Writes a `", stringify!($ty), "`.")]
            fn $write(&mut self, value: $ty) -> Result<()> {
                self.write_value(&value)
            }

            #[doc = concat!("Writes an optional `", stringify!($ty), "`.")]
            fn $write_nullable(&mut self, value: Option<$ty>) -> Result<()> {
                self.write_nullable(value.as_ref())
            }
        )*
    };
}

/// Writing half of the typed value protocol.
pub trait ValueWriter {
    /// Writes any [`WireEncode`] type.
    fn write_value<T: WireEncode + ?Sized>(&mut self, value: &T) -> Result<()>;

    /// Writes any [`Nullable`] type in its nullable form.
    fn write_nullable<T: Nullable>(&mut self, value: Option<&T>) -> Result<()>;

    /// Writes a length-prefixed string; `None` writes a null string.
    fn write_string(&mut self, value: Option<&str>) -> Result<()>;

    /// Writes a length-prefixed byte array; `None` writes a null array.
    fn write_byte_array(&mut self, value: Option<&[u8]>) -> Result<()>;

    /// Writes one dynamically typed value.
    fn write_slot(&mut self, slot: &Slot, value: Option<&Value>) -> Result<()>;

    /// Embeds the remaining bytes of `source`, prefixed by their count. Returns the
    /// number of payload bytes copied.
    fn write_length_prefixed<R: Read + Seek + ?Sized>(&mut self, source: &mut R) -> Result<u64>;

    /// [`write_length_prefixed`](Self::write_length_prefixed) with an explicit copy
    /// buffer size.
    fn write_length_prefixed_with<R: Read + Seek + ?Sized>(
        &mut self,
        source: &mut R,
        buffer_size: usize,
    ) -> Result<u64>;

    /// Flushes the bound stream.
    fn flush(&mut self) -> Result<()>;

    /// Writes a UTF-16 code unit.
    fn write_char(&mut self, value: u16) -> Result<()> {
        self.write_value(&value)
    }

    /// Writes an optional UTF-16 code unit.
    fn write_nullable_char(&mut self, value: Option<u16>) -> Result<()> {
        self.write_nullable(value.as_ref())
    }

    typed_writes! {
        write_bool, write_nullable_bool => bool;
        write_u8, write_nullable_u8 => u8;
        write_i8, write_nullable_i8 => i8;
        write_u16, write_nullable_u16 => u16;
        write_i16, write_nullable_i16 => i16;
        write_u32, write_nullable_u32 => u32;
        write_i32, write_nullable_i32 => i32;
        write_u64, write_nullable_u64 => u64;
        write_i64, write_nullable_i64 => i64;
        write_f32, write_nullable_f32 => f32;
        write_f64, write_nullable_f64 => f64;
        write_decimal, write_nullable_decimal => Decimal;
        write_timestamp, write_nullable_timestamp => Timestamp;
        write_guid, write_nullable_guid => Uuid;
    }
}
