use std::io::{Read, Write};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::codec::{WireDecode, WireEncode};
use crate::encoding::{read_varint64, varint64_len, write_varint64, zigzag};
use crate::error::{Error, Result};
use crate::io::{read_array, read_exact_byte};
use crate::types::{DateTimeKind, Timestamp};

const DECIMAL_SCALE_SHIFT: u32 = 16;
const DECIMAL_SCALE_MASK: u32 = 0x00ff_0000;
const DECIMAL_SIGN_MASK: u32 = 0x8000_0000;
const DECIMAL_MAX_SCALE: u32 = 28;

/// Splits a decimal into its `[lo, mid, hi, flags]` words.
///
/// The low three words hold the 96-bit magnitude; `flags` carries the scale in bits
/// 16..=23 and the sign in bit 31.
pub fn decimal_to_bits(value: &Decimal) -> [i32; 4] {
    let raw = value.serialize();
    let word = |at: usize| i32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
    // `serialize` lays out flags first.
    [word(4), word(8), word(12), word(0)]
}

/// Rebuilds a decimal from `[lo, mid, hi, flags]` words.
///
/// Fails with [`Error::UnsupportedDiscriminant`] when `flags` has reserved bits set or
/// a scale above 28.
pub fn decimal_from_bits(bits: [i32; 4]) -> Result<Decimal> {
    let [lo, mid, hi, flags] = bits.map(|word| word as u32);
    let scale = (flags & DECIMAL_SCALE_MASK) >> DECIMAL_SCALE_SHIFT;
    let reserved = flags & !(DECIMAL_SCALE_MASK | DECIMAL_SIGN_MASK);
    if reserved != 0 || scale > DECIMAL_MAX_SCALE {
        return Err(Error::discriminant("decimal flags", flags));
    }
    // Raw layout: flags first. Keeps the sign of a zero magnitude.
    let mut raw = [0u8; 16];
    for (chunk, word) in raw.chunks_exact_mut(4).zip([flags, lo, mid, hi]) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    Ok(Decimal::deserialize(raw))
}

impl WireEncode for Decimal {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        for word in decimal_to_bits(self) {
            word.encode(writer)?;
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        decimal_to_bits(self).iter().map(WireEncode::encoded_len).sum()
    }
}

impl WireDecode for Decimal {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let lo = i32::decode(reader)?;
        let mid = i32::decode(reader)?;
        let hi = i32::decode(reader)?;
        let flags = i32::decode(reader)?;
        decimal_from_bits([lo, mid, hi, flags])
    }
}

impl WireEncode for Timestamp {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let ticks = self.to_utc_ticks()?;
        writer.write_all(&[u8::from(self.kind())])?;
        write_varint64(writer, zigzag::encode64(ticks))?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        let ticks = self.to_utc_ticks().unwrap_or(self.ticks());
        1 + varint64_len(zigzag::encode64(ticks))
    }
}

impl WireDecode for Timestamp {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let tag = read_exact_byte(reader)?;
        let kind = DateTimeKind::try_from(tag)
            .map_err(|_| Error::discriminant("timestamp kind", tag))?;
        let ticks = zigzag::decode64(read_varint64(reader)?);
        Timestamp::from_utc_ticks(ticks, kind)
    }
}

impl WireEncode for Uuid {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes_le())?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        16
    }
}

impl WireDecode for Uuid {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Uuid::from_bytes_le(read_array::<16, _>(reader)?))
    }
}
