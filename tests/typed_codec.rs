use std::fmt::Debug;
use std::io::{self, Cursor, Read, Write};

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use varstream::codec::{
    byte_array_encoded_len, decimal_from_bits, decimal_to_bits, string_encoded_len,
};
use varstream::encoding::{VARINT32_MAX_LEN, write_varint32, write_varint64};
use varstream::{
    DateTimeKind, Decimal, Error, Guid, NullEncoding, Nullable, Timestamp, WireDecode, WireEncode,
    read_byte_array, read_nullable, read_string, read_value, write_byte_array, write_nullable,
    write_string, write_value,
};

/// Stream with one leading byte, so positions are never accidentally zero-based.
fn offset_stream() -> Result<Cursor<Vec<u8>>> {
    let mut cursor = Cursor::new(Vec::new());
    cursor.write_all(&[0xaa])?;
    Ok(cursor)
}

fn assert_round_trip<T>(value: T) -> Result<()>
where
    T: WireEncode + WireDecode + PartialEq + Debug,
{
    let mut cursor = offset_stream()?;
    write_value(&mut cursor, &value)?;
    let end = cursor.position();
    assert_eq!(end - 1, value.encoded_len() as u64, "encoded_len of {value:?}");

    cursor.set_position(1);
    let decoded: T = read_value(&mut cursor)?;
    assert_eq!(decoded, value);
    assert_eq!(cursor.position(), end, "cursor after reading {value:?}");
    Ok(())
}

fn assert_nullable_round_trip<T>(value: Option<T>) -> Result<()>
where
    T: Nullable + PartialEq + Debug,
{
    let mut cursor = offset_stream()?;
    write_nullable(&mut cursor, value.as_ref())?;
    let end = cursor.position();
    assert_eq!(end - 1, T::nullable_encoded_len(value.as_ref()) as u64);

    cursor.set_position(1);
    let decoded: Option<T> = read_nullable(&mut cursor)?;
    assert_eq!(decoded, value);
    assert_eq!(cursor.position(), end, "cursor after reading {value:?}");
    Ok(())
}

fn encoded<T: WireEncode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn encoded_nullable<T: Nullable>(value: Option<&T>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_nullable(&mut out, value)?;
    Ok(out)
}

/// Values straddling every 7-bit group boundary, both signs, plus the extremes.
fn boundary_values() -> Vec<i128> {
    let mut values = vec![0, 1, -1, 2, -2];
    for bits in (7..=63).step_by(7).chain([8, 15, 16, 31, 32, 63, 64]) {
        let edge = 1i128 << bits;
        values.extend([edge - 1, edge, edge + 1, -edge, -edge - 1, -edge + 1]);
    }
    values
}

macro_rules! round_trip_integers {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            #[test]
            fn $name() -> Result<()> {
                let mut values: Vec<$ty> = boundary_values()
                    .into_iter()
                    .filter_map(|v| <$ty>::try_from(v).ok())
                    .collect();
                values.extend([<$ty>::MIN, <$ty>::MAX]);
                for value in values {
                    assert_round_trip(value)?;
                    assert_nullable_round_trip(Some(value))?;
                }
                assert_nullable_round_trip::<$ty>(None)?;
                Ok(())
            }
        )*
    };
}

round_trip_integers! {
    round_trips_u8 => u8,
    round_trips_i8 => i8,
    round_trips_u16 => u16,
    round_trips_i16 => i16,
    round_trips_u32 => u32,
    round_trips_i32 => i32,
    round_trips_u64 => u64,
    round_trips_i64 => i64,
}

#[test]
fn integer_wire_layouts() -> Result<()> {
    assert_eq!(encoded(&200u8)?, vec![200]);
    assert_eq!(encoded(&-1i8)?, vec![0xff]);
    assert_eq!(encoded(&300u16)?, vec![0xac, 0x02]);
    assert_eq!(encoded(&-1i16)?, vec![0x01]);
    assert_eq!(encoded(&-1i32)?, vec![0x01]);
    assert_eq!(encoded(&1i32)?, vec![0x02]);
    assert_eq!(encoded(&42i32)?, vec![84]);
    assert_eq!(encoded(&i32::MIN)?, vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    assert_eq!(encoded(&u64::MAX)?.len(), 10);
    assert_eq!(encoded(&i64::MIN)?.len(), 10);
    Ok(())
}

#[test]
fn offset_by_one_types_fold_absence_into_the_carrier() -> Result<()> {
    assert_eq!(encoded_nullable::<i32>(None)?, vec![0x00]);
    assert_eq!(encoded_nullable(Some(&0i32))?, vec![0x01]);
    assert_eq!(encoded_nullable(Some(&-1i32))?, vec![0x02]);
    assert_eq!(encoded_nullable(Some(&1i32))?, vec![0x03]);
    assert_eq!(encoded_nullable(Some(&0u8))?, vec![0x01]);
    assert_eq!(encoded_nullable(Some(&255u8))?, vec![0x80, 0x02]);
    assert_eq!(encoded_nullable(Some(&u32::MAX))?.len(), 5);
    assert_eq!(encoded_nullable(Some(&i32::MIN))?.len(), 5);

    assert_eq!(<u8 as Nullable>::NULL_ENCODING, NullEncoding::OffsetByOne);
    assert_eq!(<i8 as Nullable>::NULL_ENCODING, NullEncoding::OffsetByOne);
    assert_eq!(<u16 as Nullable>::NULL_ENCODING, NullEncoding::OffsetByOne);
    assert_eq!(<i16 as Nullable>::NULL_ENCODING, NullEncoding::OffsetByOne);
    assert_eq!(<u32 as Nullable>::NULL_ENCODING, NullEncoding::OffsetByOne);
    assert_eq!(<i32 as Nullable>::NULL_ENCODING, NullEncoding::OffsetByOne);
    Ok(())
}

#[test]
fn wide_carriers_beyond_32_bits_are_rejected() -> Result<()> {
    let mut out = Vec::new();
    write_varint64(&mut out, (1u64 << 32) + 1)?;
    for result in [
        read_nullable::<u32, _>(&mut out.as_slice()).map(|_| ()),
        read_nullable::<i32, _>(&mut out.as_slice()).map(|_| ()),
    ] {
        assert!(matches!(
            result,
            Err(Error::MalformedVarint {
                max_len: VARINT32_MAX_LEN
            })
        ));
    }

    // The largest legal carrier still decodes.
    let mut out = Vec::new();
    write_varint64(&mut out, 1u64 << 32)?;
    assert_eq!(read_nullable::<u32, _>(&mut out.as_slice())?, Some(u32::MAX));
    assert_eq!(read_nullable::<i32, _>(&mut out.as_slice())?, Some(i32::MIN));
    Ok(())
}

#[test]
fn presence_byte_types_prefix_a_flag() -> Result<()> {
    assert_eq!(encoded_nullable::<i64>(None)?, vec![0x00]);
    assert_eq!(encoded_nullable(Some(&-1i64))?, vec![0x01, 0x01]);
    assert_eq!(encoded_nullable(Some(&0u64))?, vec![0x01, 0x00]);
    assert_eq!(encoded_nullable(Some(&true))?, vec![0x01, 0x01]);
    assert_eq!(encoded_nullable::<bool>(None)?, vec![0x00]);
    assert_eq!(encoded_nullable::<Guid>(None)?, vec![0x00]);
    assert_eq!(encoded_nullable::<Decimal>(None)?, vec![0x00]);
    assert_eq!(encoded_nullable::<f64>(None)?, vec![0x00]);
    assert_eq!(encoded_nullable::<f32>(None)?, vec![0x00]);
    assert_eq!(encoded_nullable::<Timestamp>(None)?, vec![0x00]);

    assert_eq!(<bool as Nullable>::NULL_ENCODING, NullEncoding::PresenceByte);
    assert_eq!(<i64 as Nullable>::NULL_ENCODING, NullEncoding::PresenceByte);
    assert_eq!(<u64 as Nullable>::NULL_ENCODING, NullEncoding::PresenceByte);
    assert_eq!(<f32 as Nullable>::NULL_ENCODING, NullEncoding::PresenceByte);
    assert_eq!(<f64 as Nullable>::NULL_ENCODING, NullEncoding::PresenceByte);
    assert_eq!(<Decimal as Nullable>::NULL_ENCODING, NullEncoding::PresenceByte);
    assert_eq!(<Guid as Nullable>::NULL_ENCODING, NullEncoding::PresenceByte);
    assert_eq!(<Timestamp as Nullable>::NULL_ENCODING, NullEncoding::PresenceByte);

    assert_nullable_round_trip::<f32>(None)?;
    assert_nullable_round_trip::<f64>(None)?;
    assert_nullable_round_trip::<Decimal>(None)?;
    assert_nullable_round_trip::<Guid>(None)?;
    assert_nullable_round_trip::<i64>(None)?;
    assert_nullable_round_trip::<u64>(None)?;
    assert_nullable_round_trip::<Timestamp>(None)?;
    Ok(())
}

#[test]
fn invalid_presence_byte_is_rejected() {
    let mut cursor = Cursor::new(vec![0x02, 0x00]);
    let err = read_nullable::<f64, _>(&mut cursor).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedDiscriminant { value: 2, .. }
    ));
}

#[test]
fn booleans_are_single_bytes() -> Result<()> {
    assert_eq!(encoded(&true)?, vec![1]);
    assert_eq!(encoded(&false)?, vec![0]);
    assert_round_trip(true)?;
    assert_round_trip(false)?;
    assert_nullable_round_trip(Some(false))?;
    assert_nullable_round_trip::<bool>(None)?;

    let mut cursor = Cursor::new(vec![7u8]);
    assert!(matches!(
        read_value::<bool, _>(&mut cursor),
        Err(Error::UnsupportedDiscriminant { value: 7, .. })
    ));
    Ok(())
}

#[test]
fn floats_round_trip_through_their_bit_patterns() -> Result<()> {
    for value in [0.0f64, -0.0, 1.0, -1.5, f64::MIN_POSITIVE, f64::MAX, f64::MIN, f64::INFINITY] {
        assert_round_trip(value)?;
        assert_nullable_round_trip(Some(value))?;
    }
    for value in [0.0f32, 3.25, -7.5e-3, f32::MAX, f32::NEG_INFINITY] {
        assert_round_trip(value)?;
        assert_nullable_round_trip(Some(value))?;
    }

    let mut cursor = Cursor::new(Vec::new());
    write_value(&mut cursor, &f64::NAN)?;
    cursor.set_position(0);
    assert!(read_value::<f64, _>(&mut cursor)?.is_nan());

    assert_eq!(encoded(&-0.0f64)?, encoded(&((-0.0f64).to_bits() as i64))?);
    // f32 has no narrow wire format.
    assert_eq!(encoded(&1.5f32)?, encoded(&1.5f64)?);
    Ok(())
}

#[test]
fn chars_share_the_u16_encoding() -> Result<()> {
    let unit = 'é' as u16;
    assert_eq!(encoded(&unit)?, vec![0xe9, 0x01]);
    assert_eq!(encoded_nullable(Some(&unit))?, vec![0xea, 0x01]);
    assert_round_trip(0xd83du16)?;
    Ok(())
}

#[test]
fn decimals_split_into_four_components() -> Result<()> {
    let value = Decimal::new(-12_345, 2);
    assert_eq!(
        decimal_to_bits(&value),
        [12_345, 0, 0, 0x8002_0000u32 as i32]
    );
    assert_eq!(decimal_from_bits(decimal_to_bits(&value))?, value);

    for value in [
        Decimal::ZERO,
        Decimal::ONE,
        Decimal::NEGATIVE_ONE,
        Decimal::MAX,
        Decimal::MIN,
        Decimal::new(1, 28),
        Decimal::new(123_456_789_012_345, 7),
    ] {
        assert_round_trip(value)?;
        assert_nullable_round_trip(Some(value))?;
    }
    Ok(())
}

#[test]
fn negative_zero_decimal_keeps_its_sign_on_the_wire() -> Result<()> {
    let bytes = encoded(&-Decimal::ZERO)?;
    assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0x0f]);

    let decoded: Decimal = read_value(&mut bytes.as_slice())?;
    assert!(decoded.is_zero());
    assert!(decoded.is_sign_negative());
    assert_eq!(encoded(&decoded)?, bytes);

    let scaled = decimal_from_bits([0, 0, 0, 0x8003_0000u32 as i32])?;
    assert_eq!(decimal_to_bits(&scaled), [0, 0, 0, 0x8003_0000u32 as i32]);
    Ok(())
}

#[test]
fn decimals_with_invalid_flags_are_rejected() -> Result<()> {
    for flags in [29 << 16, 1, 0x0100_0000] {
        let mut cursor = Cursor::new(Vec::new());
        for word in [1i32, 0, 0, flags] {
            write_value(&mut cursor, &word)?;
        }
        cursor.set_position(0);
        let err = read_value::<Decimal, _>(&mut cursor).unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedDiscriminant { .. }),
            "flags {flags:#x}: {err}"
        );
    }
    Ok(())
}

#[test]
fn utc_and_unspecified_timestamps_keep_their_ticks() -> Result<()> {
    let new_year = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let ts = Timestamp::from_utc(new_year)?;
    assert_eq!(ts.ticks(), 637_134_336_000_000_000);
    assert_eq!(ts.kind(), DateTimeKind::Utc);
    assert_round_trip(ts)?;
    assert_nullable_round_trip(Some(ts))?;

    let bytes = encoded(&Timestamp::new(5, DateTimeKind::Unspecified))?;
    assert_eq!(bytes, vec![0x00, 0x0a]);
    let bytes = encoded(&Timestamp::new(-1, DateTimeKind::Utc))?;
    assert_eq!(bytes, vec![0x01, 0x01]);

    for ticks in [0, 1, i64::from(u32::MAX), 3_155_378_975_999_999_999] {
        assert_round_trip(Timestamp::new(ticks, DateTimeKind::Unspecified))?;
        assert_round_trip(Timestamp::new(ticks, DateTimeKind::Utc))?;
    }
    Ok(())
}

#[test]
fn local_timestamps_travel_as_utc_ticks() -> Result<()> {
    let naive = NaiveDate::from_ymd_opt(2021, 1, 15)
        .and_then(|date| date.and_hms_opt(12, 30, 0))
        .unwrap();
    let local = Timestamp::from_naive(naive, DateTimeKind::Local)?;
    let utc_ticks = local.to_utc_ticks()?;

    let mut expected = vec![u8::from(DateTimeKind::Local)];
    write_value(&mut expected, &utc_ticks)?;
    assert_eq!(encoded(&local)?, expected);

    assert_round_trip(local)?;
    assert_eq!(local.to_naive()?, naive);
    Ok(())
}

#[test]
fn unrepresentable_dates_report_saturated_ticks() {
    let err = Timestamp::from_naive(NaiveDateTime::MAX, DateTimeKind::Utc).unwrap_err();
    assert!(matches!(err, Error::TimestampOutOfRange(i64::MAX)));
}

#[test]
fn unknown_timestamp_kind_is_rejected() {
    let mut cursor = Cursor::new(vec![0x03, 0x00]);
    let err = read_value::<Timestamp, _>(&mut cursor).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedDiscriminant { value: 3, .. }
    ));
    assert_eq!(cursor.position(), 1);
}

#[test]
fn guids_are_sixteen_raw_bytes_in_mixed_endian_order() -> Result<()> {
    let guid: Guid = "00112233-4455-6677-8899-aabbccddeeff".parse()?;
    assert_eq!(
        encoded(&guid)?,
        vec![
            0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff
        ]
    );
    assert_round_trip(guid)?;
    assert_round_trip(Guid::nil())?;
    assert_nullable_round_trip(Some("11111111-2222-3333-4444-555555555555".parse::<Guid>()?))?;
    assert_eq!(encoded_nullable(Some(&guid))?.len(), 17);
    Ok(())
}

#[test]
fn strings_distinguish_null_from_empty() -> Result<()> {
    let mut null = Vec::new();
    write_string(&mut null, None)?;
    assert_eq!(null, vec![0x00]);

    let mut empty = Vec::new();
    write_string(&mut empty, Some(""))?;
    assert_eq!(empty, vec![0x01]);

    assert_eq!(read_string(&mut null.as_slice())?, None);
    assert_eq!(read_string(&mut empty.as_slice())?.as_deref(), Some(""));
    Ok(())
}

#[test]
fn strings_encode_each_utf16_unit() -> Result<()> {
    let mut out = Vec::new();
    write_string(&mut out, Some("héllo"))?;
    assert_eq!(out, vec![0x06, 0x68, 0xe9, 0x01, 0x6c, 0x6c, 0x6f]);
    assert_eq!(string_encoded_len(Some("héllo")), out.len());

    for text in ["héllo", "日本語", "emoji 🦀 pair", "ascii only", ""] {
        let mut cursor = offset_stream()?;
        write_string(&mut cursor, Some(text))?;
        let end = cursor.position();
        assert_eq!(end - 1, string_encoded_len(Some(text)) as u64);
        cursor.set_position(1);
        assert_eq!(read_string(&mut cursor)?.as_deref(), Some(text));
        assert_eq!(cursor.position(), end);
    }
    Ok(())
}

#[test]
fn unpaired_surrogates_are_rejected() -> Result<()> {
    let mut out = Vec::new();
    write_varint32(&mut out, 2)?;
    write_value(&mut out, &0xd800u16)?;
    assert!(matches!(
        read_string(&mut out.as_slice()),
        Err(Error::InvalidUtf16)
    ));
    Ok(())
}

#[test]
fn byte_arrays_are_copied_verbatim() -> Result<()> {
    let payload: Vec<u8> = (0..=255).collect();
    let mut cursor = offset_stream()?;
    write_byte_array(&mut cursor, Some(payload.as_slice()))?;
    write_byte_array(&mut cursor, Some(&[][..]))?;
    write_byte_array(&mut cursor, None)?;
    let end = cursor.position();
    assert_eq!(
        end - 1,
        (byte_array_encoded_len(Some(payload.as_slice())) + 1 + 1) as u64
    );

    cursor.set_position(1);
    assert_eq!(read_byte_array(&mut cursor)?, Some(payload));
    assert_eq!(read_byte_array(&mut cursor)?, Some(Vec::new()));
    assert_eq!(read_byte_array(&mut cursor)?, None);
    assert_eq!(cursor.position(), end);
    Ok(())
}

#[test]
fn truncated_values_report_end_of_stream() -> Result<()> {
    let mut out = Vec::new();
    write_byte_array(&mut out, Some(&b"abcdef"[..]))?;
    out.truncate(4);
    assert!(matches!(
        read_byte_array(&mut out.as_slice()),
        Err(Error::EndOfStream)
    ));

    let mut out = Vec::new();
    write_string(&mut out, Some("abc"))?;
    out.pop();
    assert!(matches!(read_string(&mut out.as_slice()), Err(Error::EndOfStream)));

    let guid_prefix = [0u8; 15];
    assert!(matches!(
        read_value::<Guid, _>(&mut guid_prefix.as_slice()),
        Err(Error::EndOfStream)
    ));
    assert!(matches!(
        read_value::<u8, _>(&mut Cursor::new(Vec::<u8>::new())),
        Err(Error::EndOfStream)
    ));
    Ok(())
}

/// Reader handing out one byte per call.
struct Trickle<'a>(&'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn byte_arrays_read_exactly_their_payload_from_slow_readers() -> Result<()> {
    let mut out = Vec::new();
    write_byte_array(&mut out, Some(&b"abc"[..]))?;
    out.extend_from_slice(b"tail");

    let mut reader = Trickle(&out);
    let bytes = read_byte_array(&mut reader)?;
    assert_eq!(bytes.as_deref(), Some(&b"abc"[..]));
    assert!(bytes.is_some_and(|bytes| bytes.capacity() < 64));
    assert_eq!(reader.0, b"tail");

    let mut short = Trickle(&out[..3]);
    assert!(matches!(read_byte_array(&mut short), Err(Error::EndOfStream)));
    Ok(())
}
