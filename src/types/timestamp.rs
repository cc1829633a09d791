use chrono::{DateTime, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::DateTimeKind;

/// Number of 100 ns ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;
/// Tick count of 1970-01-01T00:00:00 measured from 0001-01-01T00:00:00.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// A point in time as a tick count since 0001-01-01T00:00:00, tagged with the
/// timezone interpretation of those ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp {
    ticks: i64,
    kind: DateTimeKind,
}

impl Timestamp {
    /// Creates a timestamp from raw ticks.
    pub const fn new(ticks: i64, kind: DateTimeKind) -> Self {
        Self { ticks, kind }
    }

    /// Tick count in the timestamp's own timezone interpretation.
    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Timezone interpretation of [`ticks`](Self::ticks).
    pub const fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// Converts a UTC date-time, truncating below tick precision.
    pub fn from_utc(value: DateTime<Utc>) -> Result<Self> {
        Ok(Self::new(naive_to_ticks(&value.naive_utc())?, DateTimeKind::Utc))
    }

    /// Converts a naive wall-clock date-time with an explicit interpretation.
    pub fn from_naive(value: NaiveDateTime, kind: DateTimeKind) -> Result<Self> {
        Ok(Self::new(naive_to_ticks(&value)?, kind))
    }

    /// Returns the ticks as a naive date-time in the timestamp's own interpretation.
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        ticks_to_naive(self.ticks)
    }

    /// Tick count as written on the wire: local ticks are shifted to UTC.
    pub fn to_utc_ticks(&self) -> Result<i64> {
        match self.kind {
            DateTimeKind::Local => local_to_utc_ticks(self.ticks),
            DateTimeKind::Utc | DateTimeKind::Unspecified => Ok(self.ticks),
        }
    }

    /// Rebuilds a timestamp from wire ticks, shifting UTC back to local for
    /// [`DateTimeKind::Local`].
    pub fn from_utc_ticks(ticks: i64, kind: DateTimeKind) -> Result<Self> {
        let ticks = match kind {
            DateTimeKind::Local => utc_to_local_ticks(ticks)?,
            DateTimeKind::Utc | DateTimeKind::Unspecified => ticks,
        };
        Ok(Self::new(ticks, kind))
    }
}

fn ticks_to_naive(ticks: i64) -> Result<NaiveDateTime> {
    let relative = ticks
        .checked_sub(UNIX_EPOCH_TICKS)
        .ok_or(Error::TimestampOutOfRange(ticks))?;
    let secs = relative.div_euclid(TICKS_PER_SECOND);
    let nanos = (relative.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
        .map(|value| value.naive_utc())
        .ok_or(Error::TimestampOutOfRange(ticks))
}

fn naive_to_ticks(value: &NaiveDateTime) -> Result<i64> {
    let utc = value.and_utc();
    let secs = utc.timestamp();
    let sub_ticks = i64::from(utc.timestamp_subsec_nanos() / 100);
    secs.checked_mul(TICKS_PER_SECOND)
        .and_then(|ticks| ticks.checked_add(sub_ticks))
        .and_then(|ticks| ticks.checked_add(UNIX_EPOCH_TICKS))
        .ok_or_else(|| {
            let ticks = secs
                .saturating_mul(TICKS_PER_SECOND)
                .saturating_add(UNIX_EPOCH_TICKS);
            Error::TimestampOutOfRange(ticks)
        })
}

fn offset_ticks(seconds: i32, ticks: i64) -> Result<i64> {
    i64::from(seconds)
        .checked_mul(TICKS_PER_SECOND)
        .ok_or(Error::TimestampOutOfRange(ticks))
}

fn local_to_utc_ticks(ticks: i64) -> Result<i64> {
    let naive = ticks_to_naive(ticks)?;
    // A wall-clock time skipped by a DST jump has no local offset; borrow the one in
    // effect at the same UTC instant.
    let offset = match Local.offset_from_local_datetime(&naive) {
        LocalResult::Single(offset) | LocalResult::Ambiguous(offset, _) => offset,
        LocalResult::None => Local.offset_from_utc_datetime(&naive),
    };
    let shift = offset_ticks(offset.fix().local_minus_utc(), ticks)?;
    ticks
        .checked_sub(shift)
        .ok_or(Error::TimestampOutOfRange(ticks))
}

fn utc_to_local_ticks(ticks: i64) -> Result<i64> {
    let naive = ticks_to_naive(ticks)?;
    let offset = Local.offset_from_utc_datetime(&naive);
    let shift = offset_ticks(offset.fix().local_minus_utc(), ticks)?;
    ticks
        .checked_add(shift)
        .ok_or(Error::TimestampOutOfRange(ticks))
}
