//! Calendar time handling: tick arithmetic, timestamp kinds and clock sources.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

/// Number of 100-nanosecond ticks in one second.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Tick count of 1970-01-01T00:00:00Z, counted from 0001-01-01T00:00:00Z.
pub const UNIX_EPOCH_TICKS: u64 = 621_355_968_000_000_000;

/// A calendar timestamp tagged with how its relation to UTC is known.
///
/// Only [`Timestamp::Utc`] and [`Timestamp::Local`] can be placed on the absolute timeline;
/// [`Timestamp::Unspecified`] is rejected by [`Generator::mint_at`](crate::Generator::mint_at).
///
/// # Examples
///
/// ```rust
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use hotguid::Timestamp;
///
/// let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
/// let local = Timestamp::from(tokyo.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
/// assert_eq!(local.to_utc(), Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Timestamp {
    /// A UTC instant.
    Utc(DateTime<Utc>),

    /// A local time with a known offset from UTC.
    Local(DateTime<FixedOffset>),

    /// A wall-clock reading with no offset information.
    Unspecified(NaiveDateTime),
}

impl Timestamp {
    /// Normalizes the timestamp to UTC, or returns `None` if the offset is unknown.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Utc(t) => Some(*t),
            Self::Local(t) => Some(t.with_timezone(&Utc)),
            Self::Unspecified(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(src: DateTime<Utc>) -> Self {
        Self::Utc(src)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(src: DateTime<FixedOffset>) -> Self {
        Self::Local(src)
    }
}

impl From<DateTime<Local>> for Timestamp {
    fn from(src: DateTime<Local>) -> Self {
        Self::Local(src.into())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(src: NaiveDateTime) -> Self {
        Self::Unspecified(src)
    }
}

/// Converts a UTC instant into 100-nanosecond ticks since 0001-01-01T00:00:00Z.
///
/// Instants before year 1 saturate to zero.
pub fn ticks_from_utc(t: &DateTime<Utc>) -> u64 {
    let per_sec = i128::from(TICKS_PER_SECOND);
    let ticks = i128::from(UNIX_EPOCH_TICKS)
        + i128::from(t.timestamp()) * per_sec
        + i128::from(t.timestamp_subsec_nanos() / 100);
    ticks.clamp(0, i128::from(u64::MAX)) as u64
}

/// Converts 100-nanosecond ticks since 0001-01-01T00:00:00Z into a UTC instant, or returns
/// `None` if the result is not representable.
pub fn utc_from_ticks(ticks: u64) -> Option<DateTime<Utc>> {
    let per_sec = i128::from(TICKS_PER_SECOND);
    let since_epoch = i128::from(ticks) - i128::from(UNIX_EPOCH_TICKS);
    let secs = i64::try_from(since_epoch.div_euclid(per_sec)).ok()?;
    let nanos = (since_epoch.rem_euclid(per_sec) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

/// A source of the current UTC time.
///
/// This abstraction lets a [`Generator`](crate::Generator) run against the system clock or a
/// fixed clock in tests.
pub trait Clock {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::{ticks_from_utc, utc_from_ticks, Timestamp, UNIX_EPOCH_TICKS};
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

    /// Converts prepared instants to ticks and back
    #[test]
    fn converts_prepared_instants_to_ticks_and_back() {
        let cases = [
            (Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap(), UNIX_EPOCH_TICKS),
            (
                Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
                630_822_816_000_000_000,
            ),
            (
                DateTime::from_timestamp(1, 100).unwrap(),
                UNIX_EPOCH_TICKS + 10_000_001,
            ),
            (
                Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap(),
                0,
            ),
        ];

        for (t, ticks) in cases {
            assert_eq!(ticks_from_utc(&t), ticks);
            assert_eq!(utc_from_ticks(ticks), Some(t));
        }
    }

    /// Truncates sub-tick precision
    #[test]
    fn truncates_sub_tick_precision() {
        let t = DateTime::from_timestamp(0, 199).unwrap();
        assert_eq!(ticks_from_utc(&t), UNIX_EPOCH_TICKS + 1);
    }

    /// Returns None for unrepresentable ticks
    #[test]
    fn returns_none_for_unrepresentable_ticks() {
        assert_eq!(utc_from_ticks(u64::MAX), None);
    }

    /// Classifies and normalizes timestamp kinds
    #[test]
    fn classifies_and_normalizes_timestamp_kinds() {
        let utc = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(Timestamp::from(utc).to_utc(), Some(utc));

        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let local = minus_five.with_ymd_and_hms(2024, 5, 6, 2, 8, 9).unwrap();
        assert!(matches!(Timestamp::from(local), Timestamp::Local(_)));
        assert_eq!(Timestamp::from(local).to_utc(), Some(utc));

        let local = utc.with_timezone(&chrono::Local);
        assert_eq!(Timestamp::from(local).to_utc(), Some(utc));

        let naive = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(Timestamp::from(naive).to_utc(), None);
    }
}
