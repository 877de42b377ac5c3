//! Calendar slot timestamp.
//!
//! # Responsibility
//! - Represent the start of one hour-wide calendar cell as an absolute time.
//! - Floor wall-clock input to the top of the hour in the caller's offset.
//!
//! # Invariants
//! - The wrapped epoch-millisecond value is always a multiple of one minute.
//!   Offsets such as +05:30 make local hour starts fall on the half hour in UTC.
//! - The value is always representable as a `chrono::DateTime<Utc>`.
//! - Persisted values that break either rule are rejected on deserialize.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One hour in epoch milliseconds.
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
/// One minute in epoch milliseconds.
pub const MINUTE_MS: i64 = 60 * 1000;

/// Local hour start, stored as Unix epoch milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Slot(i64);

/// Slot construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    /// Timestamp is outside the supported calendar range.
    OutOfRange(i64),
    /// Timestamp does not sit on a whole minute.
    NotMinuteAligned(i64),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange(value) => write!(f, "slot timestamp out of range: {value}"),
            Self::NotMinuteAligned(value) => {
                write!(f, "slot timestamp is not aligned to a minute: {value}")
            }
        }
    }
}

impl Error for SlotError {}

impl Slot {
    /// Builds a slot from epoch milliseconds, flooring to the top of the UTC hour.
    pub fn from_epoch_ms(epoch_ms: i64) -> Result<Self, SlotError> {
        let truncated = epoch_ms - epoch_ms.rem_euclid(HOUR_MS);
        checked(truncated).ok_or(SlotError::OutOfRange(epoch_ms))
    }

    /// Builds a slot from a zoned datetime, flooring to the top of the hour
    /// on that datetime's own wall clock.
    ///
    /// Sub-minute parts of the offset are ignored.
    pub fn from_datetime<Tz: TimeZone>(value: &DateTime<Tz>) -> Self {
        let epoch_ms = value.timestamp_millis();
        let offset_ms = i64::from(value.offset().fix().local_minus_utc() / 60) * MINUTE_MS;
        let local_ms = epoch_ms + offset_ms;
        let floored = local_ms - local_ms.rem_euclid(HOUR_MS) - offset_ms;
        // Only at the edge of chrono's range can the hour floor leave it;
        // the minute floor of a valid instant never does.
        checked(floored).unwrap_or(Self(epoch_ms - epoch_ms.rem_euclid(MINUTE_MS)))
    }

    /// Builds the slot for the wall-clock hour containing `local` at `offset`.
    pub fn from_local(local: NaiveDateTime, offset: FixedOffset) -> Result<Self, SlotError> {
        let zoned = offset
            .from_local_datetime(&local)
            .single()
            .ok_or(SlotError::OutOfRange(local.and_utc().timestamp_millis()))?;
        Ok(Self::from_datetime(&zoned))
    }

    /// Slot start in epoch milliseconds.
    pub fn epoch_ms(self) -> i64 {
        self.0
    }

    /// Slot start as a UTC datetime.
    pub fn start_utc(self) -> DateTime<Utc> {
        // Every constructor goes through `checked`, so the default is unreachable.
        DateTime::<Utc>::from_timestamp_millis(self.0).unwrap_or_default()
    }

    /// Exclusive slot end (start + one hour) as a UTC datetime.
    pub fn end_utc(self) -> DateTime<Utc> {
        self.start_utc() + chrono::Duration::milliseconds(HOUR_MS)
    }

    /// Returns the slot `hours` later (negative values go back in time).
    pub fn offset_hours(self, hours: i64) -> Result<Self, SlotError> {
        let shifted = hours
            .checked_mul(HOUR_MS)
            .and_then(|delta| self.0.checked_add(delta))
            .ok_or(SlotError::OutOfRange(self.0))?;
        Self::try_from(shifted)
    }
}

impl TryFrom<i64> for Slot {
    type Error = SlotError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value.rem_euclid(MINUTE_MS) != 0 {
            return Err(SlotError::NotMinuteAligned(value));
        }
        checked(value).ok_or(SlotError::OutOfRange(value))
    }
}

fn checked(epoch_ms: i64) -> Option<Slot> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms).map(|_| Slot(epoch_ms))
}

impl From<Slot> for i64 {
    fn from(value: Slot) -> Self {
        value.0
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start_utc().format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

#[cfg(test)]
mod tests {
    use super::{Slot, SlotError, HOUR_MS, MINUTE_MS};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

    #[test]
    fn from_epoch_ms_floors_to_hour() {
        let slot = Slot::from_epoch_ms(5 * HOUR_MS + 59 * 60 * 1000).unwrap();
        assert_eq!(slot.epoch_ms(), 5 * HOUR_MS);
    }

    #[test]
    fn from_epoch_ms_floors_negative_values_downwards() {
        let slot = Slot::from_epoch_ms(-1).unwrap();
        assert_eq!(slot.epoch_ms(), -HOUR_MS);
    }

    #[test]
    fn from_datetime_uses_absolute_instant() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        let slot = Slot::from_datetime(&local);
        assert_eq!(
            slot.start_utc(),
            Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn from_datetime_floors_on_half_hour_wall_clock() {
        let india = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let local = india.with_ymd_and_hms(2026, 3, 16, 9, 45, 0).unwrap();

        let slot = Slot::from_datetime(&local);

        assert_eq!(
            slot.start_utc(),
            Utc.with_ymd_and_hms(2026, 3, 16, 3, 30, 0).unwrap()
        );
        let shown = slot.start_utc().with_timezone(&india);
        assert_eq!((shown.hour(), shown.minute()), (9, 0));
    }

    #[test]
    fn from_local_uses_the_given_offset() {
        let nepal = FixedOffset::east_opt(5 * 3600 + 45 * 60).unwrap();
        let naive = NaiveDate::from_ymd_opt(2026, 3, 16)
            .unwrap()
            .and_hms_opt(14, 10, 0)
            .unwrap();

        let slot = Slot::from_local(naive, nepal).unwrap();

        assert_eq!(
            slot.start_utc(),
            Utc.with_ymd_and_hms(2026, 3, 16, 8, 15, 0).unwrap()
        );
    }

    #[test]
    fn try_from_rejects_unaligned_values() {
        assert_eq!(
            Slot::try_from(HOUR_MS + 1),
            Err(SlotError::NotMinuteAligned(HOUR_MS + 1))
        );
        assert!(Slot::try_from(HOUR_MS + 30 * MINUTE_MS).is_ok());
    }

    #[test]
    fn constructors_reject_unrepresentable_values() {
        let too_late = (i64::MAX / MINUTE_MS) * MINUTE_MS;
        assert_eq!(Slot::try_from(too_late), Err(SlotError::OutOfRange(too_late)));
        assert_eq!(Slot::from_epoch_ms(too_late), Err(SlotError::OutOfRange(too_late)));

        let earliest = chrono::DateTime::<Utc>::MIN_UTC;
        assert_eq!(Slot::from_datetime(&earliest).start_utc(), earliest);
    }

    #[test]
    fn deserialize_rejects_unaligned_values() {
        let err = serde_json::from_str::<Slot>("1234").unwrap_err();
        assert!(err.to_string().contains("not aligned"));

        let slot: Slot = serde_json::from_str(&(3 * HOUR_MS).to_string()).unwrap();
        assert_eq!(slot.epoch_ms(), 3 * HOUR_MS);
    }

    #[test]
    fn display_renders_utc_timestamp() {
        let slot = Slot::from_datetime(&Utc.with_ymd_and_hms(2026, 1, 5, 14, 10, 0).unwrap());
        assert_eq!(slot.to_string(), "2026-01-05T14:00:00Z");
        assert_eq!(
            slot.end_utc(),
            Utc.with_ymd_and_hms(2026, 1, 5, 15, 0, 0).unwrap()
        );
    }
}
