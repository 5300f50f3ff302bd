//! Broadcast-timezone clock utilities
//!
//! Timestamps are stored as Unix seconds (UTC) and presented to API
//! consumers in the station-local timezone. All window arithmetic for the
//! query endpoints goes through [`BroadcastClock`] so that calendar dates
//! and naive timestamps are interpreted in broadcast-local time.

use crate::{Error, Result};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Fixed lag between a song being logged and its actual on-air moment
pub const BROADCAST_DELAY_SECS: i64 = 30;

/// Clock bound to the station-local timezone
#[derive(Debug, Clone, Copy)]
pub struct BroadcastClock {
    tz: Tz,
}

impl BroadcastClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Current instant
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Today's calendar date in broadcast-local time
    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.tz).date_naive()
    }

    /// Parse a calendar date argument ("YYYY-MM-DD")
    pub fn parse_date(&self, s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| Error::InvalidInput(format!("Invalid date: {}", s)))
    }

    /// Parse a timestamp argument. RFC 3339 values keep their own offset;
    /// naive values are interpreted as broadcast-local time. Either way the
    /// result is normalized to UTC.
    pub fn parse_timestamp(&self, s: &str) -> Result<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(self.resolve_local(naive));
            }
        }
        Err(Error::InvalidInput(format!("Invalid timestamp: {}", s)))
    }

    /// Inclusive window [00:00:00, 23:59:59] of a broadcast-local calendar
    /// day, as Unix seconds
    pub fn day_window(&self, date: NaiveDate) -> (i64, i64) {
        let start = date.and_hms_opt(0, 0, 0).unwrap();
        let end = date.and_hms_opt(23, 59, 59).unwrap();
        (
            self.resolve_local(start).timestamp(),
            self.resolve_local(end).timestamp(),
        )
    }

    /// Start of a broadcast-local calendar day, as Unix seconds
    pub fn day_start(&self, date: NaiveDate) -> i64 {
        self.day_window(date).0
    }

    /// End (23:59:59) of a broadcast-local calendar day, as Unix seconds
    pub fn day_end(&self, date: NaiveDate) -> i64 {
        self.day_window(date).1
    }

    /// Format a stored Unix timestamp as broadcast-local ISO 8601
    pub fn format_local(&self, epoch_secs: i64) -> String {
        match Utc.timestamp_opt(epoch_secs, 0) {
            LocalResult::Single(dt) => dt.with_timezone(&self.tz).to_rfc3339(),
            // Out-of-range stored value; surface it rather than panic
            _ => format!("invalid timestamp ({})", epoch_secs),
        }
    }

    /// Resolve a naive broadcast-local datetime to UTC.
    ///
    /// Fall-back ambiguity resolves to the earlier instant; a nonexistent
    /// local time (spring-forward gap) resolves to the following hour, which
    /// is the time the studio clock actually showed next.
    fn resolve_local(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Detroit;

    fn clock() -> BroadcastClock {
        BroadcastClock::new(Detroit)
    }

    #[test]
    fn test_day_window_is_inclusive_full_day() {
        // Mid-winter date, no DST transition
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let (start, end) = clock().day_window(date);

        // 23:59:59 minus 00:00:00
        assert_eq!(end - start, 86_399);

        // Detroit is UTC-5 in January
        let expected_start = Utc.with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap();
        assert_eq!(start, expected_start.timestamp());
    }

    #[test]
    fn test_day_window_summer_offset() {
        // Detroit is UTC-4 in July
        let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let (start, _) = clock().day_window(date);

        let expected_start = Utc.with_ymd_and_hms(2024, 7, 4, 4, 0, 0).unwrap();
        assert_eq!(start, expected_start.timestamp());
    }

    #[test]
    fn test_parse_timestamp_with_offset_normalizes() {
        // Same instant expressed in two offsets
        let a = clock().parse_timestamp("2024-06-01T12:00:00+02:00").unwrap();
        let b = clock().parse_timestamp("2024-06-01T10:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_timestamp_naive_is_broadcast_local() {
        let dt = clock().parse_timestamp("2024-01-15T09:30:00").unwrap();
        // 09:30 EST == 14:30 UTC
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        assert_eq!(dt, expected);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(clock().parse_timestamp("not-a-time").is_err());
    }

    #[test]
    fn test_parse_date() {
        let date = clock().parse_date("2024-03-10").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert!(clock().parse_date("03/10/2024").is_err());
    }

    #[test]
    fn test_format_local_carries_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        let formatted = clock().format_local(instant.timestamp());
        assert_eq!(formatted, "2024-01-15T09:30:00-05:00");
    }

    #[test]
    fn test_spring_forward_gap_resolves() {
        // 2024-03-10 02:30 does not exist in Detroit (clocks jump 02:00->03:00)
        let dt = clock().parse_timestamp("2024-03-10T02:30:00").unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap();
        assert_eq!(dt, expected);
    }
}
