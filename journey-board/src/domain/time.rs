//! Rail time handling.
//!
//! Providers report times as bare "HH:MM" or "HHMM" clock strings with no
//! date and no offset. This module turns them into absolute instants pinned
//! to UTC, so that subtracting one time from another across midnight is
//! always well-defined. Wall-clock readings (UK local time on the boards)
//! are treated as UTC readings throughout; only differences and ordering
//! matter to the engine.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Largest hour value accepted in a clock string.
///
/// Providers write "past midnight, same service day" as hours 24 and up,
/// so "25:10" on the 15th is 01:10 on the 16th.
const MAX_CLOCK_HOUR: u32 = 47;

/// Threshold for detecting midnight rollover between two clock readings.
///
/// If a time appears more than 6 hours before the time it should follow,
/// we assume it has rolled over to the next day.
pub const ROLLOVER_THRESHOLD_HOURS: i64 = 6;

/// An absolute instant for a rail event.
///
/// Two readings of "01:30" might be on different dates, so a `RailTime`
/// always carries its date. Ordering and subtraction work on the
/// underlying UTC instant.
///
/// # Examples
///
/// ```
/// use journey_board::domain::RailTime;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let time = RailTime::parse_clock("1430", date).unwrap();
/// assert_eq!(time.to_string(), "14:30");
///
/// let late = RailTime::parse_clock("25:10", date).unwrap();
/// assert_eq!(late.to_string(), "01:10");
/// assert_eq!(late.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RailTime {
    instant: DateTime<Utc>,
}

impl RailTime {
    /// Create a new RailTime from date and time components.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            instant: date.and_time(time).and_utc(),
        }
    }

    /// Create a RailTime from a wall-clock date-time reading.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self {
            instant: datetime.and_utc(),
        }
    }

    /// `date` at 00:00 plus a number of minutes, which may exceed a day.
    pub fn from_minutes(date: NaiveDate, minutes: u32) -> Option<Self> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        let datetime = midnight.checked_add_signed(Duration::minutes(i64::from(minutes)))?;
        Some(Self::from_naive(datetime))
    }

    /// Parse a clock reading in "HH:MM" or "HHMM" form against a service date.
    ///
    /// Hours from 24 upwards continue into the following day(s).
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_board::domain::RailTime;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    ///
    /// assert!(RailTime::parse_clock("00:00", date).is_ok());
    /// assert!(RailTime::parse_clock("2359", date).is_ok());
    /// assert!(RailTime::parse_clock("24:05", date).is_ok());
    ///
    /// assert!(RailTime::parse_clock("", date).is_err());
    /// assert!(RailTime::parse_clock("On time", date).is_err());
    /// assert!(RailTime::parse_clock("143", date).is_err());
    /// assert!(RailTime::parse_clock("14:60", date).is_err());
    /// ```
    pub fn parse_clock(s: &str, date: NaiveDate) -> Result<Self, TimeError> {
        let s = s.trim();
        let bytes = s.as_bytes();

        let (hour_bytes, minute_bytes) = match bytes.len() {
            4 => (&bytes[0..2], &bytes[2..4]),
            5 if bytes[2] == b':' => (&bytes[0..2], &bytes[3..5]),
            5 => return Err(TimeError::new("expected colon at position 2")),
            0 => return Err(TimeError::new("empty time")),
            _ => return Err(TimeError::new("expected HH:MM or HHMM format")),
        };

        let hour =
            parse_two_digits(hour_bytes).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > MAX_CLOCK_HOUR {
            return Err(TimeError::new("hour out of range"));
        }

        let minute =
            parse_two_digits(minute_bytes).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Self::from_minutes(date, hour * 60 + minute).ok_or_else(|| TimeError::new("date overflow"))
    }

    /// Returns true if `s` is a well-formed clock reading.
    pub fn is_clock(s: &str) -> bool {
        // Any date will do; only the shape of the string is checked.
        Self::parse_clock(s, NaiveDate::MIN).is_ok()
    }

    /// Returns the date component.
    pub fn date(&self) -> NaiveDate {
        self.instant.date_naive()
    }

    /// Returns the time component.
    pub fn time(&self) -> NaiveTime {
        self.instant.time()
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.instant.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.instant.minute()
    }

    /// Returns the underlying UTC instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Add a duration to this time, advancing the date past midnight.
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_board::domain::RailTime;
    /// use chrono::{Duration, NaiveDate};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let time = RailTime::parse_clock("23:30", date).unwrap();
    ///
    /// let later = time.checked_add(Duration::hours(1)).unwrap();
    /// assert_eq!(later.to_string(), "00:30");
    /// assert_eq!(later.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    /// ```
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        Some(Self {
            instant: self.instant.checked_add_signed(duration)?,
        })
    }

    /// Subtract a duration from this time.
    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        Some(Self {
            instant: self.instant.checked_sub_signed(duration)?,
        })
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.instant.signed_duration_since(other.instant)
    }

    /// Interpret this reading as happening at or after `anchor`.
    ///
    /// A reading more than [`ROLLOVER_THRESHOLD_HOURS`] before the anchor
    /// is taken to be on the following day ("23:58" then "00:05"). Smaller
    /// backwards gaps are left alone so callers can reject them.
    pub fn following(self, anchor: RailTime) -> Self {
        if anchor.signed_duration_since(self) > Duration::hours(ROLLOVER_THRESHOLD_HOURS) {
            self.checked_add(Duration::days(1)).unwrap_or(self)
        } else {
            self
        }
    }

    /// Interpret this reading as the instance nearest `anchor`.
    ///
    /// Like [`following`](Self::following), but a reading more than
    /// [`ROLLOVER_THRESHOLD_HOURS`] after the anchor is taken to be on the
    /// previous day ("00:10" anchor, "23:55" reading).
    pub fn nearest(self, anchor: RailTime) -> Self {
        if self.signed_duration_since(anchor) > Duration::hours(ROLLOVER_THRESHOLD_HOURS) {
            self.checked_sub(Duration::days(1)).unwrap_or(self)
        } else {
            self.following(anchor)
        }
    }
}

impl fmt::Debug for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RailTime({} {:02}:{:02})",
            self.date(),
            self.hour(),
            self.minute()
        )
    }
}

impl fmt::Display for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
