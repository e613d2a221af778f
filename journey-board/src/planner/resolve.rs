//! Clock string to absolute instant resolution.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::domain::RailTime;

use super::config::OvernightPolicy;

/// Resolves provider clock strings into [`RailTime`] instants.
///
/// Records that carry a service date are resolved against it directly.
/// Undated records are anchored to the date of `now`, with the overnight
/// policy deciding whether a small-hours reading means tomorrow.
#[derive(Debug, Clone, Copy)]
pub struct TimeResolver {
    now: NaiveDateTime,
    overnight: OvernightPolicy,
}

impl TimeResolver {
    pub fn new(now: NaiveDateTime, overnight: OvernightPolicy) -> Self {
        Self { now, overnight }
    }

    /// Resolve a clock reading, returning `None` if it is unparseable.
    pub fn resolve(&self, clock: &str, service_date: Option<NaiveDate>) -> Option<RailTime> {
        match service_date {
            Some(date) => RailTime::parse_clock(clock, date).ok(),
            None => {
                let time = RailTime::parse_clock(clock, self.now.date()).ok()?;
                Some(self.apply_overnight(time))
            }
        }
    }

    fn apply_overnight(&self, time: RailTime) -> RailTime {
        let OvernightPolicy::EarlyMorning { cutoff_hour } = self.overnight else {
            return time;
        };

        // Readings with hours >= 24 have already moved off today.
        let same_day = time.date() == self.now.date();
        if same_day && time.time() < self.now.time() && time.hour() < cutoff_hour {
            trace!(%time, "undated early-morning time taken as tomorrow");
            return time.checked_add(Duration::days(1)).unwrap_or(time);
        }
        time
    }
}
