//! Journey types.
//!
//! A `Journey` is the assembled output unit: a first leg, plus for
//! one-change journeys the onward connections from the interchange.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use super::{DomainError, Leg, RailTime};

/// An onward train from the interchange, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// A second leg reachable within the transfer window.
    ///
    /// Uses `Arc<Leg>` because one second leg is commonly shared by the
    /// connections of several first legs.
    Transfer {
        second_leg: Arc<Leg>,
        transfer: Duration,
    },
    /// No second leg satisfied the transfer window.
    Unavailable { reason: String },
}

impl Connection {
    /// A real connection onto `second_leg` after `transfer` at the interchange.
    pub fn transfer(second_leg: Arc<Leg>, transfer: Duration) -> Self {
        Connection::Transfer {
            second_leg,
            transfer,
        }
    }

    /// A placeholder explaining why no connection was found.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Connection::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns the second leg, unless this is a placeholder.
    pub fn second_leg(&self) -> Option<&Leg> {
        match self {
            Connection::Transfer { second_leg, .. } => Some(second_leg),
            Connection::Unavailable { .. } => None,
        }
    }

    /// Returns the time at the interchange, unless this is a placeholder.
    pub fn transfer_time(&self) -> Option<Duration> {
        match self {
            Connection::Transfer { transfer, .. } => Some(*transfer),
            Connection::Unavailable { .. } => None,
        }
    }

    pub fn transfer_minutes(&self) -> Option<i64> {
        self.transfer_time().map(|t| t.num_minutes())
    }

    /// Returns the placeholder reason, if this is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Connection::Transfer { .. } => None,
            Connection::Unavailable { reason } => Some(reason),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Connection::Unavailable { .. })
    }
}

/// Whether a journey needs a change of train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JourneyKind {
    Direct,
    OneChange,
}

impl JourneyKind {
    /// Display label used in output records.
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyKind::Direct => "Direct",
            JourneyKind::OneChange => "One Change",
        }
    }
}

impl fmt::Display for JourneyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate journey from origin to destination.
///
/// # Invariants
///
/// - Direct journeys have no connections
/// - One-change journeys have at least one connection (possibly a placeholder)
/// - Every real connection departs no earlier than the first leg arrives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    kind: JourneyKind,
    first_leg: Leg,
    connections: Vec<Connection>,
}

impl Journey {
    /// A through train from origin to destination.
    pub fn direct(first_leg: Leg) -> Self {
        Journey {
            kind: JourneyKind::Direct,
            first_leg,
            connections: Vec::new(),
        }
    }

    /// A first leg to the interchange plus its onward connections.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `connections` is empty, or a real connection leaves
    /// the interchange before the first leg gets there.
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_board::domain::{Connection, Journey, Leg, LegIdentity, LegParts, LegStatus, RailTime};
    /// use chrono::{Duration, NaiveDate};
    /// use std::sync::Arc;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let t = |s: &str| RailTime::parse_clock(s, date).unwrap();
    /// let leg = |id: &str, dep: &str, arr: &str| {
    ///     Leg::new(LegParts {
    ///         origin: "A".into(),
    ///         destination: "B".into(),
    ///         scheduled_departure: t(dep),
    ///         departure: t(dep),
    ///         arrival: Some(t(arr)),
    ///         platform: None,
    ///         operator: None,
    ///         status: LegStatus::OnTime,
    ///         identity: LegIdentity::Service(id.into()),
    ///         train_destination: "B".into(),
    ///     })
    ///     .unwrap()
    /// };
    ///
    /// let second = Arc::new(leg("L2", "10:22", "10:40"));
    /// let journey = Journey::one_change(
    ///     leg("L1", "10:00", "10:20"),
    ///     vec![Connection::transfer(second, Duration::minutes(2))],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(journey.total_duration(), Some(Duration::minutes(40)));
    /// ```
    pub fn one_change(first_leg: Leg, connections: Vec<Connection>) -> Result<Self, DomainError> {
        if connections.is_empty() {
            return Err(DomainError::NoConnections);
        }

        if let Some(arrival) = first_leg.arrival() {
            let departs_early = connections
                .iter()
                .filter_map(Connection::second_leg)
                .any(|second| second.departure() < arrival);
            if departs_early {
                return Err(DomainError::InvalidConnection(
                    "second leg departs before the first leg arrives",
                ));
            }
        }

        Ok(Journey {
            kind: JourneyKind::OneChange,
            first_leg,
            connections,
        })
    }

    pub fn kind(&self) -> JourneyKind {
        self.kind
    }

    pub fn first_leg(&self) -> &Leg {
        &self.first_leg
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Returns true if this is a direct journey (no changes).
    pub fn is_direct(&self) -> bool {
        self.kind == JourneyKind::Direct
    }

    /// Returns the effective departure time (live, else scheduled).
    pub fn departure_time(&self) -> RailTime {
        self.first_leg.departure()
    }

    /// Returns the arrival at the final destination, if known.
    ///
    /// For one-change journeys this is the arrival of the last real
    /// connection's second leg.
    pub fn arrival_time(&self) -> Option<RailTime> {
        match self.kind {
            JourneyKind::Direct => self.first_leg.arrival(),
            JourneyKind::OneChange => self
                .connections
                .iter()
                .rev()
                .find_map(Connection::second_leg)
                .and_then(Leg::arrival),
        }
    }

    /// Returns the door-to-door duration, if the arrival is known.
    ///
    /// An arrival reading earlier than the departure is taken to be on the
    /// following day.
    pub fn total_duration(&self) -> Option<Duration> {
        let arrival = self.arrival_time()?;
        let duration = arrival.signed_duration_since(self.departure_time());
        if duration < Duration::zero() {
            Some(duration + Duration::days(1))
        } else {
            Some(duration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::leg::fixtures::{leg, time};

    #[test]
    fn direct_journey_uses_own_leg() {
        let journey = Journey::direct(leg("D", "10:00", "10:35"));

        assert!(journey.is_direct());
        assert_eq!(journey.kind().as_str(), "Direct");
        assert!(journey.connections().is_empty());
        assert_eq!(journey.departure_time(), time("10:00"));
        assert_eq!(journey.arrival_time(), Some(time("10:35")));
        assert_eq!(journey.total_duration(), Some(Duration::minutes(35)));
    }

    #[test]
    fn one_change_requires_connections() {
        let result = Journey::one_change(leg("A", "10:00", "10:20"), vec![]);
        assert_eq!(result.unwrap_err(), DomainError::NoConnections);
    }

    #[test]
    fn one_change_rejects_connection_before_arrival() {
        let early = Arc::new(leg("B", "10:15", "10:40"));
        let result = Journey::one_change(
            leg("A", "10:00", "10:20"),
            vec![Connection::transfer(early, Duration::minutes(-5))],
        );
        assert!(matches!(result, Err(DomainError::InvalidConnection(_))));
    }

    #[test]
    fn duration_runs_to_last_real_connection() {
        let c1 = Connection::transfer(Arc::new(leg("B", "10:22", "10:40")), Duration::minutes(2));
        let c2 = Connection::transfer(Arc::new(leg("C", "10:24", "10:47")), Duration::minutes(4));
        let journey = Journey::one_change(leg("A", "10:00", "10:20"), vec![c1, c2]).unwrap();

        assert_eq!(journey.kind().as_str(), "One Change");
        assert_eq!(journey.arrival_time(), Some(time("10:47")));
        assert_eq!(journey.total_duration(), Some(Duration::minutes(47)));
    }

    #[test]
    fn placeholder_only_has_no_duration() {
        let journey = Journey::one_change(
            leg("A", "10:00", "10:20"),
            vec![Connection::unavailable("no connection")],
        )
        .unwrap();

        assert_eq!(journey.arrival_time(), None);
        assert_eq!(journey.total_duration(), None);
        assert_eq!(journey.connections()[0].reason(), Some("no connection"));
        assert!(journey.connections()[0].is_placeholder());
    }

    #[test]
    fn duration_wraps_over_midnight() {
        // Second leg read from a board on the same date: 00:20 appears
        // before the 23:50 departure.
        let second = Arc::new(leg("B", "00:10", "00:20"));
        let first = leg("A", "23:50", "23:59");
        let journey = Journey {
            kind: JourneyKind::OneChange,
            first_leg: first,
            connections: vec![Connection::transfer(second, Duration::minutes(11))],
        };

        assert_eq!(journey.total_duration(), Some(Duration::minutes(30)));
    }

    #[test]
    fn connection_accessors() {
        let second = Arc::new(leg("B", "10:22", "10:40"));
        let c = Connection::transfer(second.clone(), Duration::minutes(2));

        assert_eq!(c.transfer_minutes(), Some(2));
        assert_eq!(c.second_leg(), Some(second.as_ref()));
        assert_eq!(c.reason(), None);
        assert!(!c.is_placeholder());

        let p = Connection::unavailable("none");
        assert_eq!(p.transfer_minutes(), None);
        assert!(p.second_leg().is_none());
    }
}
