//! Train leg type.
//!
//! A `Leg` is one scheduled/estimated train movement between two stops,
//! as seen from a departure board. Every provider-specific field name has
//! been stripped by the time a `Leg` exists.

use std::fmt;

use chrono::Duration;

use super::{DomainError, RailTime};

/// Platform shown when the provider has not published one.
pub const PLATFORM_UNKNOWN: &str = "TBC";

/// Operator shown when the provider has not named one.
pub const OPERATOR_UNKNOWN: &str = "N/A";

/// Live running status of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegStatus {
    OnTime,
    Delayed,
    Cancelled,
    Unknown,
}

impl LegStatus {
    /// Display label used in output records.
    pub fn as_str(&self) -> &'static str {
        match self {
            LegStatus::OnTime => "On Time",
            LegStatus::Delayed => "Delayed",
            LegStatus::Cancelled => "Cancelled",
            LegStatus::Unknown => "Unknown",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, LegStatus::Cancelled)
    }
}

impl fmt::Display for LegStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable key for a physical train, used for deduplication.
///
/// Prefers the provider's service id; falls back to the pair of
/// scheduled departure and operator when the provider sends no id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LegIdentity {
    Service(String),
    DepartureOperator { departure: String, operator: String },
}

impl fmt::Display for LegIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegIdentity::Service(id) => f.write_str(id),
            LegIdentity::DepartureOperator {
                departure,
                operator,
            } => write!(f, "{departure}/{operator}"),
        }
    }
}

/// Everything needed to build a [`Leg`].
#[derive(Debug, Clone)]
pub struct LegParts {
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: RailTime,
    pub departure: RailTime,
    pub arrival: Option<RailTime>,
    pub platform: Option<String>,
    pub operator: Option<String>,
    pub status: LegStatus,
    pub identity: LegIdentity,
    pub train_destination: String,
}

/// One train movement between two stops.
///
/// # Invariants
///
/// - `arrival > departure` whenever the arrival is known
///
/// # Examples
///
/// ```
/// use journey_board::domain::{Leg, LegIdentity, LegParts, LegStatus, RailTime};
/// use chrono::{Duration, NaiveDate};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let dep = RailTime::parse_clock("10:00", date).unwrap();
///
/// let leg = Leg::new(LegParts {
///     origin: "Streatham Common".into(),
///     destination: "Clapham Junction".into(),
///     scheduled_departure: dep,
///     departure: dep,
///     arrival: Some(RailTime::parse_clock("10:09", date).unwrap()),
///     platform: None,
///     operator: Some("Southern".into()),
///     status: LegStatus::OnTime,
///     identity: LegIdentity::Service("A1".into()),
///     train_destination: "London Victoria".into(),
/// })
/// .unwrap();
///
/// assert_eq!(leg.platform(), "TBC");
/// assert_eq!(leg.duration(), Some(Duration::minutes(9)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    origin: String,
    destination: String,
    scheduled_departure: RailTime,
    departure: RailTime,
    arrival: Option<RailTime>,
    platform: Option<String>,
    operator: Option<String>,
    status: LegStatus,
    identity: LegIdentity,
    train_destination: String,
}

impl Leg {
    /// Construct a leg, validating that it does not arrive before it leaves.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the arrival is known and not after the departure.
    pub fn new(parts: LegParts) -> Result<Self, DomainError> {
        if let Some(arrival) = parts.arrival
            && arrival <= parts.departure
        {
            return Err(DomainError::InvalidLeg("arrival must be after departure"));
        }

        let LegParts {
            origin,
            destination,
            scheduled_departure,
            departure,
            arrival,
            platform,
            operator,
            status,
            identity,
            train_destination,
        } = parts;

        Ok(Leg {
            origin,
            destination,
            scheduled_departure,
            departure,
            arrival,
            platform: platform.filter(|p| !p.trim().is_empty()),
            operator: operator.filter(|o| !o.trim().is_empty()),
            status,
            identity,
            train_destination,
        })
    }

    /// Returns the boarding station name.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the alighting station name.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Returns the timetabled departure.
    pub fn scheduled_departure(&self) -> RailTime {
        self.scheduled_departure
    }

    /// Returns the live departure (falls back to scheduled).
    pub fn departure(&self) -> RailTime {
        self.departure
    }

    /// Returns the live arrival (falls back to scheduled), if known.
    pub fn arrival(&self) -> Option<RailTime> {
        self.arrival
    }

    /// Returns the departure platform, or `"TBC"`.
    pub fn platform(&self) -> &str {
        self.platform.as_deref().unwrap_or(PLATFORM_UNKNOWN)
    }

    /// Returns the operator, or `"N/A"`.
    pub fn operator(&self) -> &str {
        self.operator.as_deref().unwrap_or(OPERATOR_UNKNOWN)
    }

    pub fn status(&self) -> LegStatus {
        self.status
    }

    pub fn identity(&self) -> &LegIdentity {
        &self.identity
    }

    /// Returns where the train itself terminates.
    pub fn train_destination(&self) -> &str {
        &self.train_destination
    }

    /// Returns the time on board, if the arrival is known.
    pub fn duration(&self) -> Option<Duration> {
        self.arrival
            .map(|arrival| arrival.signed_duration_since(self.departure))
    }

    /// Returns true if this leg has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }

    /// The same leg moved by `offset`, used when a board reading turns out
    /// to belong to the following day.
    pub fn shifted_by(&self, offset: Duration) -> Option<Self> {
        let shift = |t: RailTime| t.checked_add(offset);
        Some(Leg {
            scheduled_departure: shift(self.scheduled_departure)?,
            departure: shift(self.departure)?,
            arrival: match self.arrival {
                Some(arrival) => Some(shift(arrival)?),
                None => None,
            },
            ..self.clone()
        })
    }
}
