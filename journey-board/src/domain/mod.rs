//! Domain types for the journey board.
//!
//! This module contains the core domain model types that represent
//! validated rail data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod error;
mod journey;
mod leg;
mod raw;
mod station;
mod time;

pub use error::DomainError;
pub use journey::{Connection, Journey, JourneyKind};
pub use leg::{Leg, LegIdentity, LegParts, LegStatus, OPERATOR_UNKNOWN, PLATFORM_UNKNOWN};
pub use raw::{RawCallingPoint, RawJourney, RawService, ServiceMode};
pub use station::{Crs, InvalidCrs, Station};
pub use time::{ROLLOVER_THRESHOLD_HOURS, RailTime, TimeError};

#[cfg(test)]
pub(crate) use leg::fixtures;
