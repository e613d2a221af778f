//! Canonical raw service records.
//!
//! Every provider client converts its own wire format into these types.
//! They are deliberately loose: times are still the provider's strings,
//! and anything the provider omits is `None` or empty. Validation happens
//! when a record is normalized into a [`Leg`](super::Leg).

use chrono::NaiveDate;

/// How a service is operated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceMode {
    #[default]
    Train,
    Bus,
    Ferry,
}

/// One stop in a service's list of subsequent calling points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCallingPoint {
    /// Station code as sent by the provider (not yet validated).
    pub crs: String,
    pub name: String,
    /// Scheduled time at this stop.
    pub scheduled: Option<String>,
    /// Estimated time, or a live status string such as "On time".
    pub estimated: Option<String>,
    /// Actual time, once the train has called.
    pub actual: Option<String>,
    pub is_cancelled: bool,
}

/// A service as it appears on one station's departure board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawService {
    /// Provider service identifier, if any.
    pub service_id: Option<String>,
    /// Calendar date the board times are relative to.
    pub service_date: Option<NaiveDate>,
    /// Scheduled departure from the board station.
    pub scheduled_departure: Option<String>,
    /// Estimated departure from the board station, or a status string.
    pub estimated_departure: Option<String>,
    /// Scheduled arrival at the service's reported destination.
    pub scheduled_arrival: Option<String>,
    /// Estimated arrival at the service's reported destination.
    pub estimated_arrival: Option<String>,
    pub platform: Option<String>,
    pub operator: Option<String>,
    pub is_cancelled: bool,
    pub mode: ServiceMode,
    /// Display label of where the train terminates.
    pub destination: Option<String>,
    /// Station code of where the train terminates.
    pub destination_crs: Option<String>,
    /// Stops after the board station, in calling order.
    pub calling_points: Vec<RawCallingPoint>,
}

impl RawService {
    /// First calling point whose code satisfies `pred`.
    pub fn find_calling_point(
        &self,
        mut pred: impl FnMut(&str) -> bool,
    ) -> Option<&RawCallingPoint> {
        self.calling_points.iter().find(|cp| pred(&cp.crs))
    }
}

/// A candidate journey as offered by a provider: one or more legs.
///
/// Departure-board providers always produce single-leg journeys; journey
/// planner style providers may offer several legs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJourney {
    pub legs: Vec<RawService>,
}

impl From<RawService> for RawJourney {
    fn from(service: RawService) -> Self {
        Self {
            legs: vec![service],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(crs: &str) -> RawCallingPoint {
        RawCallingPoint {
            crs: crs.into(),
            name: crs.into(),
            ..Default::default()
        }
    }

    #[test]
    fn find_calling_point_returns_first_match() {
        let mut first = point("CLJ");
        first.scheduled = Some("10:20".into());
        let mut second = point("CLJ");
        second.scheduled = Some("11:20".into());

        let service = RawService {
            calling_points: vec![point("BAL"), first, point("IMW"), second],
            ..Default::default()
        };

        let found = service.find_calling_point(|c| c == "CLJ").unwrap();
        assert_eq!(found.scheduled.as_deref(), Some("10:20"));
        assert!(service.find_calling_point(|c| c == "VIC").is_none());
    }

    #[test]
    fn single_service_becomes_single_leg_journey() {
        let journey = RawJourney::from(RawService::default());
        assert_eq!(journey.legs.len(), 1);
    }
}
