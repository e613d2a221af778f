//! Direct (no-change) journey building.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::domain::{Journey, LegIdentity, RawJourney, ServiceMode, Station};

use super::config::JourneyConfig;
use super::normalize::LegNormalizer;

/// Accepts single-leg rail journeys that reach the final destination.
#[derive(Debug, Clone)]
pub struct DirectBuilder {
    normalizer: LegNormalizer,
    origin: Station,
    destination: Station,
    allowed_modes: Vec<ServiceMode>,
}

impl DirectBuilder {
    pub fn new(normalizer: LegNormalizer, config: &JourneyConfig) -> Self {
        Self {
            normalizer,
            origin: config.origin.clone(),
            destination: config.destination.clone(),
            allowed_modes: config.allowed_modes.clone(),
        }
    }

    /// Build a direct journey, or `None` if the candidate is not one.
    pub fn build(&self, candidate: &RawJourney) -> Option<Journey> {
        let [service] = candidate.legs.as_slice() else {
            trace!(legs = candidate.legs.len(), "not a single-leg journey");
            return None;
        };

        if !self.allowed_modes.contains(&service.mode) {
            trace!(mode = ?service.mode, service = ?service.service_id, "skipping non-rail service");
            return None;
        }

        self.normalizer
            .normalize(service, &self.origin, Some(&self.destination))
            .map(Journey::direct)
    }

    /// Build every direct journey on offer, one per physical train.
    pub fn build_all<I>(&self, candidates: I) -> Vec<Journey>
    where
        I: IntoIterator,
        I::Item: Into<RawJourney>,
    {
        let mut seen: HashSet<LegIdentity> = HashSet::new();
        let journeys: Vec<Journey> = candidates
            .into_iter()
            .filter_map(|c| self.build(&c.into()))
            .filter(|j| seen.insert(j.first_leg().identity().clone()))
            .collect();

        debug!(count = journeys.len(), "built direct journeys");
        journeys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::date;
    use crate::domain::{RawCallingPoint, RawService};
    use crate::planner::config::OvernightPolicy;
    use crate::planner::resolve::TimeResolver;
    use chrono::Duration;

    fn builder() -> DirectBuilder {
        let now = date().and_hms_opt(9, 0, 0).unwrap();
        let normalizer = LegNormalizer::new(TimeResolver::new(now, OvernightPolicy::default()));
        DirectBuilder::new(normalizer, &JourneyConfig::default())
    }

    fn through_service(id: &str, std: &str, arr: &str) -> RawService {
        RawService {
            service_id: Some(id.into()),
            service_date: Some(date()),
            scheduled_departure: Some(std.into()),
            estimated_departure: Some("On time".into()),
            operator: Some("London Overground".into()),
            destination: Some("Clapham Junction".into()),
            calling_points: vec![RawCallingPoint {
                crs: "IMW".into(),
                name: "Imperial Wharf".into(),
                scheduled: Some(arr.into()),
                estimated: Some("On time".into()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn builds_direct_journey() {
        let journey = builder()
            .build(&through_service("D1", "10:00", "10:31").into())
            .unwrap();

        assert!(journey.is_direct());
        assert!(journey.connections().is_empty());
        assert_eq!(journey.first_leg().origin(), "Streatham Common Rail Station");
        assert_eq!(journey.first_leg().destination(), "Imperial Wharf Rail Station");
        assert_eq!(journey.total_duration(), Some(Duration::minutes(31)));
    }

    #[test]
    fn rejects_multi_leg_candidates() {
        let candidate = RawJourney {
            legs: vec![
                through_service("D1", "10:00", "10:31"),
                through_service("D2", "10:40", "10:50"),
            ],
        };
        assert!(builder().build(&candidate).is_none());
        assert!(builder().build(&RawJourney::default()).is_none());
    }

    #[test]
    fn rejects_bus_replacement() {
        let mut service = through_service("D1", "10:00", "10:31");
        service.mode = ServiceMode::Bus;
        assert!(builder().build(&service.into()).is_none());
    }

    #[test]
    fn rejects_service_missing_destination() {
        let mut service = through_service("D1", "10:00", "10:31");
        service.calling_points[0].crs = "VIC".into();
        assert!(builder().build(&service.into()).is_none());
    }

    #[test]
    fn build_all_deduplicates() {
        let journeys = builder().build_all(vec![
            through_service("D1", "10:00", "10:31"),
            through_service("D1", "10:00", "10:31"),
            through_service("D2", "10:30", "11:01"),
        ]);
        assert_eq!(journeys.len(), 2);
    }
}
