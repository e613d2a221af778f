//! Merging and ranking of direct and stitched journeys.
//!
//! This is the only place a journey's position in the output is decided:
//! sequence numbers and the snapshot stamp are assigned here and nowhere
//! else.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{Journey, LegIdentity};

/// A journey with its place in the final list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedJourney {
    journey: Journey,
    segment_id: usize,
    snapshot: NaiveDateTime,
}

impl RankedJourney {
    pub fn journey(&self) -> &Journey {
        &self.journey
    }

    /// 1-based position in the ranked list.
    pub fn segment_id(&self) -> usize {
        self.segment_id
    }

    /// Wall-clock time the batch was produced.
    pub fn snapshot(&self) -> NaiveDateTime {
        self.snapshot
    }
}

/// Ordering used for the output list.
///
/// Departure instant first (the live departure, which is already the
/// scheduled one when the live value was a status string), then direct
/// before one-change, then identity so the order is total.
fn compare(a: &Journey, b: &Journey) -> Ordering {
    a.departure_time()
        .cmp(&b.departure_time())
        .then(a.kind().cmp(&b.kind()))
        .then_with(|| a.first_leg().identity().cmp(b.first_leg().identity()))
}

/// Combine direct and stitched journeys into the ranked output list.
///
/// A stitched journey whose first leg is also offered as a direct journey
/// is dropped. The merged list is sorted, numbered from 1 and cut to
/// `limit` entries, keeping the earliest.
pub fn merge(
    direct: Vec<Journey>,
    stitched: Vec<Journey>,
    limit: usize,
    snapshot: NaiveDateTime,
) -> Vec<RankedJourney> {
    let direct_ids: HashSet<&LegIdentity> =
        direct.iter().map(|j| j.first_leg().identity()).collect();

    let (kept, dropped): (Vec<Journey>, Vec<Journey>) = stitched
        .into_iter()
        .partition(|j| !direct_ids.contains(j.first_leg().identity()));
    if !dropped.is_empty() {
        debug!(
            count = dropped.len(),
            "dropped stitched journeys duplicating a direct train"
        );
    }

    let mut journeys: Vec<Journey> = direct.into_iter().chain(kept).collect();
    journeys.sort_by(compare);
    journeys.truncate(limit);

    debug!(count = journeys.len(), limit, "merged journey list");

    journeys
        .into_iter()
        .enumerate()
        .map(|(i, journey)| RankedJourney {
            journey,
            segment_id: i + 1,
            snapshot,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{date, leg};
    use crate::domain::{Connection, JourneyKind};
    use chrono::Duration;
    use std::sync::Arc;

    fn snapshot() -> NaiveDateTime {
        date().and_hms_opt(9, 55, 0).unwrap()
    }

    fn one_change(id: &str, dep: &str, arr: &str) -> Journey {
        let second = Arc::new(leg("B", "11:00", "11:20"));
        Journey::one_change(
            leg(id, dep, arr),
            vec![Connection::transfer(second, Duration::minutes(3))],
        )
        .unwrap()
    }

    #[test]
    fn sorted_by_departure_and_numbered() {
        let direct = vec![Journey::direct(leg("D2", "10:30", "11:00"))];
        let stitched = vec![
            one_change("A2", "10:40", "10:50"),
            one_change("A1", "10:10", "10:20"),
        ];

        let ranked = merge(direct, stitched, 8, snapshot());

        let ids: Vec<_> = ranked
            .iter()
            .map(|r| r.journey().first_leg().identity().to_string())
            .collect();
        assert_eq!(ids, vec!["A1", "D2", "A2"]);

        let segments: Vec<_> = ranked.iter().map(RankedJourney::segment_id).collect();
        assert_eq!(segments, vec![1, 2, 3]);
        assert!(ranked.iter().all(|r| r.snapshot() == snapshot()));
    }

    #[test]
    fn through_train_not_double_counted() {
        let direct = vec![Journey::direct(leg("X", "10:00", "10:31"))];
        let stitched = vec![
            one_change("X", "10:00", "10:12"),
            one_change("Y", "10:05", "10:15"),
        ];

        let ranked = merge(direct, stitched, 8, snapshot());

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].journey().kind(), JourneyKind::Direct);
        assert_eq!(
            ranked[1].journey().first_leg().identity().to_string(),
            "Y"
        );
    }

    #[test]
    fn truncates_tail() {
        let direct = (0..5)
            .map(|i| Journey::direct(leg(&format!("D{i}"), &format!("1{i}:00"), &format!("1{i}:30"))))
            .collect();

        let ranked = merge(direct, vec![], 3, snapshot());

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].journey().departure_time().to_string(), "10:00");
        assert_eq!(ranked[2].journey().departure_time().to_string(), "12:00");
    }

    #[test]
    fn direct_wins_departure_tie() {
        let direct = vec![Journey::direct(leg("Z", "10:00", "10:31"))];
        let stitched = vec![one_change("A", "10:00", "10:12")];

        let ranked = merge(direct, stitched, 8, snapshot());
        assert_eq!(ranked[0].journey().kind(), JourneyKind::Direct);
        assert_eq!(ranked[1].journey().kind(), JourneyKind::OneChange);
    }

    #[test]
    fn empty_inputs() {
        assert!(merge(vec![], vec![], 8, snapshot()).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::fixtures::date;
    use crate::domain::{Connection, Leg, LegParts, LegStatus, RailTime};
    use chrono::Duration;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn make_leg(id: u32, dep_mins: u32, ride: i64) -> Leg {
        let departure = RailTime::from_minutes(date(), dep_mins).unwrap();
        Leg::new(LegParts {
            origin: "Origin".into(),
            destination: "Destination".into(),
            scheduled_departure: departure,
            departure,
            arrival: departure.checked_add(Duration::minutes(ride)),
            platform: None,
            operator: None,
            status: LegStatus::OnTime,
            identity: LegIdentity::Service(format!("SVC{id}")),
            train_destination: "Destination".into(),
        })
        .unwrap()
    }

    fn make_one_change(id: u32, dep_mins: u32) -> Journey {
        let first = make_leg(id, dep_mins, 12);
        let second = make_leg(id + 10_000, dep_mins + 15, 20);
        Journey::one_change(
            first,
            vec![Connection::transfer(Arc::new(second), Duration::minutes(3))],
        )
        .unwrap()
    }

    fn direct_strategy() -> impl Strategy<Value = Vec<Journey>> {
        prop::collection::vec((0u32..50, 0u32..1380, 10i64..60), 0..10).prop_map(|v| {
            v.into_iter()
                .map(|(id, dep, ride)| Journey::direct(make_leg(id, dep, ride)))
                .collect()
        })
    }

    fn stitched_strategy() -> impl Strategy<Value = Vec<Journey>> {
        prop::collection::vec((0u32..50, 0u32..1380), 0..10).prop_map(|v| {
            v.into_iter()
                .map(|(id, dep)| make_one_change(id, dep))
                .collect()
        })
    }

    fn snapshot() -> NaiveDateTime {
        date().and_hms_opt(12, 0, 0).unwrap()
    }

    proptest! {
        #[test]
        fn output_is_ordered_and_numbered(
            direct in direct_strategy(),
            stitched in stitched_strategy(),
            limit in 1usize..12,
        ) {
            let ranked = merge(direct, stitched, limit, snapshot());

            for pair in ranked.windows(2) {
                prop_assert!(
                    pair[0].journey().departure_time() <= pair[1].journey().departure_time()
                );
                prop_assert!(pair[0].segment_id() < pair[1].segment_id());
            }
            for (i, r) in ranked.iter().enumerate() {
                prop_assert_eq!(r.segment_id(), i + 1);
            }
        }

        #[test]
        fn output_respects_limit(
            direct in direct_strategy(),
            stitched in stitched_strategy(),
            limit in 1usize..12,
        ) {
            let total = direct.len() + stitched.len();
            let ranked = merge(direct, stitched, limit, snapshot());
            prop_assert!(ranked.len() <= limit);
            prop_assert!(ranked.len() <= total);
        }

        #[test]
        fn no_train_is_both_direct_and_first_leg(
            direct in direct_strategy(),
            stitched in stitched_strategy(),
        ) {
            let ranked = merge(direct, stitched, usize::MAX, snapshot());

            let direct_ids: HashSet<_> = ranked
                .iter()
                .filter(|r| r.journey().is_direct())
                .map(|r| r.journey().first_leg().identity().clone())
                .collect();
            for r in ranked.iter().filter(|r| !r.journey().is_direct()) {
                prop_assert!(!direct_ids.contains(r.journey().first_leg().identity()));
            }
        }

        #[test]
        fn merge_is_idempotent(
            direct in direct_strategy(),
            stitched in stitched_strategy(),
            limit in 1usize..12,
        ) {
            let first = merge(direct.clone(), stitched.clone(), limit, snapshot());
            let second = merge(direct, stitched, limit, snapshot());
            prop_assert_eq!(first, second);
        }
    }
}
