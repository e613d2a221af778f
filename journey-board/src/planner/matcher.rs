//! Transfer matching at the interchange.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::{Connection, Leg, RailTime};

use super::config::TransferWindow;

/// A possible second leg, with its departure already aligned to the
/// first leg's arrival day.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub leg: Arc<Leg>,
    pub departure: RailTime,
}

impl Candidate {
    fn transfer_from(&self, arrival: RailTime) -> Duration {
        self.departure.signed_duration_since(arrival)
    }
}

/// Every candidate whose transfer from `arrival` lies inside `window`, in
/// candidate order.
pub fn match_all(
    arrival: RailTime,
    candidates: &[Candidate],
    window: &TransferWindow,
) -> Vec<Connection> {
    candidates
        .iter()
        .filter_map(|c| {
            let transfer = c.transfer_from(arrival);
            window
                .contains(transfer)
                .then(|| Connection::transfer(Arc::clone(&c.leg), transfer))
        })
        .collect()
}

/// The in-window candidate with the shortest transfer.
///
/// Ties go to the earliest departure, then to the lowest identity so the
/// choice does not depend on candidate order.
pub fn best_match(
    arrival: RailTime,
    candidates: &[Candidate],
    window: &TransferWindow,
) -> Option<Connection> {
    candidates
        .iter()
        .map(|c| (c, c.transfer_from(arrival)))
        .filter(|(_, transfer)| window.contains(*transfer))
        .min_by(|(a, ta), (b, tb)| {
            ta.cmp(tb)
                .then(a.departure.cmp(&b.departure))
                .then_with(|| a.leg.identity().cmp(b.leg.identity()))
        })
        .map(|(c, transfer)| Connection::transfer(Arc::clone(&c.leg), transfer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{leg, time};

    fn candidate(id: &str, dep: &str, arr: &str) -> Candidate {
        let leg = Arc::new(leg(id, dep, arr));
        Candidate {
            departure: leg.departure(),
            leg,
        }
    }

    fn window(min: i64, max: Option<i64>) -> TransferWindow {
        TransferWindow::new(min, max).unwrap()
    }

    #[test]
    fn example_window_accepts_only_short_transfer() {
        let candidates = vec![
            candidate("B1", "10:22", "10:40"),
            candidate("B2", "10:26", "10:45"),
        ];

        let matches = match_all(time("10:20"), &candidates, &window(1, Some(5)));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].transfer_minutes(), Some(2));
        assert_eq!(
            matches[0].second_leg().unwrap().departure().to_string(),
            "10:22"
        );
    }

    #[test]
    fn window_bounds_inclusive() {
        let candidates = vec![
            candidate("B0", "10:20", "10:40"),
            candidate("B1", "10:21", "10:40"),
            candidate("B5", "10:25", "10:45"),
            candidate("B6", "10:26", "10:46"),
        ];

        let matches = match_all(time("10:20"), &candidates, &window(1, Some(5)));
        let transfers: Vec<_> = matches.iter().filter_map(|c| c.transfer_minutes()).collect();
        assert_eq!(transfers, vec![1, 5]);
    }

    #[test]
    fn best_picks_smallest_transfer() {
        let candidates = vec![
            candidate("B4", "10:24", "10:50"),
            candidate("B2", "10:22", "10:55"),
            candidate("B3", "10:23", "10:41"),
        ];

        let best = best_match(time("10:20"), &candidates, &window(1, Some(5))).unwrap();
        assert_eq!(best.transfer_minutes(), Some(2));
        assert_eq!(best.second_leg().unwrap().identity().to_string(), "B2");
    }

    #[test]
    fn best_tie_uses_identity() {
        let candidates = vec![
            candidate("Z", "10:22", "10:40"),
            candidate("A", "10:22", "10:41"),
        ];

        let best = best_match(time("10:20"), &candidates, &window(1, Some(5))).unwrap();
        assert_eq!(best.second_leg().unwrap().identity().to_string(), "A");
    }

    #[test]
    fn open_window_takes_smallest_above_minimum() {
        let candidates = vec![
            candidate("B1", "10:20", "10:40"),
            candidate("B2", "11:40", "12:00"),
            candidate("B3", "10:50", "11:10"),
        ];

        let best = best_match(time("10:20"), &candidates, &window(1, None)).unwrap();
        assert_eq!(best.transfer_minutes(), Some(30));
    }

    #[test]
    fn nothing_in_window() {
        let candidates = vec![candidate("B1", "10:10", "10:40")];

        assert!(best_match(time("10:20"), &candidates, &window(1, Some(5))).is_none());
        assert!(match_all(time("10:20"), &candidates, &window(1, Some(5))).is_empty());
    }
}
