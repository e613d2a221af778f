//! Stitching first legs to onward connections at the interchange.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::{Connection, Journey, Leg, LegIdentity, RailTime};

use super::config::{ConnectionMode, JourneyConfig, TransferWindow};
use super::matcher::{Candidate, best_match, match_all};

/// Builds one-change journeys from two independently fetched leg sets.
#[derive(Debug, Clone)]
pub struct Stitcher {
    window: TransferWindow,
    mode: ConnectionMode,
    interchange: String,
}

impl Stitcher {
    pub fn new(window: TransferWindow, mode: ConnectionMode, interchange: impl Into<String>) -> Self {
        Self {
            window,
            mode,
            interchange: interchange.into(),
        }
    }

    /// Stitcher for a journey configuration, honouring its effective mode.
    pub fn from_config(config: &JourneyConfig) -> Self {
        Self::new(
            config.transfer,
            config.effective_connection_mode(),
            config.interchange.name.clone(),
        )
    }

    /// Pair each first leg (origin → interchange) with second legs
    /// (interchange → destination).
    ///
    /// Each physical first-leg train appears at most once. First legs
    /// without a known interchange arrival are dropped. In best mode a
    /// first leg with nothing in the window keeps a placeholder
    /// connection; in all-in-window mode it is dropped.
    pub fn stitch(&self, first_legs: Vec<Leg>, second_legs: Vec<Leg>) -> Vec<Journey> {
        let onward = onward_legs(second_legs);

        let mut seen: HashSet<LegIdentity> = HashSet::new();
        let mut journeys = Vec::new();

        for first in first_legs {
            let Some(arrival) = first.arrival() else {
                debug!(identity = %first.identity(), "first leg has no interchange arrival");
                continue;
            };

            if !seen.insert(first.identity().clone()) {
                trace!(identity = %first.identity(), "skipping repeated first leg");
                continue;
            }

            let candidates = align(&onward, arrival);

            let connections = match self.mode {
                ConnectionMode::Best => vec![
                    best_match(arrival, &candidates, &self.window)
                        .unwrap_or_else(|| Connection::unavailable(self.no_connection_reason())),
                ],
                ConnectionMode::AllInWindow => {
                    let mut connections = match_all(arrival, &candidates, &self.window);
                    if connections.is_empty() {
                        trace!(identity = %first.identity(), "no connection in window");
                        continue;
                    }
                    connections.sort_by_key(|c| c.second_leg().map(Leg::departure));
                    connections
                }
            };

            match Journey::one_change(first, connections) {
                Ok(journey) => journeys.push(journey),
                Err(e) => debug!(error = %e, "discarding stitched journey"),
            }
        }

        debug!(count = journeys.len(), "stitched one-change journeys");
        journeys
    }

    fn no_connection_reason(&self) -> String {
        match self.window.max_mins() {
            Some(max) => format!(
                "No connection at {} within {}-{} min",
                self.interchange,
                self.window.min_mins(),
                max
            ),
            None => format!(
                "No connection at {} after {} min",
                self.interchange,
                self.window.min_mins()
            ),
        }
    }
}

/// Boardable second legs, one per physical train, in departure order.
fn onward_legs(second_legs: Vec<Leg>) -> Vec<Arc<Leg>> {
    let mut seen: HashSet<LegIdentity> = HashSet::new();
    let mut onward: Vec<Arc<Leg>> = second_legs
        .into_iter()
        .filter(|leg| !leg.is_cancelled())
        .filter(|leg| seen.insert(leg.identity().clone()))
        .map(Arc::new)
        .collect();
    onward.sort_by_key(|leg| leg.departure());
    onward
}

/// Move each candidate departure onto the arrival's day where the clock
/// readings straddle midnight.
fn align(onward: &[Arc<Leg>], arrival: RailTime) -> Vec<Candidate> {
    onward
        .iter()
        .filter_map(|leg| {
            let departure = leg.departure().following(arrival);
            if departure == leg.departure() {
                return Some(Candidate {
                    leg: Arc::clone(leg),
                    departure,
                });
            }
            let shifted = leg.shifted_by(departure.signed_duration_since(leg.departure()))?;
            Some(Candidate {
                leg: Arc::new(shifted),
                departure,
            })
        })
        .collect()
}
