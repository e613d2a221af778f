//! One-shot batch: fetch boards, stitch, rank.
//!
//! Three boards are fetched: the origin filtered to the destination (for
//! through trains), the origin unfiltered (first legs) and the interchange
//! unfiltered (second legs). A board that cannot be fetched is treated as
//! empty and recorded as a note; the batch itself never fails.

use std::fmt;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::domain::{RawService, Station};
use crate::planner::{
    DirectBuilder, JourneyConfig, LegNormalizer, RankedJourney, Stitcher, TimeResolver, merge,
};
use crate::provider::{BoardProvider, BoardQuery, ProviderError};

/// Partial-failure context attached to a batch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchNote {
    DirectBoardUnavailable,
    LegABoardUnavailable,
    LegBBoardUnavailable,
}

impl BatchNote {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchNote::DirectBoardUnavailable => "direct_board_unavailable",
            BatchNote::LegABoardUnavailable => "leg_a_board_unavailable",
            BatchNote::LegBBoardUnavailable => "leg_b_board_unavailable",
        }
    }
}

impl fmt::Display for BatchNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Ranked journeys, earliest departure first.
    pub journeys: Vec<RankedJourney>,
    /// Boards that could not be fetched.
    pub notes: Vec<BatchNote>,
}

impl BatchOutcome {
    /// True if there is nothing worth writing.
    pub fn is_empty(&self) -> bool {
        self.journeys.is_empty() && self.notes.is_empty()
    }
}

/// Log a failed fetch and carry on with an empty board.
fn settle(
    result: Result<Vec<RawService>, ProviderError>,
    station: &Station,
    note: BatchNote,
    notes: &mut Vec<BatchNote>,
) -> Vec<RawService> {
    match result {
        Ok(services) => {
            info!(board = %station, services = services.len(), "fetched board");
            services
        }
        Err(e) => {
            warn!(
                board = %station,
                error = %e,
                transient = e.is_transient(),
                note = %note,
                "board unavailable"
            );
            notes.push(note);
            Vec::new()
        }
    }
}

/// Run one batch against `provider`.
///
/// `resolver` supplies the wall clock for undated records and `snapshot`
/// is stamped on every output journey.
pub async fn run_batch<P: BoardProvider>(
    provider: &P,
    config: &JourneyConfig,
    resolver: TimeResolver,
    snapshot: NaiveDateTime,
) -> BatchOutcome {
    let direct_query = BoardQuery::departures(
        config.origin.crs,
        config.rows_per_board,
        config.time_window_mins,
    )
    .calling_at(config.destination.crs);
    let leg_a_query = BoardQuery::departures(
        config.origin.crs,
        config.rows_per_board,
        config.time_window_mins,
    );
    let leg_b_query = BoardQuery::departures(
        config.interchange.crs,
        config.rows_per_board,
        config.time_window_mins,
    );

    let (direct, leg_a, leg_b) = futures::join!(
        provider.departures(&direct_query),
        provider.departures(&leg_a_query),
        provider.departures(&leg_b_query),
    );

    // Fixed order so notes do not depend on completion order.
    let mut notes = Vec::new();
    let direct = settle(direct, &config.origin, BatchNote::DirectBoardUnavailable, &mut notes);
    let leg_a = settle(leg_a, &config.origin, BatchNote::LegABoardUnavailable, &mut notes);
    let leg_b = settle(leg_b, &config.interchange, BatchNote::LegBBoardUnavailable, &mut notes);

    let normalizer = LegNormalizer::new(resolver);

    let direct = DirectBuilder::new(normalizer, config).build_all(direct);

    let first_legs = leg_a
        .iter()
        .filter_map(|s| normalizer.normalize(s, &config.origin, Some(&config.interchange)))
        .collect();
    let second_legs = leg_b
        .iter()
        .filter_map(|s| normalizer.normalize(s, &config.interchange, Some(&config.destination)))
        .collect();

    let stitched = Stitcher::from_config(config).stitch(first_legs, second_legs);

    info!(
        direct = direct.len(),
        stitched = stitched.len(),
        "assembled candidate journeys"
    );

    let journeys = merge(direct, stitched, config.max_results, snapshot);

    info!(journeys = journeys.len(), notes = notes.len(), "batch complete");

    BatchOutcome { journeys, notes }
}
