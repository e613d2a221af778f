//! Departure board provider abstraction.
//!
//! The batch runner only ever asks one question of the outside world:
//! "what departs this station soon, optionally only trains calling at that
//! one?". Darwin (live or file-backed) answers it in production; tests use
//! in-memory doubles.

use crate::darwin::DarwinError;
use crate::domain::{Crs, RawService};

/// One departure board request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardQuery {
    /// Station whose departures are wanted.
    pub station: Crs,
    /// Only services calling at this station afterwards.
    pub filter: Option<Crs>,
    /// Maximum number of services.
    pub rows: u8,
    /// Look-ahead from now, in minutes.
    pub time_window_mins: u16,
}

impl BoardQuery {
    pub fn departures(station: Crs, rows: u8, time_window_mins: u16) -> Self {
        Self {
            station,
            filter: None,
            rows,
            time_window_mins,
        }
    }

    /// Restrict the board to services calling at `filter`.
    pub fn calling_at(mut self, filter: Crs) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Errors a provider can report for one board.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Darwin(#[from] DarwinError),

    /// Failure from a provider with no richer error type
    #[error("provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// True if the same query might succeed on a later run.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Darwin(e) => e.is_transient(),
            ProviderError::Other(_) => false,
        }
    }
}

/// Source of departure boards.
///
/// This abstraction allows the batch runner to be tested with in-memory
/// boards.
#[allow(async_fn_in_trait)]
pub trait BoardProvider {
    /// Fetch one board as canonical raw service records.
    async fn departures(&self, query: &BoardQuery) -> Result<Vec<RawService>, ProviderError>;
}
