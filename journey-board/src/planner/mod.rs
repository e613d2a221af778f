//! Journey stitching engine.
//!
//! Takes the raw services from three departure boards and turns them into
//! one ranked list of journeys:
//!
//! - [`LegNormalizer`] converts raw records into validated legs, using a
//!   [`TimeResolver`] for clock strings
//! - [`Stitcher`] pairs origin → interchange legs with interchange →
//!   destination legs inside the transfer window
//! - [`DirectBuilder`] turns through trains into direct journeys
//! - [`merge`] combines both, removes double counting and ranks the result

mod config;
mod direct;
mod matcher;
mod normalize;
mod rank;
mod resolve;
mod stitch;

pub use config::{ConfigError, ConnectionMode, JourneyConfig, OvernightPolicy, TransferWindow};
pub use direct::DirectBuilder;
pub use matcher::{Candidate, best_match, match_all};
pub use normalize::{LegNormalizer, UNKNOWN_DESTINATION};
pub use rank::{RankedJourney, merge};
pub use resolve::TimeResolver;
pub use stitch::Stitcher;
