//! Configuration for journey stitching.

use chrono::Duration;

use crate::domain::{Crs, InvalidCrs, ServiceMode, Station};

/// Fatal configuration problems. Any of these stops the run before the
/// first fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No credentials for the upstream provider
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    /// A station code that is not three uppercase letters
    #[error("invalid station code {code:?}: {source}")]
    InvalidStation {
        code: String,
        #[source]
        source: InvalidCrs,
    },

    /// Minimum transfer above maximum, or negative
    #[error("invalid transfer window: min {min} min, max {max:?} min")]
    InvalidTransferWindow { min: i64, max: Option<i64> },

    /// Result limit of zero
    #[error("result limit must be at least 1")]
    ZeroResults,

    /// Origin, interchange and destination are not distinct
    #[error("stations must be distinct: {0} appears twice")]
    RepeatedStation(Crs),
}

/// How many connections to keep per first leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ConnectionMode {
    /// Only the connection with the shortest transfer.
    #[default]
    Best,
    /// Every connection inside the transfer window.
    #[value(name = "all")]
    AllInWindow,
}

/// When to guess that an undated early-morning time means tomorrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OvernightPolicy {
    /// Never guess; undated times are on the current date.
    Off,
    /// An undated time before `cutoff_hour` that is already past on the
    /// wall clock is taken to be tomorrow.
    EarlyMorning { cutoff_hour: u32 },
}

impl OvernightPolicy {
    /// Policy from a cutoff hour, where 0 turns the heuristic off.
    pub fn from_cutoff_hour(cutoff_hour: u32) -> Self {
        if cutoff_hour == 0 {
            OvernightPolicy::Off
        } else {
            OvernightPolicy::EarlyMorning { cutoff_hour }
        }
    }
}

impl Default for OvernightPolicy {
    fn default() -> Self {
        OvernightPolicy::EarlyMorning { cutoff_hour: 3 }
    }
}

/// Minimum and optional maximum time at the interchange, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferWindow {
    min_mins: i64,
    max_mins: Option<i64>,
}

impl TransferWindow {
    pub fn new(min_mins: i64, max_mins: Option<i64>) -> Result<Self, ConfigError> {
        let invalid = min_mins < 0 || max_mins.is_some_and(|max| max < min_mins);
        if invalid {
            return Err(ConfigError::InvalidTransferWindow {
                min: min_mins,
                max: max_mins,
            });
        }
        Ok(Self { min_mins, max_mins })
    }

    pub fn min(&self) -> Duration {
        Duration::minutes(self.min_mins)
    }

    pub fn max(&self) -> Option<Duration> {
        self.max_mins.map(Duration::minutes)
    }

    pub fn min_mins(&self) -> i64 {
        self.min_mins
    }

    pub fn max_mins(&self) -> Option<i64> {
        self.max_mins
    }

    /// True if a transfer of this length is acceptable.
    pub fn contains(&self, transfer: Duration) -> bool {
        transfer >= self.min() && self.max().is_none_or(|max| transfer <= max)
    }
}

impl Default for TransferWindow {
    fn default() -> Self {
        Self {
            min_mins: 1,
            max_mins: Some(5),
        }
    }
}

/// Everything the engine needs to know about one origin → interchange →
/// destination query.
#[derive(Debug, Clone)]
pub struct JourneyConfig {
    pub origin: Station,
    pub interchange: Station,
    pub destination: Station,

    /// Acceptable time at the interchange.
    pub transfer: TransferWindow,

    /// Maximum number of journeys in the output.
    pub max_results: usize,

    /// Services requested per departure board.
    pub rows_per_board: u8,

    /// How far ahead each board looks (minutes).
    pub time_window_mins: u16,

    pub connection_mode: ConnectionMode,

    pub overnight: OvernightPolicy,

    /// Modes a direct service may use.
    pub allowed_modes: Vec<ServiceMode>,
}

impl JourneyConfig {
    /// Check the configuration before any fetch is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_results == 0 {
            return Err(ConfigError::ZeroResults);
        }

        let stations = [
            self.origin.crs,
            self.interchange.crs,
            self.destination.crs,
        ];
        for (i, crs) in stations.iter().enumerate() {
            if stations[i + 1..].contains(crs) {
                return Err(ConfigError::RepeatedStation(*crs));
            }
        }

        Ok(())
    }

    /// The connection mode actually applied.
    ///
    /// Without a maximum transfer only the single best connection is kept.
    pub fn effective_connection_mode(&self) -> ConnectionMode {
        if self.transfer.max().is_none() {
            ConnectionMode::Best
        } else {
            self.connection_mode
        }
    }
}

fn station(code: &str, name: &str) -> Station {
    // Built-in codes are known-good.
    let crs = Crs::parse(code).unwrap_or_else(|_| unreachable!("built-in CRS {code}"));
    Station::new(crs, name)
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            origin: station("STR", "Streatham Common Rail Station"),
            interchange: station("CLJ", "Clapham Junction Rail Station"),
            destination: station("IMW", "Imperial Wharf Rail Station"),
            transfer: TransferWindow::default(),
            max_results: 8,
            rows_per_board: 15,
            time_window_mins: 120,
            connection_mode: ConnectionMode::Best,
            overnight: OvernightPolicy::default(),
            allowed_modes: vec![ServiceMode::Train],
        }
    }
}
