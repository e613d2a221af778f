//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::darwin::DarwinConfig;
use crate::domain::{Crs, Station};
use crate::planner::{ConfigError, ConnectionMode, JourneyConfig, OvernightPolicy, TransferWindow};

/// Environment variable holding the Darwin API token.
pub const TOKEN_ENV: &str = "LDB_TOKEN";

/// Build a board of direct and one-change journeys via an interchange.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Origin station CRS code
    #[arg(long, default_value = "STR")]
    pub origin: String,

    /// Display name for the origin
    #[arg(long)]
    pub origin_name: Option<String>,

    /// Interchange station CRS code
    #[arg(long, default_value = "CLJ")]
    pub interchange: String,

    /// Display name for the interchange
    #[arg(long)]
    pub interchange_name: Option<String>,

    /// Destination station CRS code
    #[arg(long, default_value = "IMW")]
    pub destination: String,

    /// Display name for the destination
    #[arg(long)]
    pub destination_name: Option<String>,

    /// Minimum minutes at the interchange
    #[arg(long, default_value_t = 1)]
    pub min_transfer: i64,

    /// Maximum minutes at the interchange
    #[arg(long, default_value_t = 5, conflicts_with = "no_max_transfer")]
    pub max_transfer: i64,

    /// Accept any transfer at or above the minimum
    #[arg(long)]
    pub no_max_transfer: bool,

    /// Number of journeys to write
    #[arg(long, default_value_t = 8)]
    pub journeys: usize,

    /// Services requested per departure board
    #[arg(long, default_value_t = 15)]
    pub rows: u8,

    /// Minutes ahead each board covers
    #[arg(long, default_value_t = 120)]
    pub time_window: u16,

    /// Keep only the best connection per first leg, or all in the window
    #[arg(long, value_enum, default_value_t = ConnectionMode::Best)]
    pub connection_mode: ConnectionMode,

    /// Undated times before this hour may be read as tomorrow (0 disables)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..24))]
    pub overnight_cutoff_hour: u32,

    /// Where to write the journey list
    #[arg(long, default_value = "live_data.json")]
    pub output: PathBuf,

    /// Serve boards from `<CRS>.json` files in this directory
    #[arg(long)]
    pub mock_data: Option<PathBuf>,

    /// Override the Darwin API base URL
    #[arg(long)]
    pub darwin_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Darwin API token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,
}

/// Where departure boards come from.
#[derive(Debug, Clone)]
pub enum BoardSource {
    Live(DarwinConfig),
    Recorded(PathBuf),
}

fn station(code: &str, name: Option<&str>) -> Result<Station, ConfigError> {
    let crs = Crs::parse(code).map_err(|source| ConfigError::InvalidStation {
        code: code.to_string(),
        source,
    })?;

    let name = match name {
        Some(name) => name.to_string(),
        None => known_name(crs).unwrap_or_else(|| crs.to_string()),
    };
    Ok(Station::new(crs, name))
}

/// Names of the built-in stations.
fn known_name(crs: Crs) -> Option<String> {
    let defaults = JourneyConfig::default();
    [defaults.origin, defaults.interchange, defaults.destination]
        .into_iter()
        .find(|s| s.crs == crs)
        .map(|s| s.name)
}

impl Args {
    /// Validated journey configuration.
    pub fn journey_config(&self) -> Result<JourneyConfig, ConfigError> {
        let max_transfer = (!self.no_max_transfer).then_some(self.max_transfer);

        let config = JourneyConfig {
            origin: station(&self.origin, self.origin_name.as_deref())?,
            interchange: station(&self.interchange, self.interchange_name.as_deref())?,
            destination: station(&self.destination, self.destination_name.as_deref())?,
            transfer: TransferWindow::new(self.min_transfer, max_transfer)?,
            max_results: self.journeys,
            rows_per_board: self.rows,
            time_window_mins: self.time_window,
            connection_mode: self.connection_mode,
            overnight: OvernightPolicy::from_cutoff_hour(self.overnight_cutoff_hour),
            ..JourneyConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Board source; live boards need a token.
    pub fn board_source(&self) -> Result<BoardSource, ConfigError> {
        if let Some(dir) = &self.mock_data {
            return Ok(BoardSource::Recorded(dir.clone()));
        }

        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingCredentials(TOKEN_ENV))?;

        let mut config = DarwinConfig::new(token).with_timeout(Duration::from_secs(self.timeout));
        if let Some(url) = &self.darwin_url {
            config = config.with_base_url(url);
        }
        Ok(BoardSource::Live(config))
    }
}
