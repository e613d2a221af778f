use std::path::Path;
use std::process::ExitCode;

use chrono::{Local, NaiveDateTime};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use journey_board::batch::run_batch;
use journey_board::cli::{Args, BoardSource};
use journey_board::darwin::{DarwinClient, MockDarwinClient};
use journey_board::output::{OutputError, WriteStatus, write_outcome};
use journey_board::planner::{JourneyConfig, TimeResolver};
use journey_board::provider::BoardProvider;

async fn run<P: BoardProvider>(
    provider: &P,
    config: &JourneyConfig,
    output: &Path,
    now: NaiveDateTime,
) -> Result<WriteStatus, OutputError> {
    let resolver = TimeResolver::new(now, config.overnight);
    let outcome = run_batch(provider, config, resolver, now).await;
    write_outcome(output, &outcome, now)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Configuration problems are fatal before anything is fetched.
    let config = match args.journey_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };
    let source = match args.board_source() {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {e}. Set {} or pass --mock-data.", journey_board::cli::TOKEN_ENV);
            return ExitCode::from(2);
        }
    };

    let now = Local::now().naive_local();
    info!(
        origin = %config.origin,
        interchange = %config.interchange,
        destination = %config.destination,
        "building journey board"
    );

    let result = match source {
        BoardSource::Live(darwin_config) => match DarwinClient::new(darwin_config) {
            Ok(client) => run(&client, &config, &args.output, now).await,
            Err(e) => {
                eprintln!("Error: cannot create Darwin client: {e}");
                return ExitCode::FAILURE;
            }
        },
        BoardSource::Recorded(dir) => match MockDarwinClient::new(&dir) {
            Ok(client) => {
                info!(
                    dir = %dir.display(),
                    stations = ?client.available_stations(),
                    "serving recorded boards"
                );
                run(&client, &config, &args.output, now).await
            }
            Err(e) => {
                eprintln!("Error: cannot load recorded boards: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    match result {
        Ok(WriteStatus::Written { journeys }) => {
            println!("Wrote {journeys} journeys to {}", args.output.display());
            ExitCode::SUCCESS
        }
        Ok(WriteStatus::SkippedEmpty) => {
            println!("No journeys found; {} left unchanged", args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to write output");
            ExitCode::FAILURE
        }
    }
}
