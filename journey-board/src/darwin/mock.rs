//! File-backed Darwin client for running without API access.
//!
//! Loads recorded departure boards from JSON files and serves them as if
//! they were live responses, applying the same station filter Darwin
//! would.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::domain::{Crs, RawService};
use crate::provider::{BoardProvider, BoardQuery, ProviderError};

use super::client::parse_board;
use super::convert::convert_station_board;
use super::error::DarwinError;
use super::types::StationBoardWithDetails;

/// Mock Darwin client that serves boards from `{CRS}.json` files.
#[derive(Debug, Clone)]
pub struct MockDarwinClient {
    boards: HashMap<Crs, StationBoardWithDetails>,
}

impl MockDarwinClient {
    /// Load every `{CRS}.json` file in `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, DarwinError> {
        let data_dir = data_dir.as_ref();
        let mut boards = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            DarwinError::MockData(format!("cannot read directory {}: {e}", data_dir.display()))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| DarwinError::MockData(format!("cannot read directory entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            // "CLJ.json" -> CLJ
            let Some(crs) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Crs::parse(s).ok())
            else {
                debug!(path = %path.display(), "ignoring file without a CRS name");
                continue;
            };

            let json = std::fs::read_to_string(&path).map_err(|e| {
                DarwinError::MockData(format!("cannot read {}: {e}", path.display()))
            })?;
            boards.insert(crs, parse_board(&json)?);
        }

        if boards.is_empty() {
            return Err(DarwinError::MockData(format!(
                "no board files found in {}",
                data_dir.display()
            )));
        }

        debug!(boards = boards.len(), "loaded mock boards");
        Ok(Self { boards })
    }

    /// Stations with a recorded board.
    pub fn available_stations(&self) -> Vec<Crs> {
        let mut stations: Vec<Crs> = self.boards.keys().copied().collect();
        stations.sort();
        stations
    }

    fn board_services(&self, query: &BoardQuery) -> Result<Vec<RawService>, DarwinError> {
        let board = self.boards.get(&query.station).ok_or_else(|| {
            DarwinError::MockData(format!("no board for station {}", query.station))
        })?;

        let services = convert_station_board(board)?
            .into_iter()
            .filter(|s| query.filter.is_none_or(|f| calls_at(s, &f)))
            .take(usize::from(query.rows))
            .collect();
        Ok(services)
    }
}

/// True if the service calls at `crs` after the board station.
fn calls_at(service: &RawService, crs: &Crs) -> bool {
    service.find_calling_point(|c| crs.matches(c)).is_some()
        || service
            .destination_crs
            .as_deref()
            .is_some_and(|c| crs.matches(c))
}

impl BoardProvider for MockDarwinClient {
    async fn departures(&self, query: &BoardQuery) -> Result<Vec<RawService>, ProviderError> {
        Ok(self.board_services(query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/mock_boards");

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    #[test]
    fn load_mock_data() {
        let client = MockDarwinClient::new(DATA_DIR).unwrap();
        assert_eq!(client.available_stations(), vec![crs("CLJ"), crs("STR")]);
    }

    #[tokio::test]
    async fn serves_whole_board() {
        let client = MockDarwinClient::new(DATA_DIR).unwrap();
        let services = client
            .departures(&BoardQuery::departures(crs("STR"), 15, 120))
            .await
            .unwrap();

        assert_eq!(services.len(), 4);
        assert!(services.iter().all(|s| s.service_date.is_some()));
    }

    #[tokio::test]
    async fn filter_keeps_services_calling_there() {
        let client = MockDarwinClient::new(DATA_DIR).unwrap();
        let query = BoardQuery::departures(crs("STR"), 15, 120).calling_at(crs("IMW"));

        let services = client.departures(&query).await.unwrap();

        assert_eq!(services.len(), 1);
        assert_eq!(services[0].service_id.as_deref(), Some("STR1006SN"));
    }

    #[tokio::test]
    async fn rows_limit_board() {
        let client = MockDarwinClient::new(DATA_DIR).unwrap();
        let services = client
            .departures(&BoardQuery::departures(crs("CLJ"), 2, 120))
            .await
            .unwrap();
        assert_eq!(services.len(), 2);
    }

    #[tokio::test]
    async fn unknown_station_returns_error() {
        let client = MockDarwinClient::new(DATA_DIR).unwrap();
        let result = client
            .departures(&BoardQuery::departures(crs("XYZ"), 15, 120))
            .await;

        assert!(matches!(
            result,
            Err(ProviderError::Darwin(DarwinError::MockData(_)))
        ));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MockDarwinClient::new(dir.path()),
            Err(DarwinError::MockData(_))
        ));
    }

    #[test]
    fn malformed_board_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("STR.json"), "{ not json").unwrap();

        assert!(matches!(
            MockDarwinClient::new(dir.path()),
            Err(DarwinError::MalformedBoard { .. })
        ));
    }
}
