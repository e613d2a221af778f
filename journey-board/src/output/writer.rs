//! JSON file writer.
//!
//! Records are written to a sibling `.tmp` file which is then renamed over
//! the target, so a failed write leaves the previous output in place.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use crate::batch::BatchOutcome;

use super::dto::{JourneyRecord, MetaRecord, OutputRecord, SNAPSHOT_FORMAT};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What a call to [`write_outcome`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The file was replaced with this many journey records.
    Written { journeys: usize },
    /// Nothing to write; any existing file was left alone.
    SkippedEmpty,
}

/// Build the output array: an optional metadata record, then journeys.
pub fn records(outcome: &BatchOutcome, snapshot: NaiveDateTime) -> Vec<OutputRecord> {
    let meta = (!outcome.notes.is_empty()).then(|| {
        OutputRecord::Meta(MetaRecord::new(
            &outcome.notes,
            snapshot.format(SNAPSHOT_FORMAT).to_string(),
        ))
    });

    meta.into_iter()
        .chain(
            outcome
                .journeys
                .iter()
                .map(|j| OutputRecord::Journey(JourneyRecord::from_ranked(j))),
        )
        .collect()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `outcome` to `path` as pretty-printed JSON.
pub fn write_outcome(
    path: &Path,
    outcome: &BatchOutcome,
    snapshot: NaiveDateTime,
) -> Result<WriteStatus, OutputError> {
    if outcome.is_empty() {
        info!(path = %path.display(), "no journeys found, keeping previous output");
        return Ok(WriteStatus::SkippedEmpty);
    }

    let records = records(outcome, snapshot);
    let tmp = temp_path(path);
    let io_err = |source| OutputError::Io {
        path: tmp.clone(),
        source,
    };

    let file = File::create(&tmp).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    drop(writer);

    std::fs::rename(&tmp, path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let journeys = outcome.journeys.len();
    info!(path = %path.display(), journeys, "output written");
    Ok(WriteStatus::Written { journeys })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchNote;
    use crate::domain::Journey;
    use crate::domain::fixtures::{date, leg};
    use crate::planner::merge;
    use serde_json::Value;

    fn snapshot() -> NaiveDateTime {
        date().and_hms_opt(9, 56, 0).unwrap()
    }

    fn outcome(notes: Vec<BatchNote>) -> BatchOutcome {
        let journeys = merge(
            vec![Journey::direct(leg("D1", "10:09", "10:27"))],
            vec![],
            8,
            snapshot(),
        );
        BatchOutcome { journeys, notes }
    }

    fn read(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn writes_journey_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live_data.json");

        let status = write_outcome(&path, &outcome(vec![]), snapshot()).unwrap();

        assert_eq!(status, WriteStatus::Written { journeys: 1 });
        let value = read(&path);
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["type"], "Direct");
        assert_eq!(array[0]["snapshotTime"], "2024-03-15 09:56:00");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn notes_lead_with_meta_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live_data.json");

        write_outcome(&path, &outcome(vec![BatchNote::LegBBoardUnavailable]), snapshot()).unwrap();

        let value = read(&path);
        assert_eq!(value[0]["meta_data"]["notes"][0], "leg_b_board_unavailable");
        assert_eq!(value[1]["segmentId"], 1);
    }

    #[test]
    fn empty_outcome_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live_data.json");
        std::fs::write(&path, "previous").unwrap();

        let status = write_outcome(&path, &BatchOutcome::default(), snapshot()).unwrap();

        assert_eq!(status, WriteStatus::SkippedEmpty);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live_data.json");
        std::fs::write(&path, "previous").unwrap();

        write_outcome(&path, &outcome(vec![]), snapshot()).unwrap();

        assert!(read(&path).is_array());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("live_data.json");

        let result = write_outcome(&path, &outcome(vec![]), snapshot());

        assert!(matches!(result, Err(OutputError::Io { .. })));
    }

    #[test]
    fn temp_file_sits_beside_target() {
        assert_eq!(
            temp_path(Path::new("out/live_data.json")),
            PathBuf::from("out/live_data.json.tmp")
        );
    }
}
