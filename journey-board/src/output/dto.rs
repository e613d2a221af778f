//! Serializable output records.

use serde::Serialize;

use crate::batch::BatchNote;
use crate::domain::{Connection, Leg};
use crate::planner::RankedJourney;

/// Format of `snapshotTime` stamps.
pub const SNAPSHOT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ARRIVAL_UNKNOWN: &str = "TBC";

/// One leg of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRecord {
    pub origin: String,
    pub destination: String,

    /// Timetabled departure, "HH:MM"
    pub scheduled_departure: String,

    /// Live departure, "HH:MM" (scheduled if no live time)
    pub departure: String,

    /// Live arrival, "HH:MM", or "TBC"
    pub arrival: String,

    pub platform: String,
    pub operator: String,
    pub status: String,

    /// Service id, or "departure/operator" when the provider sent none
    pub identity: String,

    /// Where the train itself terminates
    pub train_destination: String,
}

/// An onward connection, or a placeholder explaining its absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub transfer_minutes: Option<i64>,
    pub second_leg: Option<LegRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One ranked journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyRecord {
    /// "Direct" or "One Change"
    #[serde(rename = "type")]
    pub kind: String,
    pub first_leg: LegRecord,
    pub connections: Vec<ConnectionRecord>,

    /// Minutes from departure to final arrival, if known
    pub total_duration: Option<i64>,

    pub segment_id: usize,
    pub snapshot_time: String,
}

/// Contents of the leading metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub notes: Vec<String>,
    pub snapshot_time: String,
}

/// Leading `{"meta_data": {...}}` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaRecord {
    pub meta_data: MetaData,
}

/// Any record in the output array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutputRecord {
    Meta(MetaRecord),
    Journey(JourneyRecord),
}

// Conversion implementations

impl LegRecord {
    pub fn from_leg(leg: &Leg) -> Self {
        Self {
            origin: leg.origin().to_string(),
            destination: leg.destination().to_string(),
            scheduled_departure: leg.scheduled_departure().to_string(),
            departure: leg.departure().to_string(),
            arrival: leg
                .arrival()
                .map_or_else(|| ARRIVAL_UNKNOWN.to_string(), |t| t.to_string()),
            platform: leg.platform().to_string(),
            operator: leg.operator().to_string(),
            status: leg.status().as_str().to_string(),
            identity: leg.identity().to_string(),
            train_destination: leg.train_destination().to_string(),
        }
    }
}

impl ConnectionRecord {
    pub fn from_connection(connection: &Connection) -> Self {
        Self {
            transfer_minutes: connection.transfer_minutes(),
            second_leg: connection.second_leg().map(LegRecord::from_leg),
            reason: connection.reason().map(str::to_string),
        }
    }
}

impl JourneyRecord {
    pub fn from_ranked(ranked: &RankedJourney) -> Self {
        let journey = ranked.journey();
        Self {
            kind: journey.kind().as_str().to_string(),
            first_leg: LegRecord::from_leg(journey.first_leg()),
            connections: journey
                .connections()
                .iter()
                .map(ConnectionRecord::from_connection)
                .collect(),
            total_duration: journey.total_duration().map(|d| d.num_minutes()),
            segment_id: ranked.segment_id(),
            snapshot_time: ranked.snapshot().format(SNAPSHOT_FORMAT).to_string(),
        }
    }
}

impl MetaRecord {
    pub fn new(notes: &[BatchNote], snapshot_time: String) -> Self {
        Self {
            meta_data: MetaData {
                notes: notes.iter().map(|n| n.as_str().to_string()).collect(),
                snapshot_time,
            },
        }
    }
}
