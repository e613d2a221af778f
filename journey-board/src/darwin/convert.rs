//! Conversion from Darwin DTOs to canonical raw service records.
//!
//! Darwin times stay as strings here; the planner resolves them. What
//! this module adds is the service date, taken from the board's
//! `generatedAt` stamp so that later time resolution never needs to guess
//! from the wall clock.

use chrono::{DateTime, NaiveDateTime};
use tracing::warn;

use crate::domain::{RailTime, RawCallingPoint, RawService, ServiceMode};

use super::types::{
    CallingPoint, ServiceItemWithCallingPoints, ServiceType, StationBoardWithDetails,
};

/// Error during DTO to raw record conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// `generatedAt` is not an RFC 3339 timestamp
    #[error("invalid board timestamp: {0}")]
    InvalidTimestamp(String),

    /// Failed to parse a time string
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Wall-clock time at which the board was generated, in the board's own
/// offset.
pub fn generated_at(board: &StationBoardWithDetails) -> Result<NaiveDateTime, ConversionError> {
    DateTime::parse_from_rfc3339(&board.generated_at)
        .map(|dt| dt.naive_local())
        .map_err(|_| ConversionError::InvalidTimestamp(board.generated_at.clone()))
}

/// Convert every service on a board, skipping any that cannot be read.
pub fn convert_station_board(
    board: &StationBoardWithDetails,
) -> Result<Vec<RawService>, ConversionError> {
    let generated = generated_at(board)?;

    let groups = [
        (&board.train_services, ServiceMode::Train),
        (&board.bus_services, ServiceMode::Bus),
        (&board.ferry_services, ServiceMode::Ferry),
    ];

    let mut results = Vec::new();
    for (services, mode) in groups {
        for item in services {
            match convert_service_item(item, mode, generated) {
                Ok(raw) => results.push(raw),
                Err(e) => warn!(
                    board = %board.crs,
                    service = ?item.service_id,
                    error = %e,
                    "skipping unreadable service"
                ),
            }
        }
    }

    Ok(results)
}

/// Convert a single service item.
///
/// `mode` is the board section the item was listed under; an explicit
/// `serviceType` on the item overrides it.
pub fn convert_service_item(
    item: &ServiceItemWithCallingPoints,
    mode: ServiceMode,
    generated: NaiveDateTime,
) -> Result<RawService, ConversionError> {
    let std = item
        .std
        .as_deref()
        .ok_or(ConversionError::MissingField("std (scheduled departure)"))?;

    // Around midnight a board lists departures from either side of it:
    // early ones for tomorrow before midnight, late-running ones from
    // yesterday after it.
    let departure = RailTime::parse_clock(std, generated.date())
        .map_err(|_| ConversionError::InvalidTime(std.to_string()))?
        .nearest(RailTime::from_naive(generated));

    let calling_points: Vec<RawCallingPoint> = item
        .subsequent_calling_points
        .first()
        .map(|portion| portion.calling_point.iter().map(convert_calling_point).collect())
        .unwrap_or_default();

    let (scheduled_arrival, estimated_arrival) = calling_points
        .last()
        .map(|last| (last.scheduled.clone(), last.estimated.clone()))
        .unwrap_or_default();

    let (destination, destination_crs) = parse_destination(item);

    let mode = match item.service_type {
        Some(ServiceType::Train) => ServiceMode::Train,
        Some(ServiceType::Bus) => ServiceMode::Bus,
        Some(ServiceType::Ferry) => ServiceMode::Ferry,
        Some(ServiceType::Other) | None => mode,
    };

    Ok(RawService {
        service_id: item.service_id.clone(),
        service_date: Some(departure.date()),
        scheduled_departure: Some(std.to_string()),
        estimated_departure: item.etd.clone(),
        scheduled_arrival,
        estimated_arrival,
        platform: item.platform.clone(),
        operator: item.operator.clone().or_else(|| item.operator_code.clone()),
        is_cancelled: item.is_cancelled,
        mode,
        destination,
        destination_crs,
        calling_points,
    })
}

fn convert_calling_point(cp: &CallingPoint) -> RawCallingPoint {
    RawCallingPoint {
        crs: cp.crs.clone(),
        name: cp.location_name.clone(),
        scheduled: cp.st.clone(),
        estimated: cp.et.clone(),
        actual: cp.at.clone(),
        is_cancelled: cp.is_cancelled,
    }
}

/// Destination label and code. A dividing train lists every portion's
/// destination.
fn parse_destination(item: &ServiceItemWithCallingPoints) -> (Option<String>, Option<String>) {
    match item.destination.as_slice() {
        [] => (None, None),
        dests @ [first, ..] => {
            let name = dests
                .iter()
                .map(|d| d.location_name.as_str())
                .collect::<Vec<_>>()
                .join(" & ");
            (Some(name), Some(first.crs.clone()))
        }
    }
}
