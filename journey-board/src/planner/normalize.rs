//! Raw service record to [`Leg`] normalization.
//!
//! This is the only place in the engine that looks at provider field
//! contents: live-status sentinels, calling-point lists and the optional
//! service id. Everything downstream works on validated legs.

use tracing::{debug, trace};

use crate::domain::{
    Leg, LegIdentity, LegParts, LegStatus, OPERATOR_UNKNOWN, RailTime, RawService, Station,
};

use super::resolve::TimeResolver;

/// Label used when a service does not say where it terminates.
pub const UNKNOWN_DESTINATION: &str = "Unknown Destination";

/// Turns raw provider records into legs.
#[derive(Debug, Clone, Copy)]
pub struct LegNormalizer {
    resolver: TimeResolver,
}

/// Where and whether a service calls at the requested stop.
struct StopTime<'a> {
    clock: Option<&'a str>,
    cancelled: bool,
}

impl LegNormalizer {
    pub fn new(resolver: TimeResolver) -> Self {
        Self { resolver }
    }

    /// Normalize a service departing `origin`.
    ///
    /// With a `destination`, the leg ends there and the service must call
    /// at it; a service that does not is filtered out. Without one, the leg
    /// runs to wherever the service reports it terminates.
    ///
    /// Returns `None` for filtered and malformed records alike; neither is
    /// an error for the batch.
    pub fn normalize(
        &self,
        raw: &RawService,
        origin: &Station,
        destination: Option<&Station>,
    ) -> Option<Leg> {
        let date = raw.service_date;

        let Some(scheduled_clock) = clock(raw.scheduled_departure.as_deref())
            .or_else(|| clock(raw.estimated_departure.as_deref()))
        else {
            debug!(service = ?raw.service_id, "discarding service with no departure time");
            return None;
        };
        let scheduled = self.resolver.resolve(scheduled_clock, date)?;

        // A live estimate is only used when it is a real clock reading.
        let live = clock(raw.estimated_departure.as_deref())
            .and_then(|c| self.resolver.resolve(c, date))
            .map(|t| t.following(scheduled));
        let departure = live.unwrap_or(scheduled);

        let mut status = derive_status(raw, scheduled, live);

        let train_destination = raw
            .destination
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN_DESTINATION)
            .to_string();

        let arrival_clock = match destination {
            Some(dest) => {
                let Some(stop) = stop_at(raw, dest) else {
                    trace!(service = ?raw.service_id, crs = %dest.crs, "service does not call at stop");
                    return None;
                };
                if stop.cancelled {
                    status = LegStatus::Cancelled;
                }
                stop.clock
            }
            None => pick_clock(
                None,
                raw.estimated_arrival.as_deref(),
                raw.scheduled_arrival.as_deref(),
            ),
        };

        let arrival = arrival_clock
            .and_then(|c| self.resolver.resolve(c, date))
            .map(|t| t.following(departure));

        let parts = LegParts {
            origin: origin.name.clone(),
            destination: destination
                .map(|d| d.name.clone())
                .unwrap_or_else(|| train_destination.clone()),
            scheduled_departure: scheduled,
            departure,
            arrival,
            platform: raw.platform.clone(),
            operator: raw.operator.clone(),
            status,
            identity: identity(raw),
            train_destination,
        };

        match Leg::new(parts) {
            Ok(leg) => Some(leg),
            Err(e) => {
                debug!(service = ?raw.service_id, error = %e, "discarding malformed leg");
                None
            }
        }
    }
}

/// The string, if it is a usable clock reading rather than a status.
fn clock(s: Option<&str>) -> Option<&str> {
    s.filter(|s| RailTime::is_clock(s))
}

/// Best available clock: actual, then estimated, then scheduled.
fn pick_clock<'a>(
    actual: Option<&'a str>,
    estimated: Option<&'a str>,
    scheduled: Option<&'a str>,
) -> Option<&'a str> {
    clock(actual).or(clock(estimated)).or(clock(scheduled))
}

/// Find the first call at `dest`.
///
/// Records without calling-point detail fall back to the service's own
/// destination and arrival fields.
fn stop_at<'a>(raw: &'a RawService, dest: &Station) -> Option<StopTime<'a>> {
    if raw.calling_points.is_empty() {
        let terminates_there = raw
            .destination_crs
            .as_deref()
            .is_some_and(|crs| dest.crs.matches(crs));
        return terminates_there.then(|| StopTime {
            clock: pick_clock(
                None,
                raw.estimated_arrival.as_deref(),
                raw.scheduled_arrival.as_deref(),
            ),
            cancelled: false,
        });
    }

    raw.find_calling_point(|crs| dest.crs.matches(crs))
        .map(|cp| StopTime {
            clock: pick_clock(
                cp.actual.as_deref(),
                cp.estimated.as_deref(),
                cp.scheduled.as_deref(),
            ),
            cancelled: cp.is_cancelled,
        })
}

/// Map a provider live-status sentinel onto a status.
fn sentinel_status(s: &str) -> Option<LegStatus> {
    let s = s.trim().to_ascii_lowercase();
    if s == "on time" {
        Some(LegStatus::OnTime)
    } else if s == "delayed" {
        Some(LegStatus::Delayed)
    } else if s.starts_with("cancel") {
        Some(LegStatus::Cancelled)
    } else {
        None
    }
}

fn derive_status(raw: &RawService, scheduled: RailTime, live: Option<RailTime>) -> LegStatus {
    if raw.is_cancelled {
        return LegStatus::Cancelled;
    }

    let Some(estimate) = raw.estimated_departure.as_deref() else {
        return LegStatus::Unknown;
    };
    if let Some(status) = sentinel_status(estimate) {
        return status;
    }

    match live {
        Some(live) if live <= scheduled => LegStatus::OnTime,
        Some(_) => LegStatus::Delayed,
        None => LegStatus::Unknown,
    }
}

fn identity(raw: &RawService) -> LegIdentity {
    let id = raw
        .service_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    match id {
        Some(id) => LegIdentity::Service(id.to_string()),
        None => LegIdentity::DepartureOperator {
            departure: raw.scheduled_departure.clone().unwrap_or_default(),
            operator: raw
                .operator
                .clone()
                .unwrap_or_else(|| OPERATOR_UNKNOWN.to_string()),
        },
    }
}
