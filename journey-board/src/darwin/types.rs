//! Darwin LDB JSON response DTOs.
//!
//! Only what the journey board reads is modelled; serde ignores the rest.
//! Darwin may omit a list or flag, or send it as `null`; both read as
//! empty/false.

use serde::{Deserialize, Deserializer};

/// Absent and `null` both become `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response from `GetDepBoardWithDetails`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBoardWithDetails {
    /// RFC 3339 stamp in UK local offset; board times are relative to it.
    pub generated_at: String,
    pub location_name: String,
    pub crs: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub train_services: Vec<ServiceItemWithCallingPoints>,

    /// Rail replacement buses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bus_services: Vec<ServiceItemWithCallingPoints>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub ferry_services: Vec<ServiceItemWithCallingPoints>,
}

/// One departure with its onward calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItemWithCallingPoints {
    /// Only meaningful while the service is on the board.
    #[serde(rename = "serviceID")]
    pub service_id: Option<String>,

    pub std: Option<String>,

    /// "On time", "Delayed", "Cancelled" or a clock reading.
    pub etd: Option<String>,

    pub platform: Option<String>,
    pub operator: Option<String>,
    pub operator_code: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_cancelled: bool,

    pub service_type: Option<ServiceType>,

    /// More than one entry for a train that divides.
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination: Vec<ServiceLocation>,

    /// One list per portion, main portion first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subsequent_calling_points: Vec<ArrayOfCallingPoints>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayOfCallingPoints {
    #[serde(default, deserialize_with = "null_as_default")]
    pub calling_point: Vec<CallingPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallingPoint {
    pub location_name: String,
    pub crs: String,

    /// Scheduled
    pub st: Option<String>,
    /// Estimated, or a status
    pub et: Option<String>,
    /// Actual
    pub at: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_cancelled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    pub location_name: String,
    pub crs: String,
}

/// Darwin's `serviceType`. Values this crate does not know about are kept
/// as `Other` rather than failing the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Train,
    Bus,
    Ferry,
    #[serde(other)]
    Other,
}
