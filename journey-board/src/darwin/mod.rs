//! Darwin LDB (Live Departure Boards) provider.
//!
//! HTTP client for the National Rail Darwin API, plus a file-backed stand-in
//! serving recorded boards.
//!
//! Key characteristics of Darwin:
//! - Service IDs are **ephemeral** - only valid while the service appears
//!   on a departure board
//! - Times are bare "HH:MM" strings (UK local time); the board's
//!   `generatedAt` stamp supplies the date
//! - `GetDepBoardWithDetails` returns calling points inline, so one request
//!   per board is enough

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DarwinClient, DarwinConfig};
pub use convert::{ConversionError, convert_service_item, convert_station_board, generated_at};
pub use error::DarwinError;
pub use mock::MockDarwinClient;
pub use types::{
    ArrayOfCallingPoints, CallingPoint, ServiceItemWithCallingPoints, ServiceLocation,
    ServiceType, StationBoardWithDetails,
};
