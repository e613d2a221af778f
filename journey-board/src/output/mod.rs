//! Output records and the JSON file writer.

mod dto;
mod writer;

pub use dto::{
    ConnectionRecord, JourneyRecord, LegRecord, MetaData, MetaRecord, OutputRecord,
    SNAPSHOT_FORMAT,
};
pub use writer::{OutputError, WriteStatus, records, write_outcome};
