//! Scan statistics export.
//!
//! Every cycle produces exactly one point which is written immediately;
//! there is no buffering and no retry.

pub mod influxdb;
pub mod line_protocol;

pub use influxdb::InfluxExporter;
pub use line_protocol::{FieldValue, StatPoint};
