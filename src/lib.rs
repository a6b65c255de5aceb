//! tower-notify - scan report notifications and stats export
//!
//! Turns the outcome of a container update scan into canonical notification
//! service URLs (Slack, Discord, Teams, Gotify, SMTP) for a generic dispatch
//! client, and writes one InfluxDB stats point per scan.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod formatting;
pub mod notification;
pub mod stats;

// Re-export core types for convenience
pub use crate::core::{Container, ContainerId, Report, ScanReport};
pub use crate::error::{NotifyError, Result};
pub use crate::notification::{Dispatcher, Notifier};
