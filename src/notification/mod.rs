//! Renders scan outcomes into notification service URLs.
//!
//! Each provider turns its configuration into a canonical service URL that a
//! generic dispatcher understands. Builders are pure: they do no network I/O
//! and are rendered fresh on every cycle. The [`manager::Notifier`] registry
//! selects the active builders and drives one cycle at a time.

pub mod discord;
pub mod dispatch;
pub mod email;
pub mod gotify;
pub mod manager;
pub mod raw;
pub mod slack;
pub mod teams;

use crate::error::Result;
use crate::formatting::NotificationContext;
use url::Url;

pub use dispatch::{Dispatcher, LoggingDispatcher};
pub use manager::{CycleReport, Notifier, ProviderOutcome};

/// Produces a canonical service URL from a provider configuration.
pub trait ServiceUrlBuilder: Send + Sync {
    /// Provider name used in logs, metrics and the registry summary.
    fn name(&self) -> &str;

    /// Renders the service URL for the current hostname and title.
    fn service_url(&self, ctx: &NotificationContext) -> Result<String>;
}

/// Non-empty path segments of a URL, as they appear in the input.
fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}
