//! The hand-off point to the external notification router.
//!
//! Sending a rendered URL over the network is owned by a generic dispatch
//! client; this crate only defines the seam and a logging implementation
//! that can be used for debugging.

use crate::formatting::redact;
use async_trait::async_trait;
use tracing::{info, instrument};

/// A client that delivers a message to a rendered service URL.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Sends `message` to the service addressed by `service_url`.
    async fn send(&self, service_url: &str, message: &str) -> anyhow::Result<()>;
}

/// A dispatcher that only logs what would have been sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDispatcher;

#[async_trait]
impl Dispatcher for LoggingDispatcher {
    #[instrument(skip_all)]
    async fn send(&self, service_url: &str, message: &str) -> anyhow::Result<()> {
        info!(url = %redact(service_url), %message, "Dispatching notification");
        Ok(())
    }
}
