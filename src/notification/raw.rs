//! Service URLs given directly with `--notification-url`.

use super::ServiceUrlBuilder;
use crate::error::{NotifyError, Result};
use crate::formatting::NotificationContext;

/// Passes a configured service URL through unchanged.
#[derive(Debug, Clone)]
pub struct RawUrlNotifier {
    url: String,
    scheme: String,
}

impl RawUrlNotifier {
    pub fn new(url: &str) -> Self {
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_lowercase())
            .unwrap_or_default();
        Self {
            url: url.to_string(),
            scheme,
        }
    }
}

impl ServiceUrlBuilder for RawUrlNotifier {
    /// The URL scheme, which names the target service.
    fn name(&self) -> &str {
        if self.scheme.is_empty() {
            "shoutrrr"
        } else {
            &self.scheme
        }
    }

    fn service_url(&self, _ctx: &NotificationContext) -> Result<String> {
        if self.scheme.is_empty() {
            return Err(NotifyError::parse("shoutrrr", "service url has no scheme"));
        }
        Ok(self.url.clone())
    }
}
