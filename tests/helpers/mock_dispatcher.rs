//! A mock dispatcher for testing the notification cycle.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tower_notify::notification::Dispatcher;

#[derive(Clone, Debug, Default)]
pub struct MockDispatcher {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    /// URLs starting with this prefix fail to send.
    pub failing_prefix: Option<String>,
}

impl MockDispatcher {
    pub fn failing(prefix: &str) -> Self {
        Self {
            failing_prefix: Some(prefix.to_string()),
            ..Default::default()
        }
    }

    pub fn sent_urls(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn send(&self, service_url: &str, message: &str) -> anyhow::Result<()> {
        if let Some(prefix) = &self.failing_prefix {
            if service_url.starts_with(prefix.as_str()) {
                anyhow::bail!("dispatch to {} refused", prefix);
            }
        }
        self.sent
            .lock()
            .unwrap()
            .push((service_url.to_string(), message.to_string()));
        Ok(())
    }
}
