//! The notifier registry holds the builders and the stats exporter selected
//! at startup and runs them over each completed scan.

use super::dispatch::Dispatcher;
use super::email::EmailNotifier;
use super::gotify::GotifyNotifier;
use super::raw::RawUrlNotifier;
use super::slack::SlackNotifier;
use super::teams::TeamsNotifier;
use super::ServiceUrlBuilder;
use crate::config::Config;
use crate::core::Report;
use crate::error::{NotifyError, Result};
use crate::formatting::{report_message, NotificationContext};
use crate::stats::InfluxExporter;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

const STATS_PROVIDER: &str = "influxdb";

/// The set of active notifiers.
pub struct Notifier {
    hostname: String,
    title: Option<String>,
    builders: Vec<Box<dyn ServiceUrlBuilder>>,
    exporter: Option<InfluxExporter>,
}

/// The outcome of one provider in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutcome {
    pub provider: String,
    pub result: Result<()>,
}

/// Per-provider results of one notification cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub outcomes: Vec<ProviderOutcome>,
}

impl CycleReport {
    pub fn outcome(&self, provider: &str) -> Option<&ProviderOutcome> {
        self.outcomes.iter().find(|o| o.provider == provider)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProviderOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn all_ok(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl Notifier {
    /// Creates a registry from explicit parts.
    pub fn new(
        hostname: &str,
        title: Option<String>,
        builders: Vec<Box<dyn ServiceUrlBuilder>>,
        exporter: Option<InfluxExporter>,
    ) -> Self {
        Self {
            hostname: hostname.to_string(),
            title,
            builders,
            exporter,
        }
    }

    /// Selects the builders named in `config.notifiers`, one pass-through
    /// builder per raw URL, and the stats exporter when it is enabled.
    ///
    /// Missing required settings are fatal and name the flag to set.
    pub fn from_config(config: &Config, hostname: &str) -> Result<Self> {
        let mut builders: Vec<Box<dyn ServiceUrlBuilder>> = Vec::new();

        for kind in &config.notifiers {
            match kind.trim().to_lowercase().as_str() {
                "slack" => builders.push(Box::new(SlackNotifier::new(&config.slack)?)),
                "msteams" => builders.push(Box::new(TeamsNotifier::new(&config.teams)?)),
                "gotify" => builders.push(Box::new(GotifyNotifier::new(&config.gotify)?)),
                "email" => builders.push(Box::new(EmailNotifier::new(&config.email)?)),
                // Raw URLs are always added below.
                "shoutrrr" | "" => {}
                other => return Err(NotifyError::UnknownNotifier(other.to_string())),
            }
        }
        for url in config.urls.iter().map(|url| url.trim()).filter(|url| !url.is_empty()) {
            builders.push(Box::new(RawUrlNotifier::new(url)));
        }

        let exporter = if config.influxdb.enabled {
            Some(InfluxExporter::new(&config.influxdb, hostname)?)
        } else {
            None
        };

        Ok(Self::new(hostname, config.title.clone(), builders, exporter))
    }

    /// Names of the active providers, or `"none"`.
    pub fn summary(&self) -> String {
        let mut names: Vec<&str> = self.builders.iter().map(|b| b.name()).collect();
        if self.exporter.is_some() {
            names.push(STATS_PROVIDER);
        }
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty() && self.exporter.is_none()
    }

    pub fn context(&self) -> NotificationContext {
        NotificationContext::new(&self.hostname, self.title.as_deref())
    }

    /// Renders every builder's URL.
    pub fn service_urls(&self) -> Vec<(String, Result<String>)> {
        let ctx = self.context();
        self.builders
            .iter()
            .map(|b| (b.name().to_string(), b.service_url(&ctx)))
            .collect()
    }

    /// Renders every URL once and warns about the ones that will be skipped.
    pub fn validate_urls(&self) -> usize {
        let mut invalid = 0;
        for (provider, result) in self.service_urls() {
            if let Err(e) = result {
                warn!(provider = %provider, error = %e, "Notifier will be skipped until its URL is fixed");
                invalid += 1;
            }
        }
        invalid
    }

    /// Runs one notification cycle over `report`.
    ///
    /// Providers run one after the other. A failing provider is logged and
    /// recorded; it never stops the others.
    #[instrument(skip_all, fields(scanned = report.scanned().len()))]
    pub async fn notify(&self, report: &dyn Report, dispatcher: &dyn Dispatcher) -> CycleReport {
        let ctx = self.context();
        let message = report_message(report);
        let mut cycle = CycleReport::default();

        for builder in &self.builders {
            let provider = builder.name().to_string();
            let result = match builder.service_url(&ctx) {
                Ok(url) => dispatcher
                    .send(&url, &message)
                    .await
                    .map_err(|e| NotifyError::transport(provider.clone(), e)),
                Err(e) => Err(e),
            };
            record(&provider, &result);
            cycle.outcomes.push(ProviderOutcome { provider, result });
        }

        if let Some(exporter) = &self.exporter {
            let result = exporter.export_async(report).await;
            match &result {
                Ok(()) => metrics::counter!("stats_exports_total").increment(1),
                Err(e) => {
                    error!(error = %e, "Failed to export scan stats");
                    metrics::counter!("stats_export_failures_total").increment(1);
                }
            }
            cycle.outcomes.push(ProviderOutcome {
                provider: STATS_PROVIDER.to_string(),
                result,
            });
        }

        info!(
            providers = cycle.outcomes.len(),
            failed = cycle.failures().count(),
            "Notification cycle finished"
        );
        cycle
    }
}

fn record(provider: &str, result: &Result<()>) {
    match result {
        Ok(()) => {
            debug!(provider, "Notification dispatched");
            metrics::counter!("notifications_sent_total", "provider" => provider.to_string())
                .increment(1);
        }
        Err(e) => {
            if matches!(e, NotifyError::Parse { .. }) {
                warn!(provider, error = %e, "Skipping notifier for this cycle");
            } else {
                error!(provider, error = %e, "Failed to send notification");
            }
            metrics::counter!("notifications_failed_total", "provider" => provider.to_string())
                .increment(1);
        }
    }
}

impl fmt::Display for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
