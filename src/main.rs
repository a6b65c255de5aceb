//! tower-notify - scan report notifications
//!
//! Loads the notifier configuration, reports which notifiers are active and,
//! when given a scan report, runs one notification cycle over it.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use tower_notify::{
    cli::Cli,
    config::Config,
    core::ScanReport,
    notification::{LoggingDispatcher, Notifier},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_report(path: &Path) -> Result<ScanReport> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse report {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Logging is not configured yet; fall back to the default level.
        init_tracing("info");
        error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });
    init_tracing(&config.log_level);

    let hostname = config.resolve_hostname();
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Hostname: {}", hostname);
    info!(
        "InfluxDB Export: {}",
        if config.influxdb.enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    info!("-------------------------------------------------------");

    let notifier = Notifier::from_config(&config, &hostname).unwrap_or_else(|err| {
        error!("Invalid notification settings: {}", err);
        std::process::exit(1);
    });
    info!("Using notifications: {}", notifier);
    notifier.validate_urls();

    let Some(path) = &cli.report else {
        return Ok(());
    };

    // Only configuration errors change the exit code.
    let report = match load_report(path) {
        Ok(report) => report,
        Err(err) => {
            error!("Failed to load report: {:#}", err);
            return Ok(());
        }
    };
    if let Some(problem) = report.validate() {
        warn!("Report looks inconsistent: {}", problem);
    }

    let cycle = notifier.notify(&report, &LoggingDispatcher).await;
    for failure in cycle.failures() {
        if let Err(e) = &failure.result {
            warn!("{} did not complete: {}", failure.provider, e);
        }
    }

    Ok(())
}
