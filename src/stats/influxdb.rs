//! Writes one stats point per scan cycle to an InfluxDB 1.x endpoint.

use crate::config::InfluxConfig;
use crate::core::Report;
use crate::error::{NotifyError, Result};
use crate::stats::line_protocol::{FieldValue, StatPoint};
use tokio::task;
use tracing::{debug, error, info, instrument};

const TARGET: &str = "influxdb";
const FLAG_CONTEXT: &str = "--influxdb";

/// An exporter bound to one InfluxDB database.
///
/// Holds only the connection descriptor; an HTTP client is created per write
/// so the exporter can be used from any thread.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluxExporter {
    host: String,
    auth: String,
    database: String,
    retention_policy: String,
    measurement: String,
    host_tag: String,
}

impl InfluxExporter {
    /// Creates an exporter, failing when host, database or measurement is empty.
    pub fn new(config: &InfluxConfig, host_tag: &str) -> Result<Self> {
        if config.host.is_empty() {
            return Err(NotifyError::configuration("--influxdb-host", FLAG_CONTEXT));
        }
        if config.database.is_empty() {
            return Err(NotifyError::configuration("--influxdb-database", FLAG_CONTEXT));
        }
        if config.measurement.is_empty() {
            return Err(NotifyError::configuration(
                "--influxdb-measurement",
                FLAG_CONTEXT,
            ));
        }
        let retention_policy = if config.retention_policy.is_empty() {
            "autogen".to_string()
        } else {
            config.retention_policy.clone()
        };

        Ok(Self {
            host: config.host.trim_end_matches('/').to_string(),
            auth: config.auth.clone(),
            database: config.database.clone(),
            retention_policy,
            measurement: config.measurement.clone(),
            host_tag: host_tag.to_string(),
        })
    }

    pub fn retention_policy(&self) -> &str {
        &self.retention_policy
    }

    /// The write endpoint, without the query string.
    pub fn write_url(&self) -> String {
        format!("{}/write", self.host)
    }

    /// Builds the stats point for a report.
    pub fn point(&self, report: &dyn Report) -> StatPoint {
        StatPoint::new(&self.measurement)
            .tag("host", &self.host_tag)
            .field("scanned", FieldValue::Count(report.scanned().len()))
            .field("updated", FieldValue::Count(report.updated().len()))
            .field("failed", FieldValue::Count(report.failed().len()))
            .field("skipped", FieldValue::Count(report.skipped().len()))
            .field("fresh", FieldValue::Count(report.fresh().len()))
            .field("stale", FieldValue::Count(report.stale().len()))
            .field("stale_containers", FieldValue::Text(report.stale_names()))
    }

    /// Encodes the report and writes it immediately. Blocks until the server
    /// answers or the transport fails.
    pub fn export(&self, report: &dyn Report) -> Result<()> {
        let line = self.encode(report)?;
        self.write_line(&line)
    }

    /// Like [`InfluxExporter::export`], but performs the write on the
    /// blocking thread pool.
    pub async fn export_async(&self, report: &dyn Report) -> Result<()> {
        let line = self.encode(report)?;
        let exporter = self.clone();
        match task::spawn_blocking(move || exporter.write_line(&line)).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "InfluxDB export task failed");
                Err(NotifyError::transport(TARGET, e))
            }
        }
    }

    fn encode(&self, report: &dyn Report) -> Result<String> {
        debug!(
            host = %self.host_tag,
            scanned = report.scanned().len(),
            updated = report.updated().len(),
            failed = report.failed().len(),
            skipped = report.skipped().len(),
            stale = report.stale().len(),
            fresh = report.fresh().len(),
            stale_containers = %report.stale_names(),
            "Exporting scan stats"
        );
        self.point(report).to_line()
    }

    /// Sends one line-protocol body in a blocking manner.
    #[instrument(skip(self, line), fields(database = %self.database))]
    pub fn write_line(&self, line: &str) -> Result<()> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| NotifyError::transport(TARGET, e))?;

        let mut request = client
            .post(self.write_url())
            .query(&[
                ("db", self.database.as_str()),
                ("rp", self.retention_policy.as_str()),
            ])
            .body(line.to_string());
        if !self.auth.is_empty() {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.auth),
            );
        }

        match request.send() {
            Ok(res) => {
                if res.status().is_success() {
                    info!("Wrote scan stats to InfluxDB.");
                    Ok(())
                } else {
                    let status = res.status();
                    let text = res.text().unwrap_or_default();
                    error!(
                        status = %status,
                        body = %text,
                        "InfluxDB rejected the stats point"
                    );
                    Err(NotifyError::transport(
                        TARGET,
                        format!("status {}, body: {}", status, text),
                    ))
                }
            }
            Err(e) => {
                error!(error = %e, "HTTP request to InfluxDB failed");
                Err(NotifyError::transport(TARGET, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Container, ScanReport};

    fn config() -> InfluxConfig {
        InfluxConfig {
            enabled: true,
            host: "http://influx.local:8086/".to_string(),
            auth: String::new(),
            database: "watchtower".to_string(),
            retention_policy: String::new(),
            measurement: "scans".to_string(),
        }
    }

    #[test]
    fn test_missing_fields_name_their_flag() {
        let cases = [
            ("--influxdb-host", InfluxConfig { host: String::new(), ..config() }),
            ("--influxdb-database", InfluxConfig { database: String::new(), ..config() }),
            ("--influxdb-measurement", InfluxConfig { measurement: String::new(), ..config() }),
        ];
        for (flag, config) in cases {
            let err = InfluxExporter::new(&config, "host").unwrap_err();
            assert_eq!(err.flag(), Some(flag));
        }
    }

    #[test]
    fn test_defaults_retention_policy_and_trims_host() {
        let exporter = InfluxExporter::new(&config(), "docker-01").unwrap();
        assert_eq!(exporter.retention_policy(), "autogen");
        assert_eq!(exporter.write_url(), "http://influx.local:8086/write");
    }

    #[test]
    fn test_point_body_for_stale_report() {
        let exporter = InfluxExporter::new(&config(), "docker-01").unwrap();
        let report = ScanReport {
            scanned: vec![
                Container::new("1", "A"),
                Container::new("2", "B"),
                Container::new("3", "C"),
            ],
            stale: vec![Container::new("2", "B")],
            fresh: vec![Container::new("1", "A"), Container::new("3", "C")],
            ..Default::default()
        };
        let line = exporter.point(&report).to_line().unwrap();
        assert_eq!(
            line,
            r#"scans,host=docker-01 scanned=3,updated=0,failed=0,skipped=0,fresh=2,stale=1,stale_containers="B""#
        );
    }

    #[test]
    fn test_point_body_without_stale_containers() {
        let exporter = InfluxExporter::new(&config(), "docker-01").unwrap();
        let line = exporter.point(&ScanReport::default()).to_line().unwrap();
        assert!(line.contains("stale=0"));
        assert!(line.ends_with(r#"stale_containers="""#));
    }

    #[test]
    fn test_quoted_container_names_are_escaped() {
        let exporter = InfluxExporter::new(&config(), "docker-01").unwrap();
        let report = ScanReport {
            scanned: vec![Container::new("1", r#"we"b"#)],
            stale: vec![Container::new("1", r#"we"b"#)],
            ..Default::default()
        };
        let line = exporter.point(&report).to_line().unwrap();
        assert!(line.ends_with(r#"stale_containers="we\"b""#));
    }
}
