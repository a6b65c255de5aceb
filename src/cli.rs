//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. These arguments are parsed at startup and then merged over
//! the configuration file and environment variables, so a flag always wins.

use clap::Parser;
use figment::{
    providers::Serialized,
    value::{Dict, Map},
    Error, Figment, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Renders scan reports into notification service URLs and exports scan stats.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to a JSON scan report; runs one notification cycle over it.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// The logging level (overridden by RUST_LOG).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Notifier types to enable.
    #[arg(long = "notifications", value_delimiter = ',', value_name = "TYPE")]
    pub notifications: Vec<String>,

    /// Host name used in titles and as the stats host tag.
    #[arg(long = "notifications-hostname", value_name = "NAME")]
    pub notifications_hostname: Option<String>,

    /// Replaces the default notification title.
    #[arg(long = "notification-title", value_name = "TITLE")]
    pub notification_title: Option<String>,

    /// Raw service URL to dispatch to. May be repeated.
    #[arg(long = "notification-url", value_name = "URL")]
    pub notification_url: Vec<String>,

    #[arg(long = "notification-slack-hook-url", value_name = "URL")]
    pub slack_hook_url: Option<String>,

    #[arg(long = "notification-slack-identifier", value_name = "NAME")]
    pub slack_identifier: Option<String>,

    #[arg(long = "notification-msteams-hook", value_name = "URL")]
    pub msteams_hook: Option<String>,

    #[arg(long = "notification-gotify-url", value_name = "URL")]
    pub gotify_url: Option<String>,

    #[arg(long = "notification-gotify-token", value_name = "TOKEN")]
    pub gotify_token: Option<String>,

    #[arg(long = "notification-email-from", value_name = "ADDRESS")]
    pub email_from: Option<String>,

    #[arg(long = "notification-email-to", value_name = "ADDRESS")]
    pub email_to: Option<String>,

    #[arg(long = "notification-email-server", value_name = "HOST")]
    pub email_server: Option<String>,

    #[arg(long = "notification-email-server-port", value_name = "PORT")]
    pub email_server_port: Option<u16>,

    #[arg(long = "notification-email-server-user", value_name = "USER")]
    pub email_server_user: Option<String>,

    #[arg(long = "notification-email-server-password", value_name = "PASSWORD")]
    pub email_server_password: Option<String>,

    /// SMTP auth mechanism: None, Plain, CRAMMD5 or OAuth2.
    #[arg(long = "notification-email-server-auth", value_name = "MODE")]
    pub email_server_auth: Option<String>,

    #[arg(long = "notification-email-subject", value_name = "SUBJECT")]
    pub email_subject: Option<String>,

    /// Export scan stats to InfluxDB.
    #[arg(long)]
    pub influxdb: bool,

    #[arg(long = "influxdb-host", value_name = "URL")]
    pub influxdb_host: Option<String>,

    #[arg(long = "influxdb-auth", value_name = "TOKEN")]
    pub influxdb_auth: Option<String>,

    #[arg(long = "influxdb-database", value_name = "NAME")]
    pub influxdb_database: Option<String>,

    #[arg(long = "influxdb-retention-policy", value_name = "NAME")]
    pub influxdb_retention_policy: Option<String>,

    #[arg(long = "influxdb-measurement", value_name = "NAME")]
    pub influxdb_measurement: Option<String>,
}

impl Cli {
    /// Maps every flag that was given to its configuration key.
    fn overrides(&self) -> Figment {
        let mut figment = Figment::new();
        let strings = [
            ("log_level", &self.log_level),
            ("hostname", &self.notifications_hostname),
            ("title", &self.notification_title),
            ("slack.hook_url", &self.slack_hook_url),
            ("slack.identifier", &self.slack_identifier),
            ("teams.hook_url", &self.msteams_hook),
            ("gotify.url", &self.gotify_url),
            ("gotify.token", &self.gotify_token),
            ("email.from", &self.email_from),
            ("email.to", &self.email_to),
            ("email.server", &self.email_server),
            ("email.user", &self.email_server_user),
            ("email.password", &self.email_server_password),
            ("email.auth", &self.email_server_auth),
            ("email.subject", &self.email_subject),
            ("influxdb.host", &self.influxdb_host),
            ("influxdb.auth", &self.influxdb_auth),
            ("influxdb.database", &self.influxdb_database),
            ("influxdb.retention_policy", &self.influxdb_retention_policy),
            ("influxdb.measurement", &self.influxdb_measurement),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        if let Some(port) = self.email_server_port {
            figment = figment.merge(Serialized::default("email.port", port));
        }
        if !self.notifications.is_empty() {
            figment = figment.merge(Serialized::default("notifiers", &self.notifications));
        }
        if !self.notification_url.is_empty() {
            figment = figment.merge(Serialized::default("urls", &self.notification_url));
        }
        // A bare flag can only switch the exporter on.
        if self.influxdb {
            figment = figment.merge(Serialized::default("influxdb.enabled", true));
        }
        figment
    }
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        self.overrides().data()
    }
}
