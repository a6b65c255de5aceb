//! Configuration management for tower-notify
//!
//! This module defines the main `Config` struct and its per-provider
//! sections. It uses the `figment` crate to layer built-in defaults, an
//! optional TOML file, `WATCHTOWER_` environment variables and finally the
//! command-line flags.
//!
//! Loading never checks that a provider's required fields are present; that
//! happens when the notifier registry is built, so the error can name the
//! missing flag.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{
    formats::CommaSeparator, serde_as, DeserializeAs, PickFirst, StringWithSeparator,
};
use std::fmt;

/// Reads a string setting that the environment layer may have parsed as a
/// number or boolean, such as `WATCHTOWER_GOTIFY__TOKEN=12345`.
pub struct LenientString;

impl<'de> DeserializeAs<'de, String> for LenientString {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Text(String),
            Unsigned(u64),
            Signed(i64),
            Float(f64),
            Bool(bool),
        }

        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Text(text) => text,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        })
    }
}

/// A list given either as a sequence or as one comma-separated string.
type ListOrCsv = PickFirst<(Vec<LenientString>, StringWithSeparator<CommaSeparator, String>)>;

/// The main configuration struct for the application.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Overrides the machine host name in titles and the stats host tag.
    #[serde_as(deserialize_as = "Option<LenientString>")]
    pub hostname: Option<String>,
    /// Overrides the default notification title.
    #[serde_as(deserialize_as = "Option<LenientString>")]
    pub title: Option<String>,
    /// Notifier types to activate (`slack`, `msteams`, `gotify`, `email`, `shoutrrr`).
    #[serde_as(deserialize_as = "ListOrCsv")]
    pub notifiers: Vec<String>,
    /// Raw service URLs handed to the dispatcher verbatim.
    #[serde_as(deserialize_as = "ListOrCsv")]
    pub urls: Vec<String>,
    pub slack: SlackConfig,
    pub teams: TeamsConfig,
    pub gotify: GotifyConfig,
    pub email: EmailConfig,
    pub influxdb: InfluxConfig,
}

/// Settings for the Slack notifier.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SlackConfig {
    /// The incoming webhook URL (Slack, or Discord's Slack-compatible endpoint).
    pub hook_url: String,
    /// The user name shown as the message sender.
    #[serde_as(deserialize_as = "LenientString")]
    pub identifier: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            hook_url: String::new(),
            identifier: "watchtower".to_string(),
        }
    }
}

/// Settings for the Microsoft Teams notifier.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TeamsConfig {
    /// The Office 365 incoming webhook URL.
    pub hook_url: String,
}

/// Settings for the Gotify notifier.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GotifyConfig {
    /// Base URL of the Gotify server.
    pub url: String,
    /// Application token.
    #[serde_as(deserialize_as = "LenientString")]
    pub token: String,
}

/// SMTP authentication mechanisms understood by the dispatcher.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpAuth {
    None,
    #[default]
    Plain,
    #[serde(rename = "CRAMMD5")]
    CramMd5,
    OAuth2,
}

impl fmt::Display for SmtpAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SmtpAuth::None => "None",
            SmtpAuth::Plain => "Plain",
            SmtpAuth::CramMd5 => "CRAMMD5",
            SmtpAuth::OAuth2 => "OAuth2",
        };
        f.write_str(name)
    }
}

/// Settings for the email notifier.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EmailConfig {
    pub from: String,
    /// One or more recipients, comma separated.
    pub to: String,
    /// SMTP server host.
    pub server: String,
    pub port: u16,
    #[serde_as(deserialize_as = "LenientString")]
    pub user: String,
    #[serde_as(deserialize_as = "LenientString")]
    pub password: String,
    pub auth: SmtpAuth,
    /// Overrides the default subject.
    #[serde_as(deserialize_as = "Option<LenientString>")]
    pub subject: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            server: String::new(),
            port: 25,
            user: String::new(),
            password: String::new(),
            auth: SmtpAuth::Plain,
            subject: None,
        }
    }
}

/// Settings for the InfluxDB stats exporter.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct InfluxConfig {
    /// Whether stats are exported at all.
    pub enabled: bool,
    /// Base URL of the InfluxDB server.
    pub host: String,
    /// Auth token, or `username:password` for 1.x servers.
    #[serde_as(deserialize_as = "LenientString")]
    pub auth: String,
    #[serde_as(deserialize_as = "LenientString")]
    pub database: String,
    #[serde_as(deserialize_as = "LenientString")]
    pub retention_policy: String,
    #[serde_as(deserialize_as = "LenientString")]
    pub measurement: String,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            auth: String::new(),
            database: String::new(),
            retention_policy: "autogen".to_string(),
            measurement: String::new(),
        }
    }
}

impl Config {
    /// The host name used in titles and as the stats host tag: the
    /// configured override, else the machine host name.
    pub fn resolve_hostname(&self) -> String {
        self.hostname
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(sysinfo::System::host_name)
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Loads the application configuration, layering defaults, the TOML
    /// file named by `--config`, environment variables and CLI flags.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            // e.g. WATCHTOWER_INFLUXDB__DATABASE=stats, WATCHTOWER_NOTIFIERS=slack,email
            .merge(Env::prefixed("WATCHTOWER_").split("__"))
            .merge(cli)
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            hostname: None,
            title: None,
            notifiers: vec![],
            urls: vec![],
            slack: SlackConfig::default(),
            teams: TeamsConfig::default(),
            gotify: GotifyConfig::default(),
            email: EmailConfig::default(),
            influxdb: InfluxConfig::default(),
        }
    }
}
