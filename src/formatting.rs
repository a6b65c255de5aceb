//! Title and color policy, query encoding and the text helpers shared by
//! every URL builder.

use crate::core::Report;
use std::fmt::Write;

/// The product name used in titles, subjects and sender names.
pub const PRODUCT_NAME: &str = "Watchtower";

/// Default notification color as an integer (`0xRRGGBB`).
pub const DEFAULT_COLOR: u32 = 0x406170;

/// Default notification color as a CSS hex string.
pub const DEFAULT_COLOR_HEX: &str = "#406170";

/// Builds the default title for notifications sent from `hostname`.
pub fn default_title(hostname: &str) -> String {
    format!("{} updates on {}", PRODUCT_NAME, hostname)
}

/// Values every URL builder needs besides its own provider settings.
///
/// Created per cycle so that the hostname and title always reflect the
/// current configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContext {
    pub hostname: String,
    pub title: String,
}

impl NotificationContext {
    pub fn new(hostname: &str, title_override: Option<&str>) -> Self {
        let title = match title_override {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => default_title(hostname),
        };
        Self {
            hostname: hostname.to_string(),
            title,
        }
    }

    /// The email subject used when none is configured.
    pub fn default_subject(&self) -> String {
        default_title(&self.hostname)
    }
}

/// Per-severity colors for providers that support them.
///
/// Unset levels render as `0x0` so the URL shape never depends on how many
/// levels the provider knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSet {
    pub default: u32,
    pub debug: Option<u32>,
    pub info: Option<u32>,
    pub warn: Option<u32>,
    pub error: Option<u32>,
}

impl Default for ColorSet {
    fn default() -> Self {
        Self {
            default: DEFAULT_COLOR,
            debug: None,
            info: None,
            warn: None,
            error: None,
        }
    }
}

impl ColorSet {
    pub fn render(color: Option<u32>) -> String {
        format!("0x{:x}", color.unwrap_or(0))
    }

    pub fn default_color(&self) -> String {
        Self::render(Some(self.default))
    }
}

/// Percent-encodes a value for use in a URL query string or userinfo.
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

const TOKEN_HOST_SCHEMES: &[&str] = &["slack", "teams"];

/// Hides the credentials of a rendered service URL for logging.
///
/// Webhook providers carry their tokens in the path, so every path segment
/// is masked along with the userinfo. Slack and Teams URLs also use the host
/// position for a token. The query is kept.
pub fn redact(service_url: &str) -> String {
    let Some(scheme_end) = service_url.find("://") else {
        return service_url.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &service_url[authority_start..];
    let authority_len = rest.find(['/', '?']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_len);
    let (path, query) = tail.split_at(tail.find('?').unwrap_or(tail.len()));

    let (userinfo, host) = match authority.rfind('@') {
        Some(at) => ("***@", &authority[at + 1..]),
        None => ("", authority),
    };
    let host = if TOKEN_HOST_SCHEMES.contains(&&service_url[..scheme_end]) {
        "***"
    } else {
        host
    };
    let path = path
        .split('/')
        .map(|segment| if segment.is_empty() { "" } else { "***" })
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "{}{}{}{}{}",
        &service_url[..authority_start],
        userinfo,
        host,
        path,
        query
    )
}

/// Renders the fixed message body dispatched alongside every service URL.
pub fn report_message(report: &dyn Report) -> String {
    let mut message = format!(
        "{} Scanned, {} Updated, {} Failed",
        report.scanned().len(),
        report.updated().len(),
        report.failed().len()
    );
    for container in report.updated() {
        let _ = write!(message, "\n- {} updated", container.name());
    }
    for container in report.failed() {
        let _ = write!(message, "\n- {} failed", container.name());
    }
    message
}
