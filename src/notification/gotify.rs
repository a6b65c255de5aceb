//! Gotify service URLs.

use super::ServiceUrlBuilder;
use crate::config::GotifyConfig;
use crate::error::{NotifyError, Result};
use crate::formatting::{encode, NotificationContext};
use url::Url;

const PROVIDER: &str = "gotify";

/// Builds `gotify://{host}/{token}` from a server base URL and app token.
#[derive(Debug, Clone)]
pub struct GotifyNotifier {
    base_url: String,
    token: String,
}

impl GotifyNotifier {
    pub fn new(config: &GotifyConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(NotifyError::configuration(
                "--notification-gotify-url",
                "--notifications gotify",
            ));
        }
        if config.token.is_empty() {
            return Err(NotifyError::configuration(
                "--notification-gotify-token",
                "--notifications gotify",
            ));
        }
        Ok(Self {
            base_url: config.url.clone(),
            token: config.token.clone(),
        })
    }
}

impl ServiceUrlBuilder for GotifyNotifier {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn service_url(&self, ctx: &NotificationContext) -> Result<String> {
        let url =
            Url::parse(&self.base_url).map_err(|e| NotifyError::parse(PROVIDER, e.to_string()))?;
        let disable_tls = match url.scheme() {
            "https" => false,
            "http" => true,
            other => {
                return Err(NotifyError::parse(
                    PROVIDER,
                    format!("unsupported scheme {}, expected http or https", other),
                ))
            }
        };
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| NotifyError::parse(PROVIDER, "base url has no host"))?;

        let mut target = host.to_string();
        if let Some(port) = url.port() {
            target.push_str(&format!(":{}", port));
        }
        target.push_str(url.path().trim_end_matches('/'));

        let mut query = String::new();
        if disable_tls {
            query.push_str("disabletls=Yes&");
        }
        query.push_str(&format!("title={}", encode(&ctx.title)));

        Ok(format!("gotify://{}/{}?{}", target, self.token, query))
    }
}
