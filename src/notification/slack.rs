//! Slack service URLs, including Discord's Slack-compatible webhooks.

use super::{discord::discord_url, path_segments, ServiceUrlBuilder};
use crate::config::SlackConfig;
use crate::error::{NotifyError, Result};
use crate::formatting::{encode, ColorSet, NotificationContext};
use url::Url;

const PROVIDER: &str = "slack";

/// A parsed Slack webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlackHook {
    /// `https://hooks.slack.com/services/{A}/{B}/{C}`
    Slack {
        token_a: String,
        token_b: String,
        token_c: String,
    },
    /// `https://discord.com/api/webhooks/{channel}/{token}/slack`
    DiscordViaSlack { channel: String, token: String },
}

impl SlackHook {
    /// Picks the variant from the host, then checks the path grammar.
    pub fn parse(hook_url: &str) -> Result<Self> {
        let url = Url::parse(hook_url).map_err(|e| NotifyError::parse(PROVIDER, e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| NotifyError::parse(PROVIDER, "webhook url has no host"))?;
        let segments = path_segments(&url);

        match host {
            "discord.com" | "discordapp.com" => match segments.as_slice() {
                ["api", "webhooks", channel, token, "slack"] => Ok(SlackHook::DiscordViaSlack {
                    channel: channel.to_string(),
                    token: token.to_string(),
                }),
                _ => Err(NotifyError::parse(
                    PROVIDER,
                    "expected /api/webhooks/{channel}/{token}/slack",
                )),
            },
            "hooks.slack.com" => match segments.as_slice() {
                ["services", a, b, c] => Ok(SlackHook::Slack {
                    token_a: a.to_string(),
                    token_b: b.to_string(),
                    token_c: c.to_string(),
                }),
                _ => Err(NotifyError::parse(
                    PROVIDER,
                    format!(
                        "expected /services/{{A}}/{{B}}/{{C}}, got {} path segments",
                        segments.len()
                    ),
                )),
            },
            other => Err(NotifyError::parse(
                PROVIDER,
                format!("unsupported webhook host {}", other),
            )),
        }
    }
}

/// Builds `slack://` URLs, or `discord://` URLs for Discord-hosted hooks.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    hook_url: String,
    identifier: String,
    colors: ColorSet,
}

impl SlackNotifier {
    pub fn new(config: &SlackConfig) -> Result<Self> {
        if config.hook_url.is_empty() {
            return Err(NotifyError::configuration(
                "--notification-slack-hook-url",
                "--notifications slack",
            ));
        }
        let identifier = if config.identifier.is_empty() {
            SlackConfig::default().identifier
        } else {
            config.identifier.clone()
        };
        Ok(Self {
            hook_url: config.hook_url.clone(),
            identifier,
            colors: ColorSet::default(),
        })
    }
}

impl ServiceUrlBuilder for SlackNotifier {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn service_url(&self, ctx: &NotificationContext) -> Result<String> {
        let url = match SlackHook::parse(&self.hook_url)? {
            SlackHook::Slack {
                token_a,
                token_b,
                token_c,
            } => format!(
                "slack://{}@{}/{}/{}?color={}&title={}",
                encode(&self.identifier),
                token_a,
                token_b,
                token_c,
                self.colors.default_color(),
                encode(&ctx.title)
            ),
            SlackHook::DiscordViaSlack { channel, token } => {
                discord_url(&channel, &token, &self.identifier, &self.colors, &ctx.title)
            }
        };
        Ok(url)
    }
}
