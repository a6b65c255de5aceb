//! Microsoft Teams service URLs.

use super::{path_segments, ServiceUrlBuilder};
use crate::config::TeamsConfig;
use crate::error::{NotifyError, Result};
use crate::formatting::{encode, NotificationContext, DEFAULT_COLOR_HEX};
use url::Url;

const PROVIDER: &str = "msteams";

/// Builds `teams://{A}/{B}/{C}` from an Office 365 incoming webhook.
#[derive(Debug, Clone)]
pub struct TeamsNotifier {
    hook_url: String,
}

impl TeamsNotifier {
    pub fn new(config: &TeamsConfig) -> Result<Self> {
        if config.hook_url.is_empty() {
            return Err(NotifyError::configuration(
                "--notification-msteams-hook",
                "--notifications msteams",
            ));
        }
        Ok(Self {
            hook_url: config.hook_url.clone(),
        })
    }

    /// Extracts the three tokens of
    /// `https://outlook.office.com/webhook/{A}/IncomingWebhook/{B}/{C}`.
    pub fn tokens(&self) -> Result<(String, String, String)> {
        let url =
            Url::parse(&self.hook_url).map_err(|e| NotifyError::parse(PROVIDER, e.to_string()))?;
        match path_segments(&url).as_slice() {
            ["webhook", a, "IncomingWebhook", b, c] => {
                Ok((a.to_string(), b.to_string(), c.to_string()))
            }
            _ => Err(NotifyError::parse(
                PROVIDER,
                "expected /webhook/{A}/IncomingWebhook/{B}/{C}",
            )),
        }
    }
}

impl ServiceUrlBuilder for TeamsNotifier {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn service_url(&self, ctx: &NotificationContext) -> Result<String> {
        let (a, b, c) = self.tokens()?;
        Ok(format!(
            "teams://{}/{}/{}?color={}&title={}",
            a,
            b,
            c,
            encode(DEFAULT_COLOR_HEX),
            encode(&ctx.title)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(hook_url: &str) -> TeamsNotifier {
        TeamsNotifier::new(&TeamsConfig {
            hook_url: hook_url.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_tokens_are_copied_verbatim() {
        let token_a = "11111111-4444-4444-8444-cccccccccccc@22222222-4444-4444-8444-cccccccccccc";
        let token_b = "33333333012222222222333333333344";
        let token_c = "44444444-4444-4444-8444-cccccccccccc";
        let hook = format!(
            "https://outlook.office.com/webhook/{}/IncomingWebhook/{}/{}",
            token_a, token_b, token_c
        );
        let ctx = NotificationContext::new("docker-01", None);

        let url = notifier(&hook).service_url(&ctx).unwrap();

        assert_eq!(
            url,
            format!(
                "teams://{}/{}/{}?color=%23406170&title=Watchtower+updates+on+docker-01",
                token_a, token_b, token_c
            )
        );
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let ctx = NotificationContext::new("h", None);
        for hook in [
            "https://outlook.office.com/webhook/a/IncomingWebhook/b",
            "https://outlook.office.com/webhook/a/Outgoing/b/c",
            "https://outlook.office.com/hook/a/IncomingWebhook/b/c",
        ] {
            assert!(matches!(
                notifier(hook).service_url(&ctx),
                Err(NotifyError::Parse { provider: "msteams", .. })
            ));
        }
    }

    #[test]
    fn test_missing_hook_is_configuration_error() {
        let err = TeamsNotifier::new(&TeamsConfig::default()).unwrap_err();
        assert_eq!(err.flag(), Some("--notification-msteams-hook"));
    }
}
