//! SMTP service URLs.

use super::ServiceUrlBuilder;
use crate::config::{EmailConfig, SmtpAuth};
use crate::error::{NotifyError, Result};
use crate::formatting::{encode, NotificationContext, PRODUCT_NAME};

const PROVIDER: &str = "email";
const FLAG_CONTEXT: &str = "--notifications email";

/// Builds `smtp://{user}:{password}@{host}:{port}/?...` URLs.
///
/// Every user-supplied value is encoded on its own so that `@`, `:`, `/`
/// and spaces never collide with the URL's delimiters.
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    from: String,
    to: Vec<String>,
    server: String,
    port: u16,
    user: String,
    password: String,
    auth: SmtpAuth,
    subject: Option<String>,
}

impl EmailNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        if config.from.is_empty() {
            return Err(NotifyError::configuration(
                "--notification-email-from",
                FLAG_CONTEXT,
            ));
        }
        let to: Vec<String> = config
            .to
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .collect();
        if to.is_empty() {
            return Err(NotifyError::configuration(
                "--notification-email-to",
                FLAG_CONTEXT,
            ));
        }
        if config.server.is_empty() {
            return Err(NotifyError::configuration(
                "--notification-email-server",
                FLAG_CONTEXT,
            ));
        }

        Ok(Self {
            from: config.from.clone(),
            to,
            server: config.server.clone(),
            port: config.port,
            user: config.user.clone(),
            password: config.password.clone(),
            auth: config.auth,
            subject: config.subject.clone().filter(|s| !s.is_empty()),
        })
    }

    pub fn subject(&self, ctx: &NotificationContext) -> String {
        self.subject
            .clone()
            .unwrap_or_else(|| ctx.default_subject())
    }
}

impl ServiceUrlBuilder for EmailNotifier {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn service_url(&self, ctx: &NotificationContext) -> Result<String> {
        let credentials = if self.user.is_empty() {
            String::new()
        } else {
            format!("{}:{}@", encode(&self.user), encode(&self.password))
        };

        Ok(format!(
            "smtp://{}{}:{}/?auth={}&fromaddress={}&fromname={}&subject={}&toaddresses={}",
            credentials,
            self.server,
            self.port,
            self.auth,
            encode(&self.from),
            PRODUCT_NAME,
            encode(&self.subject(ctx)),
            encode(&self.to.join(","))
        ))
    }
}
