//! Error taxonomy shared by the URL builders, the stats exporter and the
//! notifier registry.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// A required setting is missing. Fatal at startup.
    #[error("{flag} is required when {context} is supplied")]
    Configuration { flag: String, context: String },

    #[error("unknown notifier type: {0}")]
    UnknownNotifier(String),

    /// A webhook URL does not match the grammar of its provider.
    #[error("invalid {provider} url: {reason}")]
    Parse {
        provider: &'static str,
        reason: String,
    },

    #[error("failed to deliver to {target}: {reason}")]
    Transport { target: String, reason: String },

    #[error("cannot encode line protocol: {0}")]
    Encoding(String),
}

impl NotifyError {
    pub fn configuration(flag: &str, context: &str) -> Self {
        Self::Configuration {
            flag: flag.to_string(),
            context: context.to_string(),
        }
    }

    pub fn parse(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::Parse {
            provider,
            reason: reason.into(),
        }
    }

    pub fn transport(target: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    /// The command-line flag named by a configuration error.
    pub fn flag(&self) -> Option<&str> {
        match self {
            Self::Configuration { flag, .. } => Some(flag),
            _ => None,
        }
    }

    /// Recoverable errors only affect the current cycle of one provider.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::Transport { .. } | Self::Encoding(_)
        )
    }
}

pub type Result<T, E = NotifyError> = std::result::Result<T, E>;
