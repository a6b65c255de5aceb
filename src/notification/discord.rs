//! Discord service URLs.
//!
//! Only reached through the Slack builder, when a Slack-compatible webhook is
//! hosted by Discord.

use crate::formatting::{encode, ColorSet};

/// Renders `discord://{token}@{channel}?...`.
///
/// Every severity color is written, zeroed when unset, and query keys are in
/// alphabetical order.
pub fn discord_url(
    channel: &str,
    token: &str,
    username: &str,
    colors: &ColorSet,
    title: &str,
) -> String {
    format!(
        "discord://{}@{}?color={}&colordebug={}&colorerror={}&colorinfo={}&colorwarn={}&splitlines=Yes&title={}&username={}",
        token,
        channel,
        colors.default_color(),
        ColorSet::render(colors.debug),
        ColorSet::render(colors.error),
        ColorSet::render(colors.info),
        ColorSet::render(colors.warn),
        encode(title),
        encode(username)
    )
}
