//! The bot's own identity, fixed at startup.

use crate::types::UserId;

/// Who the bot is: its account and the name people address it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    user_id: UserId,
    name: String,
}

impl BotIdentity {
    /// Build the identity for `user_id`.
    ///
    /// A blank or missing `configured_name` falls back to the account localpart.
    #[must_use]
    pub fn new(user_id: UserId, configured_name: Option<&str>) -> Self {
        let name = match configured_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => localpart(user_id.as_str()).to_string(),
        };
        Self { user_id, name }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The literal `"<name>: "` prefix stripped from queries.
    #[must_use]
    pub fn address_prefix(&self) -> String {
        format!("{}: ", self.name)
    }
}

/// Extract the localpart from `@localpart:server`.
///
/// Input without a sigil or server part is returned as far as it goes.
#[must_use]
pub fn localpart(user_id: &str) -> &str {
    let without_sigil = user_id.strip_prefix('@').unwrap_or(user_id);
    without_sigil
        .split_once(':')
        .map_or(without_sigil, |(local, _)| local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_name_to_localpart() {
        let identity = BotIdentity::new(UserId::from("@bard:example.org"), None);
        assert_eq!(identity.name(), "bard");
    }

    #[test]
    fn blank_name_falls_back_to_localpart() {
        let identity = BotIdentity::new(UserId::from("@bard:example.org"), Some("   "));
        assert_eq!(identity.name(), "bard");
    }

    #[test]
    fn configured_name_wins() {
        let identity = BotIdentity::new(UserId::from("@bard:example.org"), Some("Aria"));
        assert_eq!(identity.name(), "Aria");
        assert_eq!(identity.address_prefix(), "Aria: ");
        assert_eq!(identity.user_id().as_str(), "@bard:example.org");
    }

    #[test]
    fn localpart_handles_partial_ids() {
        assert_eq!(localpart("@bot:matrix.org:8448"), "bot");
        assert_eq!(localpart("bot"), "bot");
        assert_eq!(localpart("@bot"), "bot");
    }
}
