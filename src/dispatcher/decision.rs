//! The per-message decision pipeline.
//!
//! Steps run in a fixed order and the first one that blocks wins:
//! room scope, own message or command, addressing, notice type, access.

use strum::Display;

use crate::identity::BotIdentity;
use crate::policy::{AccessPolicy, RoomScope};
use crate::types::{InboundMessage, MessageKind};

use super::addressing::{name_matches, strip_address_prefix};

/// Messages starting with this are commands for another handler.
pub const COMMAND_PREFIX: char = '!';

/// Joined member count of a private one-to-one session.
pub const PRIVATE_SESSION_MEMBERS: u64 = 2;

/// Read-only settings every decision is made against.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub identity: BotIdentity,
    pub access: AccessPolicy,
    pub rooms: RoomScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IgnoreReason {
    #[strum(serialize = "room not in scope")]
    RoomNotInScope,
    #[strum(serialize = "own message")]
    OwnMessage,
    #[strum(serialize = "explicit command")]
    Command,
    #[strum(serialize = "not addressed to bot")]
    NotAddressed,
    #[strum(serialize = "notice-type message")]
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchDecision {
    Ignore(IgnoreReason),
    /// Addressed to the bot by a user outside the access policy.
    Deny,
    Respond {
        query: String,
    },
}

/// Run the steps that need no room lookup.
///
/// Returns the reason when the room scope or own message/command filter
/// already rejects the message.
#[must_use]
pub fn screen(settings: &DispatchSettings, message: &InboundMessage) -> Option<IgnoreReason> {
    if !settings.rooms.contains(&message.room_id) {
        return Some(IgnoreReason::RoomNotInScope);
    }
    if &message.sender == settings.identity.user_id() {
        return Some(IgnoreReason::OwnMessage);
    }
    if message.body.starts_with(COMMAND_PREFIX) {
        return Some(IgnoreReason::Command);
    }
    None
}

/// Decide what to do with `message` given the room's joined member count.
#[must_use]
pub fn decide(
    settings: &DispatchSettings,
    message: &InboundMessage,
    joined_members: u64,
) -> DispatchDecision {
    if let Some(reason) = screen(settings, message) {
        return DispatchDecision::Ignore(reason);
    }

    let addressed = joined_members == PRIVATE_SESSION_MEMBERS
        || name_matches(&message.body, settings.identity.name());
    if !addressed {
        return DispatchDecision::Ignore(IgnoreReason::NotAddressed);
    }

    if message.kind == MessageKind::Notice {
        return DispatchDecision::Ignore(IgnoreReason::Notice);
    }

    if !settings.access.allows(&message.sender) {
        return DispatchDecision::Deny;
    }

    DispatchDecision::Respond {
        query: strip_address_prefix(&message.body, &settings.identity.address_prefix()),
    }
}
