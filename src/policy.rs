//! Static access rules: which rooms are served and which users may ask.

use std::collections::HashSet;

use crate::types::{RoomId, UserId};

/// Users allowed to use the bot. Empty means everyone.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    allowed_users: HashSet<UserId>,
}

impl AccessPolicy {
    pub fn from_users<I>(users: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<UserId>,
    {
        Self {
            allowed_users: users.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !self.allowed_users.is_empty()
    }

    #[must_use]
    pub fn allows(&self, user: &UserId) -> bool {
        !self.is_restricted() || self.allowed_users.contains(user)
    }
}

/// Rooms the bot serves.
#[derive(Debug, Clone, Default)]
pub enum RoomScope {
    #[default]
    Unrestricted,
    Only(HashSet<RoomId>),
}

impl RoomScope {
    /// An empty list yields [`RoomScope::Unrestricted`].
    pub fn from_rooms<I>(rooms: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RoomId>,
    {
        let rooms: HashSet<RoomId> = rooms.into_iter().map(Into::into).collect();
        if rooms.is_empty() {
            RoomScope::Unrestricted
        } else {
            RoomScope::Only(rooms)
        }
    }

    #[must_use]
    pub fn contains(&self, room: &RoomId) -> bool {
        match self {
            RoomScope::Unrestricted => true,
            RoomScope::Only(rooms) => rooms.contains(room),
        }
    }
}
