//! Chat network operations the dispatcher drives.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EventId, RoomId};

/// Output side of the chat network plus the room membership lookup.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Number of members currently joined to `room`.
    async fn joined_member_count(&self, room: &RoomId) -> Result<u64>;

    /// Send a read receipt for `event` in `room`.
    async fn mark_read(&self, room: &RoomId, event: &EventId) -> Result<()>;

    /// Show the bot as typing for `timeout`; a zero timeout clears it.
    async fn set_typing(&self, room: &RoomId, timeout: Duration) -> Result<()>;

    /// Send a plain text message, optionally as a reply to `in_reply_to`.
    async fn send_text(
        &self,
        room: &RoomId,
        text: &str,
        in_reply_to: Option<&EventId>,
    ) -> Result<()>;
}
