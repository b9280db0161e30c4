//! Typing indicator bracket around slow work.

use std::future::Future;
use std::time::Duration;

use log::warn;

use crate::error::Result;
use crate::transport::ChatTransport;
use crate::types::RoomId;

/// Long enough to mean "typing until told otherwise".
pub const TYPING_TIMEOUT: Duration = Duration::from_millis(99_999);

/// Run `work` while the bot shows as typing in `room`.
///
/// Typing is switched off after `work` finishes whether it succeeded or
/// not. If switching it on fails, `work` is never polled.
pub async fn while_typing<T, F>(transport: &dyn ChatTransport, room: &RoomId, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    transport.set_typing(room, TYPING_TIMEOUT).await?;

    let result = work.await;

    if let Err(stop_err) = transport.set_typing(room, Duration::ZERO).await {
        if result.is_ok() {
            return Err(stop_err);
        }
        warn!("Failed to clear typing indicator in {room}: {stop_err}");
    }

    result
}
