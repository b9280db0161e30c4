//! Matrix chat transport backed by matrix-sdk.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use matrix_sdk::{
    Client, Room, RoomState,
    config::SyncSettings,
    ruma::{
        OwnedEventId, OwnedRoomId, OwnedUserId,
        api::client::{
            receipt::create_receipt::v3::ReceiptType,
            typing::create_typing_event::v3::{Request as TypingRequest, Typing},
        },
        events::{
            receipt::ReceiptThread,
            relation::InReplyTo,
            room::{
                member::StrippedRoomMemberEvent,
                message::{OriginalSyncRoomMessageEvent, Relation, RoomMessageEventContent},
            },
        },
    },
};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{BotError, Result};
use crate::policy::RoomScope;
use crate::transport::ChatTransport;
use crate::types::{EventId, InboundMessage, MessageKind, RoomId, UserId};

const DEVICE_DISPLAY_NAME: &str = "bardbot";

/// Build a client and log in with the configured password.
pub async fn connect(config: &Config) -> Result<Client> {
    debug!("Building Matrix client for {}", config.homeserver);
    let client = Client::builder()
        .homeserver_url(config.homeserver.as_str())
        .sqlite_store(&config.store_path, None)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(&config.matrix_user, &config.matrix_password)
        .initial_device_display_name(DEVICE_DISPLAY_NAME)
        .await?;

    info!("Logged in to {} as {}", config.homeserver, config.matrix_user);
    Ok(client)
}

/// The logged-in account id.
pub fn own_user_id(client: &Client) -> Result<UserId> {
    client
        .user_id()
        .map(|id| UserId::from(id.as_str()))
        .ok_or_else(|| BotError::Transport("client is not logged in".to_string()))
}

/// Sync once to skip the backlog, attach the handlers, then sync forever.
pub async fn run_sync(client: Client, dispatcher: Arc<Dispatcher>) -> Result<()> {
    debug!("Running initial sync");
    let response = client.sync_once(SyncSettings::default()).await?;

    subscribe(&client, dispatcher);

    info!("Listening for room messages");
    client
        .sync(SyncSettings::default().token(response.next_batch))
        .await?;
    Ok(())
}

/// Forward every room message to `dispatcher` and accept room invites.
///
/// Each message is handled on its own task so a slow answer does not hold
/// up sync.
pub fn subscribe(client: &Client, dispatcher: Arc<Dispatcher>) {
    let invite_dispatcher = Arc::clone(&dispatcher);
    client.add_event_handler(
        move |event: StrippedRoomMemberEvent, client: Client, room: Room| {
            let dispatcher = Arc::clone(&invite_dispatcher);
            async move { accept_invite(&event, &client, &room, &dispatcher).await }
        },
    );

    client.add_event_handler(move |event: OriginalSyncRoomMessageEvent, room: Room| {
        let dispatcher = Arc::clone(&dispatcher);
        async move {
            if room.state() != RoomState::Joined {
                return;
            }
            let message = inbound_message(&event, room.room_id().as_str());
            tokio::spawn(async move { dispatcher.handle(&message).await });
        }
    });
}

async fn accept_invite(
    event: &StrippedRoomMemberEvent,
    client: &Client,
    room: &Room,
    dispatcher: &Dispatcher,
) {
    let Some(own) = client.user_id() else {
        return;
    };
    if room.state() != RoomState::Invited {
        return;
    }

    let room_id = RoomId::from(room.room_id().as_str());
    if !should_accept_invite(
        &UserId::from(own.as_str()),
        &UserId::from(event.state_key.as_str()),
        &room_id,
        &dispatcher.settings().rooms,
    ) {
        debug!("Ignoring invite of {} to {room_id}", event.state_key);
        return;
    }

    match room.join().await {
        Ok(()) => info!("Joined {room_id} after invite from {}", event.sender),
        Err(e) => warn!("Failed to join {room_id}: {e}"),
    }
}

/// Join only invites for the bot's own account into rooms it serves.
#[must_use]
pub fn should_accept_invite(
    own: &UserId,
    invitee: &UserId,
    room: &RoomId,
    scope: &RoomScope,
) -> bool {
    own == invitee && scope.contains(room)
}

/// Typing state sent to the server; a zero timeout clears typing.
fn typing_state(timeout: Duration) -> Typing {
    if timeout.is_zero() {
        Typing::No
    } else {
        Typing::Yes(timeout)
    }
}

/// Convert a Matrix room message into the dispatcher's representation.
pub fn inbound_message(event: &OriginalSyncRoomMessageEvent, room_id: &str) -> InboundMessage {
    let millis = i64::from(event.origin_server_ts.0);
    InboundMessage {
        event_id: EventId::from(event.event_id.as_str()),
        room_id: RoomId::from(room_id),
        sender: UserId::from(event.sender.as_str()),
        body: event.content.body().to_string(),
        kind: MessageKind::from_msgtype(event.content.msgtype()),
        timestamp: DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now),
    }
}

/// [`ChatTransport`] over a logged-in Matrix client.
pub struct MatrixTransport {
    client: Client,
}

impl MatrixTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn room(&self, room: &RoomId) -> Result<Room> {
        self.client
            .get_room(&room_id(room)?)
            .ok_or_else(|| BotError::Transport(format!("unknown room {room}")))
    }

    fn own_user_id(&self) -> Result<OwnedUserId> {
        self.client
            .user_id()
            .map(ToOwned::to_owned)
            .ok_or_else(|| BotError::Transport("client is not logged in".to_string()))
    }
}

fn room_id(room: &RoomId) -> Result<OwnedRoomId> {
    OwnedRoomId::try_from(room.as_str())
        .map_err(|e| BotError::Transport(format!("invalid room id {room}: {e}")))
}

fn event_id(event: &EventId) -> Result<OwnedEventId> {
    OwnedEventId::try_from(event.as_str())
        .map_err(|e| BotError::Transport(format!("invalid event id {event}: {e}")))
}

#[async_trait]
impl ChatTransport for MatrixTransport {
    async fn joined_member_count(&self, room: &RoomId) -> Result<u64> {
        Ok(self.room(room)?.joined_members_count())
    }

    async fn mark_read(&self, room: &RoomId, event: &EventId) -> Result<()> {
        self.room(room)?
            .send_single_receipt(ReceiptType::Read, ReceiptThread::Unthreaded, event_id(event)?)
            .await?;
        Ok(())
    }

    /// Sent as a raw request: `Room::typing_notice` caps the timeout at a
    /// few seconds and drops the "off" notice once that has lapsed.
    async fn set_typing(&self, room: &RoomId, timeout: Duration) -> Result<()> {
        let request =
            TypingRequest::new(self.own_user_id()?, room_id(room)?, typing_state(timeout));
        self.client.send(request).await?;
        Ok(())
    }

    async fn send_text(
        &self,
        room: &RoomId,
        text: &str,
        in_reply_to: Option<&EventId>,
    ) -> Result<()> {
        let mut content = RoomMessageEventContent::text_plain(text);
        if let Some(event) = in_reply_to {
            content.relates_to = Some(Relation::Reply {
                in_reply_to: InReplyTo::new(event_id(event)?),
            });
        }
        self.room(room)?.send(content).await?;
        Ok(())
    }
}
