//! Test doubles for the dispatcher's collaborators.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{BotError, Result};
use crate::identity::BotIdentity;
use crate::policy::{AccessPolicy, RoomScope};
use crate::provider::{Answer, AnswerProvider};
use crate::transport::ChatTransport;
use crate::types::{EventId, InboundMessage, MessageKind, RoomId, UserId};

use super::decision::DispatchSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    JoinedCount,
    MarkRead(EventId),
    Typing(Duration),
    Ask(String),
    Send {
        text: String,
        reply_to: Option<EventId>,
    },
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

fn record(log: &CallLog, call: Call) {
    if let Ok(mut calls) = log.lock() {
        calls.push(call);
    }
}

pub fn room() -> RoomId {
    RoomId::from("!room:example.org")
}

/// Bot `@bard:example.org` answering to "Aria", no restrictions.
pub fn settings() -> DispatchSettings {
    DispatchSettings {
        identity: BotIdentity::new(UserId::from("@bard:example.org"), Some("Aria")),
        access: AccessPolicy::default(),
        rooms: RoomScope::Unrestricted,
    }
}

pub fn message(sender: &str, body: &str) -> InboundMessage {
    InboundMessage {
        event_id: EventId::from("$event:example.org"),
        room_id: room(),
        sender: UserId::from(sender),
        body: body.to_string(),
        kind: MessageKind::Text,
        timestamp: Utc::now(),
    }
}

/// Records every call in order and fails on request.
pub struct RecordingTransport {
    log: CallLog,
    joined_members: u64,
    fail_mark_read: bool,
    fail_typing_start: bool,
    fail_typing_stop: bool,
    fail_send: bool,
}

impl RecordingTransport {
    pub fn new(joined_members: u64) -> Self {
        Self {
            log: Arc::default(),
            joined_members,
            fail_mark_read: false,
            fail_typing_start: false,
            fail_typing_stop: false,
            fail_send: false,
        }
    }

    pub fn fail_mark_read(mut self) -> Self {
        self.fail_mark_read = true;
        self
    }

    pub fn fail_typing(mut self) -> Self {
        self.fail_typing_start = true;
        self.fail_typing_stop = true;
        self
    }

    pub fn fail_typing_stop(mut self) -> Self {
        self.fail_typing_stop = true;
        self
    }

    pub fn fail_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn log(&self) -> CallLog {
        Arc::clone(&self.log)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn outcome(fail: bool, what: &str) -> Result<()> {
        if fail {
            Err(BotError::Transport(format!("{what} failed")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn joined_member_count(&self, _room: &RoomId) -> Result<u64> {
        record(&self.log, Call::JoinedCount);
        Ok(self.joined_members)
    }

    async fn mark_read(&self, _room: &RoomId, event: &EventId) -> Result<()> {
        record(&self.log, Call::MarkRead(event.clone()));
        Self::outcome(self.fail_mark_read, "read receipt")
    }

    async fn set_typing(&self, _room: &RoomId, timeout: Duration) -> Result<()> {
        record(&self.log, Call::Typing(timeout));
        let fail = if timeout.is_zero() {
            self.fail_typing_stop
        } else {
            self.fail_typing_start
        };
        Self::outcome(fail, "typing")
    }

    async fn send_text(
        &self,
        _room: &RoomId,
        text: &str,
        in_reply_to: Option<&EventId>,
    ) -> Result<()> {
        record(
            &self.log,
            Call::Send {
                text: text.to_string(),
                reply_to: in_reply_to.cloned(),
            },
        );
        Self::outcome(self.fail_send, "send")
    }
}

enum Script {
    Answer(String),
    Fail,
    Hang,
}

/// Answer provider writing into the transport's call log.
pub struct ScriptedProvider {
    log: CallLog,
    script: Script,
}

impl ScriptedProvider {
    pub fn answering(log: CallLog, text: &str) -> Self {
        Self {
            log,
            script: Script::Answer(text.to_string()),
        }
    }

    pub fn failing(log: CallLog) -> Self {
        Self {
            log,
            script: Script::Fail,
        }
    }

    pub fn hanging(log: CallLog) -> Self {
        Self {
            log,
            script: Script::Hang,
        }
    }
}

#[async_trait]
impl AnswerProvider for ScriptedProvider {
    async fn get_answer(&self, prompt: &str) -> Result<Answer> {
        record(&self.log, Call::Ask(prompt.to_string()));
        match &self.script {
            Script::Answer(text) => Ok(Answer { text: text.clone() }),
            Script::Fail => Err(BotError::OpenRouterResponse(
                "No choices in response".to_string(),
            )),
            Script::Hang => std::future::pending().await,
        }
    }
}
