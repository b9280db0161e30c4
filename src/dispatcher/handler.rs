//! Entry point for inbound messages.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::error::{BotError, Result};
use crate::provider::{Answer, AnswerProvider};
use crate::transport::ChatTransport;
use crate::types::InboundMessage;

use super::decision::{DispatchDecision, DispatchSettings, IgnoreReason, decide, screen};
use super::typing::while_typing;

/// Reply sent to users outside the access policy.
pub const DENIAL_TEXT: &str = "Sorry, you're not allowed to use this functionality.";

/// How a single message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored(IgnoreReason),
    Denied,
    Replied,
}

/// Decides per message whether to answer and runs the answer sequence.
///
/// Holds only read-only settings and collaborators, so one instance can
/// serve concurrent messages.
pub struct Dispatcher {
    settings: Arc<DispatchSettings>,
    transport: Arc<dyn ChatTransport>,
    provider: Arc<dyn AnswerProvider>,
    answer_timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(
        settings: Arc<DispatchSettings>,
        transport: Arc<dyn ChatTransport>,
        provider: Arc<dyn AnswerProvider>,
        answer_timeout: Option<Duration>,
    ) -> Self {
        Self {
            settings,
            transport,
            provider,
            answer_timeout,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Handle one inbound message. Never fails; errors are logged.
    pub async fn handle(&self, message: &InboundMessage) {
        if let Err(e) = self.process(message).await {
            error!(
                "Failed to answer {} from {} in {} ({} error): {}",
                message.event_id,
                message.sender,
                message.room_id,
                e.kind(),
                e
            );
        }
    }

    /// Run the decision pipeline and act on it.
    pub async fn process(&self, message: &InboundMessage) -> Result<Outcome> {
        if let Some(reason) = screen(&self.settings, message) {
            debug!("Ignoring {} in {}: {reason}", message.event_id, message.room_id);
            return Ok(Outcome::Ignored(reason));
        }

        let joined_members = self.transport.joined_member_count(&message.room_id).await?;

        match decide(&self.settings, message, joined_members) {
            DispatchDecision::Ignore(reason) => {
                debug!("Ignoring {} in {}: {reason}", message.event_id, message.room_id);
                Ok(Outcome::Ignored(reason))
            }
            DispatchDecision::Deny => {
                self.transport
                    .send_text(&message.room_id, DENIAL_TEXT, Some(&message.event_id))
                    .await?;
                info!(
                    "Denied {} in {}: sender not in allowed users",
                    message.sender, message.room_id
                );
                Ok(Outcome::Denied)
            }
            DispatchDecision::Respond { query } => {
                self.respond(message, &query).await?;
                Ok(Outcome::Replied)
            }
        }
    }

    async fn respond(&self, message: &InboundMessage, query: &str) -> Result<()> {
        info!(
            "Answering {} from {} in {}",
            message.event_id, message.sender, message.room_id
        );
        debug!(
            "Message {} ({}) sent at {}: {}",
            message.event_id,
            message.kind,
            message.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            message.body
        );

        if let Err(e) = self
            .transport
            .mark_read(&message.room_id, &message.event_id)
            .await
        {
            warn!("Failed to mark {} as read: {e}", message.event_id);
        }

        debug!("Forwarding query: {query}");
        let answer = while_typing(
            self.transport.as_ref(),
            &message.room_id,
            self.ask(query),
        )
        .await?;

        self.transport
            .send_text(&message.room_id, &answer.text, Some(&message.event_id))
            .await?;
        info!("Replied to {} in {}", message.sender, message.room_id);
        debug!("Reply text: {}", answer.text);

        Ok(())
    }

    async fn ask(&self, query: &str) -> Result<Answer> {
        match self.answer_timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.get_answer(query))
                .await
                .map_err(|_| BotError::ProviderTimeout(limit))?,
            None => self.provider.get_answer(query).await,
        }
    }
}
