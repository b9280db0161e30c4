use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};
use crate::provider::{Answer, AnswerProvider};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: Role,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

pub struct OpenRouterClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    system_prompt: Option<String>,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String, system_prompt: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
            system_prompt,
        }
    }

    fn build_messages(&self, prompt: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = &self.system_prompt {
            messages.push(Message {
                role: Role::System,
                content: Some(system_prompt.clone()),
            });
        }
        messages.push(Message {
            role: Role::User,
            content: Some(prompt.to_string()),
        });
        messages
    }
}

#[async_trait]
impl AnswerProvider for OpenRouterClient {
    async fn get_answer(&self, prompt: &str) -> Result<Answer> {
        debug!(
            "Sending request to OpenRouter API ({} prompt characters)",
            prompt.len()
        );

        let request = OpenRouterRequest {
            model: &self.model,
            messages: self.build_messages(prompt),
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::OpenRouterApi { status, message });
        }

        let api_response: OpenRouterResponse = response.json().await?;
        let text = extract_text(api_response)?;

        debug!("Received response from OpenRouter API");
        Ok(Answer { text })
    }
}

fn extract_text(response: OpenRouterResponse) -> Result<String> {
    let message = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BotError::OpenRouterResponse("No choices in response".to_string()))?
        .message;

    if message.role != Role::Assistant {
        debug!("Unexpected role in OpenRouter reply: {:?}", message.role);
    }

    match message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(BotError::OpenRouterResponse(
            "Empty content in response".to_string(),
        )),
    }
}
