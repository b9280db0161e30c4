//! Conversational answer service seam.

use async_trait::async_trait;

use crate::error::Result;

/// A single completion returned by an [`AnswerProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
}

/// Stateless prompt to answer service. Each call stands alone.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn get_answer(&self, prompt: &str) -> Result<Answer>;
}
