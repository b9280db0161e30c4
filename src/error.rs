use std::time::Duration;

use strum::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Matrix error: {0}")]
    Matrix(Box<matrix_sdk::Error>),

    #[error("Matrix HTTP error: {0}")]
    MatrixHttp(Box<matrix_sdk::HttpError>),

    #[error("Matrix client build error: {0}")]
    MatrixBuild(#[from] matrix_sdk::ClientBuildError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("OpenRouter API error ({status}): {message}")]
    OpenRouterApi {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("OpenRouter response error: {0}")]
    OpenRouterResponse(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Answer provider timed out after {0:?}")]
    ProviderTimeout(Duration),
}

impl From<matrix_sdk::Error> for BotError {
    fn from(err: matrix_sdk::Error) -> Self {
        BotError::Matrix(Box::new(err))
    }
}

/// Coarse classification of a [`BotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    /// Chat network failures: read receipts, typing, sending, sync.
    Transport,
    /// Answer service failures, including timeouts and malformed replies.
    Provider,
    /// Missing or invalid startup configuration.
    Configuration,
}

impl From<matrix_sdk::HttpError> for BotError {
    fn from(err: matrix_sdk::HttpError) -> Self {
        BotError::MatrixHttp(Box::new(err))
    }
}

impl BotError {
    /// Returns which part of the system the error originated from.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            BotError::Matrix(_)
            | BotError::MatrixHttp(_)
            | BotError::MatrixBuild(_)
            | BotError::Transport(_) => ErrorKind::Transport,
            BotError::OpenRouterApi { .. }
            | BotError::OpenRouterResponse(_)
            | BotError::Reqwest(_)
            | BotError::ProviderTimeout(_) => ErrorKind::Provider,
            BotError::Config(_) | BotError::EnvVar(_) => ErrorKind::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
