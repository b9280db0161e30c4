//! Startup wiring: configuration, Matrix login, dispatcher and sync loop.

use std::sync::Arc;

use log::{debug, info};

use crate::config::Config;
use crate::dispatcher::{DispatchSettings, Dispatcher};
use crate::error::Result;
use crate::identity::BotIdentity;
use crate::matrix::{self, MatrixTransport};
use crate::openrouter::OpenRouterClient;
use crate::policy::{AccessPolicy, RoomScope};

/// Run the Matrix bot until sync fails or Ctrl-C is received.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    let client = matrix::connect(&config).await?;
    let identity = BotIdentity::new(matrix::own_user_id(&client)?, config.bot_name.as_deref());
    info!("Bot started with name: {}", identity.name());

    let settings = Arc::new(DispatchSettings {
        identity,
        access: AccessPolicy::from_users(config.allowed_users.iter().map(String::as_str)),
        rooms: RoomScope::from_rooms(config.allowed_rooms.iter().map(String::as_str)),
    });

    debug!("Initializing OpenRouter client");
    let provider = OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
        config.system_prompt.clone(),
    );

    let dispatcher = Arc::new(Dispatcher::new(
        settings,
        Arc::new(MatrixTransport::new(client.clone())),
        Arc::new(provider),
        config.answer_timeout,
    ));

    info!("Starting Matrix sync");

    tokio::select! {
        result = matrix::run_sync(client, dispatcher) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}
