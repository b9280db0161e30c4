use std::{env, env::VarError, path::PathBuf, time::Duration};

use log::{debug, error, info};
use url::Url;

use crate::error::{BotError, Result};

const DEFAULT_STORE_PATH: &str = "./store";
const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.0-flash-001";
const DEFAULT_ANSWER_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub homeserver: Url,
    pub matrix_user: String,
    pub matrix_password: String,
    pub store_path: PathBuf,
    /// Name the bot answers to; `None` means the account localpart.
    pub bot_name: Option<String>,
    pub allowed_rooms: Vec<String>,
    pub allowed_users: Vec<String>,
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub system_prompt: Option<String>,
    /// `None` disables the timeout on answer requests.
    pub answer_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key))
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key).map_err(|e| {
                error!("Failed to load {key} from environment: {e}");
                BotError::EnvVar(e)
            })
        };
        let optional = |key: &str| -> Option<String> {
            lookup(key)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let homeserver_raw = required("MATRIX_HOMESERVER")?;
        let homeserver = Url::parse(homeserver_raw.trim()).map_err(|e| {
            error!("Invalid MATRIX_HOMESERVER '{homeserver_raw}': {e}");
            BotError::Config(format!("invalid MATRIX_HOMESERVER: {e}"))
        })?;

        let matrix_user = required("MATRIX_USER")?.trim().to_string();
        if matrix_user.is_empty() {
            error!("MATRIX_USER is empty");
            return Err(BotError::Config("MATRIX_USER must not be empty".to_string()));
        }
        let matrix_password = required("MATRIX_PASSWORD")?;
        let openrouter_api_key = required("OPENROUTER_API_KEY")?;

        let store_path = optional("MATRIX_STORE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);
        let openrouter_model =
            optional("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string());

        let answer_timeout = match optional("ANSWER_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Some(Duration::from_secs(DEFAULT_ANSWER_TIMEOUT_SECS)),
        };

        let config = Self {
            homeserver,
            matrix_user,
            matrix_password,
            store_path,
            bot_name: optional("BOT_NAME"),
            allowed_rooms: optional("ALLOWED_ROOMS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            allowed_users: optional("ALLOWED_USERS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            openrouter_api_key,
            openrouter_model,
            system_prompt: optional("SYSTEM_PROMPT"),
            answer_timeout,
        };

        info!("Configuration loaded successfully");
        debug!("Homeserver: {}", config.homeserver);
        debug!("Matrix user: {}", config.matrix_user);
        debug!(
            "Matrix password length: {} characters",
            config.matrix_password.len()
        );
        debug!(
            "OpenRouter API key length: {} characters",
            config.openrouter_api_key.len()
        );
        debug!("OpenRouter model: {}", config.openrouter_model);
        debug!("Bot name override: {:?}", config.bot_name);
        debug!("Allowed rooms: {:?}", config.allowed_rooms);
        debug!("Allowed users: {:?}", config.allowed_users);
        debug!("Answer timeout: {:?}", config.answer_timeout);

        Ok(config)
    }
}

fn parse_timeout(raw: &str) -> Result<Option<Duration>> {
    let secs: u64 = raw.parse().map_err(|e| {
        error!("Invalid ANSWER_TIMEOUT_SECS '{raw}': {e}");
        BotError::Config(format!("invalid ANSWER_TIMEOUT_SECS '{raw}': {e}"))
    })?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("MATRIX_HOMESERVER", "https://matrix.example.org"),
            ("MATRIX_USER", "@bard:example.org"),
            ("MATRIX_PASSWORD", "hunter2"),
            ("OPENROUTER_API_KEY", "sk-test"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_lookup(|key| {
            vars.get(key)
                .map(|value| (*value).to_string())
                .ok_or(VarError::NotPresent)
        })
    }

    #[test]
    fn applies_defaults() -> Result<()> {
        let config = load(&base_vars())?;
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(config.openrouter_model, DEFAULT_OPENROUTER_MODEL);
        assert_eq!(config.answer_timeout, Some(Duration::from_secs(120)));
        assert!(config.bot_name.is_none());
        assert!(config.allowed_rooms.is_empty());
        assert!(config.allowed_users.is_empty());
        assert!(config.system_prompt.is_none());
        Ok(())
    }

    #[test]
    fn splits_and_trims_lists() -> Result<()> {
        let mut vars = base_vars();
        vars.insert("ALLOWED_USERS", " @alice:example.org, ,@bob:example.org ");
        vars.insert("ALLOWED_ROOMS", "!room:example.org");
        let config = load(&vars)?;
        assert_eq!(
            config.allowed_users,
            vec!["@alice:example.org", "@bob:example.org"]
        );
        assert_eq!(config.allowed_rooms, vec!["!room:example.org"]);
        Ok(())
    }

    #[test]
    fn blank_bot_name_is_treated_as_absent() -> Result<()> {
        let mut vars = base_vars();
        vars.insert("BOT_NAME", "  ");
        assert!(load(&vars)?.bot_name.is_none());
        Ok(())
    }

    #[test]
    fn zero_timeout_disables_it() -> Result<()> {
        let mut vars = base_vars();
        vars.insert("ANSWER_TIMEOUT_SECS", "0");
        assert!(load(&vars)?.answer_timeout.is_none());
        Ok(())
    }

    #[test]
    fn missing_credential_is_a_configuration_error() {
        let mut vars = base_vars();
        vars.remove("OPENROUTER_API_KEY");
        let err = load(&vars).err().map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::Configuration));
    }

    #[test]
    fn rejects_bad_timeout_and_homeserver() {
        let mut vars = base_vars();
        vars.insert("ANSWER_TIMEOUT_SECS", "soon");
        assert!(matches!(load(&vars), Err(BotError::Config(_))));

        let mut vars = base_vars();
        vars.insert("MATRIX_HOMESERVER", "not a url");
        assert!(matches!(load(&vars), Err(BotError::Config(_))));
    }
}
