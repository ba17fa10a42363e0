// src/config.rs

//! Configuration loading utilities.
//!
//! The TOML application config lives in the storage directory; the bot
//! credentials come from the environment (or a `.env` file) and are passed
//! explicitly into the publisher, never read as ambient state.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load and validate the application config from `{storage_dir}/config.toml`.
///
/// Falls back to defaults if the file is missing or unreadable; validation
/// still runs so a half-filled config fails loudly instead of mid-run.
pub fn load(storage_dir: &Path) -> Result<Config> {
    let config_path = storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    config.validate()?;
    Ok(config)
}

/// Bot credentials, loaded once at process start.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Telegram bot authentication token
    pub bot_token: String,

    /// Numeric id of the target chat (supergroup with forum topics)
    pub target_chat_id: i64,
}

impl Secrets {
    /// Read `BOT_TOKEN` and `TARGET_CHAT_ID` from the environment,
    /// honoring a local `.env` file if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let bot_token = std::env::var("BOT_TOKEN")
            .map_err(|_| AppError::config("BOT_TOKEN is not set"))?;
        let target_chat_id = std::env::var("TARGET_CHAT_ID")
            .map_err(|_| AppError::config("TARGET_CHAT_ID is not set"))?
            .parse::<i64>()
            .map_err(|e| AppError::config(format!("TARGET_CHAT_ID is not an integer: {e}")))?;

        Ok(Self {
            bot_token,
            target_chat_id,
        })
    }
}
