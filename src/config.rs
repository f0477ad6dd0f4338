//! Runtime configuration sourced from the environment.

use anyhow::{Context, Result};
use std::env;
use teloxide::types::{ChatId, UserId};

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    /// The single account authorized for catalog management.
    pub admin_id: u64,
    pub database_url: String,
}

impl Config {
    /// Load configuration from the environment (after `.env` is applied).
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let admin_id = env::var("ADMIN_ID")
            .context("ADMIN_ID must be set")?
            .parse()
            .context("ADMIN_ID must be a numeric Telegram user id")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            bot_token,
            admin_id,
            database_url,
        })
    }

    /// The admin guard evaluated before every admin-only action.
    pub fn is_admin(&self, user_id: UserId) -> bool {
        user_id == UserId(self.admin_id)
    }

    /// Chat that receives order notifications (the admin's private chat).
    pub fn admin_chat(&self) -> ChatId {
        ChatId(self.admin_id as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            bot_token: "test-token".to_string(),
            admin_id: 42,
            database_url: "sqlite::memory:".to_string(),
        }
    }

    #[test]
    fn test_admin_guard() {
        let config = test_config();
        assert!(config.is_admin(UserId(42)));
        assert!(!config.is_admin(UserId(43)));
    }

    #[test]
    fn test_admin_chat_id() {
        let config = test_config();
        assert_eq!(config.admin_chat(), ChatId(42));
    }
}
