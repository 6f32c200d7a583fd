use crate::error::AppError;
use crate::store::DEFAULT_HISTORY_LIMIT;
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub env: String,
    /// Cap on retained notifications per user
    pub history_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let env_name = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let history_limit = match env::var("NOTIFICATION_HISTORY_LIMIT") {
            Ok(raw) => raw.parse().map_err(|_| {
                AppError::Config(format!("NOTIFICATION_HISTORY_LIMIT invalid: {raw}"))
            })?,
            Err(_) => DEFAULT_HISTORY_LIMIT,
        };
        if history_limit == 0 {
            return Err(AppError::Config(
                "NOTIFICATION_HISTORY_LIMIT must be at least 1".into(),
            ));
        }

        Ok(Self {
            env: env_name,
            history_limit,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
