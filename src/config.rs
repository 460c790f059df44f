use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Runtime configuration, loaded once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: String,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            database_url: env::var("DATABASE_URL").unwrap_or_default(),
            port: env::var("PORT").unwrap_or_else(|_| "8080".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_default(),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_default(),
            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        };

        if config.database_url.is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if config.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if config.admin_username.is_empty() {
            return Err(ConfigError::Missing("ADMIN_USERNAME"));
        }
        if config.admin_password.is_empty() {
            return Err(ConfigError::Missing("ADMIN_PASSWORD"));
        }

        Ok(config)
    }
}
