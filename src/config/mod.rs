use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    /// Access token lifetime in seconds (cookie max-age matches)
    pub access_token_ttl: i64,
    /// Refresh token lifetime in seconds (cookie max-age matches)
    pub refresh_token_ttl: i64,
    /// Comma-separated frontend origins allowed by CORS
    pub allowed_origins: Vec<String>,
    /// Flat shipping fee applied to every order
    pub shipping_fee: Decimal,
    pub max_connections: u32,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .map_err(|_| anyhow::anyhow!("PORT environment variable is required"))?
                .parse()?,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            jwt_access_secret: env::var("JWT_ACCESS_SECRET").map_err(|_| {
                anyhow::anyhow!("JWT_ACCESS_SECRET environment variable is required")
            })?,
            jwt_refresh_secret: env::var("JWT_REFRESH_SECRET").map_err(|_| {
                anyhow::anyhow!("JWT_REFRESH_SECRET environment variable is required")
            })?,
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap_or(900),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL")
                .unwrap_or_else(|_| "604800".to_string())
                .parse()
                .unwrap_or(604_800),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            shipping_fee: env::var("SHIPPING_FEE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .unwrap_or(Decimal::new(50, 0)),
            max_connections: env::var("MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Secure cookies are only set when running behind TLS in production.
    pub fn secure_cookies(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_cookies_follow_environment() {
        let mut config = Config {
            environment: "development".to_string(),
            port: 8080,
            database_url: String::new(),
            jwt_access_secret: String::new(),
            jwt_refresh_secret: String::new(),
            access_token_ttl: 900,
            refresh_token_ttl: 604_800,
            allowed_origins: vec![],
            shipping_fee: Decimal::new(50, 0),
            max_connections: 20,
            log_level: "info".to_string(),
        };
        assert!(!config.secure_cookies());

        config.environment = "production".to_string();
        assert!(config.secure_cookies());
    }
}
