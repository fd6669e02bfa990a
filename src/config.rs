//! Configuration management

use anyhow::{self, Context, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string (optional, falls back to the in-memory store)
    pub database_url: Option<String>,

    /// JWT secret key for bearer token validation
    pub jwt_secret: String,

    /// Address the HTTP server listens on
    pub bind_addr: String,

    /// Largest accepted request body (multipart upload included)
    pub max_upload_bytes: usize,

    pub db_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty());

        let jwt_secret = std::env::var("JWT_SECRET")
            .context("JWT_SECRET must be set (generate one with: openssl rand -base64 48)")?;

        if jwt_secret.len() < 32 {
            anyhow::bail!(
                "JWT_SECRET must be at least 32 bytes (current: {} bytes). Generate one with: openssl rand -base64 48",
                jwt_secret.len()
            );
        }

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let max_upload_bytes = parse_env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let db_max_connections = parse_env_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            max_upload_bytes,
            db_max_connections,
        })
    }

    /// Test configuration: in-memory store, given secret
    #[cfg(test)]
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            jwt_secret: jwt_secret.into(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number (got '{}')", key, value)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-at-least-32-bytes-long";

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_database_url_none_when_not_set() {
        std::env::remove_var("DATABASE_URL");
        std::env::set_var("JWT_SECRET", TEST_SECRET);

        let config = Config::from_env().unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_rejects_short_secret() {
        std::env::set_var("JWT_SECRET", "too-short");

        let result = Config::from_env();
        assert!(result.is_err());

        std::env::set_var("JWT_SECRET", TEST_SECRET);
    }

    #[test]
    fn test_parse_env_or_uses_default_when_unset() {
        std::env::remove_var("NOCBOOK_TEST_UNSET_NUMBER");
        let value: usize = parse_env_or("NOCBOOK_TEST_UNSET_NUMBER", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_or_parses_value() {
        std::env::set_var("NOCBOOK_TEST_UPLOAD_LIMIT", " 2048 ");
        let value: usize = parse_env_or("NOCBOOK_TEST_UPLOAD_LIMIT", 1).unwrap();
        assert_eq!(value, 2048);

        std::env::remove_var("NOCBOOK_TEST_UPLOAD_LIMIT");
    }

    #[test]
    fn test_parse_env_or_rejects_garbage() {
        std::env::set_var("NOCBOOK_TEST_BAD_NUMBER", "ten");
        let result: Result<u32> = parse_env_or("NOCBOOK_TEST_BAD_NUMBER", 1);
        assert!(result.is_err());

        std::env::remove_var("NOCBOOK_TEST_BAD_NUMBER");
    }

    #[test]
    fn test_for_secret_uses_memory_store() {
        let config = Config::for_secret(TEST_SECRET);
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
