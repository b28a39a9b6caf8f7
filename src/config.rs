use std::env;

use crate::constants::{
    DEFAULT_CLOCK_SKEW_SECONDS, DEFAULT_HTTP_PORT, DEFAULT_NONCE_TTL_SECONDS,
    DEFAULT_VERIFY_METHOD, DEFAULT_VERIFY_PATH,
};

/// Runtime configuration for the verifier, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub audience: String,
    pub verify_method: String,
    pub verify_path: String,
    pub nonce_ttl_seconds: i64,
    pub clock_skew_seconds: i64,
    pub http_port: String,
}

impl Config {
    /// Load configuration from environment variables with the spec's
    /// defaults. Only `VERIFIER_AUDIENCE` has no safe default — a verifier
    /// that will accept any audience is a misconfiguration, not a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let audience =
            env::var("VERIFIER_AUDIENCE").map_err(|_| ConfigError::MissingAudience)?;

        let verify_method = env::var("VERIFY_METHOD")
            .unwrap_or_else(|_| DEFAULT_VERIFY_METHOD.to_string())
            .to_uppercase();

        let verify_path =
            env::var("VERIFY_PATH").unwrap_or_else(|_| DEFAULT_VERIFY_PATH.to_string());

        let nonce_ttl_seconds = Self::parse_i64("NONCE_TTL_SECONDS", DEFAULT_NONCE_TTL_SECONDS)?;
        let clock_skew_seconds =
            Self::parse_i64("CLOCK_SKEW_SECONDS", DEFAULT_CLOCK_SKEW_SECONDS)?;

        let http_port =
            env::var("HTTP_PORT").unwrap_or_else(|_| DEFAULT_HTTP_PORT.to_string());

        Ok(Config {
            audience,
            verify_method,
            verify_path,
            nonce_ttl_seconds,
            clock_skew_seconds,
            http_port,
        })
    }

    fn parse_i64(var: &'static str, default: i64) -> Result<i64, ConfigError> {
        match env::var(var) {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber(var)),
            Err(_) => Ok(default),
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.http_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("VERIFIER_AUDIENCE must be set")]
    MissingAudience,

    #[error("invalid integer value for {0}")]
    InvalidNumber(&'static str),
}
