//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; there is no runtime reload.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// JWT signing key for bearer tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Object-storage bucket for uploaded media
    pub media_bucket: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, set values in a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            media_bucket: env::var("MEDIA_BUCKET")
                .map_err(|_| ConfigError::Missing("MEDIA_BUCKET"))?
                .trim()
                .to_string(),
        })
    }

    /// Fixed config for tests.
    pub fn test_default() -> Self {
        Self {
            port: 5000,
            gcp_project_id: "test-project".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            media_bucket: "test-media-bucket".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
