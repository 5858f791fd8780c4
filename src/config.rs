//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Firestore project ID (emulator honors FIRESTORE_EMULATOR_HOST)
    pub firestore_project_id: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Directory cover images are written to and served from
    pub uploads_dir: String,
    /// Mount the diagnostic GET /users/get-all-users route.
    /// Never enable in a production deployment.
    pub expose_user_directory: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            firestore_project_id: env::var("FIRESTORE_PROJECT_ID")
                .unwrap_or_else(|_| "local-dev".to_string()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads/books".to_string()),
            expose_user_directory: env::var("EXPOSE_USER_DIRECTORY")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            firestore_project_id: "test-project".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            frontend_url: "http://localhost:5173".to_string(),
            uploads_dir: "uploads/books".to_string(),
            expose_user_directory: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
