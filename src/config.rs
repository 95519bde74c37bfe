//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use crate::models::User;
use crate::repositories::PostFilter;
use std::env;

const DEFAULT_STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project hosting the Firestore database
    pub gcp_project_id: String,
    /// Firebase Storage bucket for post images and profile photos
    pub storage_bucket: String,
    /// Firebase Storage REST endpoint (overridable for tests)
    pub storage_base_url: String,
    /// Bearer token sent with storage requests
    pub storage_auth_token: Option<String>,
    /// Acting user id for the CLI
    pub user_id: String,
    /// Acting user display name for the CLI
    pub user_name: String,
    /// Raw feed filter (`all`, `favorites`, `author:<id>`)
    pub feed_filter: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            storage_bucket: "test-project.appspot.com".to_string(),
            storage_base_url: DEFAULT_STORAGE_BASE_URL.to_string(),
            storage_auth_token: None,
            user_id: "test-user".to_string(),
            user_name: "Test User".to_string(),
            feed_filter: "all".to_string(),
        }
    }
}

impl Config {
    /// Alias of `Default::default()` used by tests.
    pub fn test_default() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID")
                .map_err(|_| ConfigError::Missing("GCP_PROJECT_ID"))?,
            storage_bucket: env::var("STORAGE_BUCKET")
                .map_err(|_| ConfigError::Missing("STORAGE_BUCKET"))?,
            storage_base_url: env::var("STORAGE_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STORAGE_BASE_URL.to_string()),
            storage_auth_token: env::var("STORAGE_AUTH_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            user_id: env::var("FEED_USER_ID").map_err(|_| ConfigError::Missing("FEED_USER_ID"))?,
            user_name: env::var("FEED_USER_NAME").unwrap_or_default(),
            feed_filter: env::var("FEED_FILTER").unwrap_or_else(|_| "all".to_string()),
        })
    }

    /// The identity the CLI acts as.
    pub fn acting_user(&self) -> User {
        User::new(self.user_id.clone(), self.user_name.clone())
    }

    /// Parse `feed_filter` into a repository filter.
    ///
    /// `author:<id>` only knows the author's id, so the name is left empty.
    pub fn parse_filter(&self) -> Result<PostFilter, ConfigError> {
        match self.feed_filter.trim() {
            "all" => Ok(PostFilter::All),
            "favorites" => Ok(PostFilter::Favorites),
            other => match other.strip_prefix("author:") {
                Some(id) if !id.is_empty() => {
                    Ok(PostFilter::Author(User::new(id.to_string(), String::new())))
                }
                _ => Err(ConfigError::Invalid {
                    name: "FEED_FILTER",
                    value: other.to_string(),
                }),
            },
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
