use crate::ops::error::{config_error, OpsResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable holding the review API base URL.
pub const API_URL_ENV: &str = "REVIEW_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> OpsResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let url = reqwest::Url::parse(trimmed)
            .map_err(|e| config_error(&format!("Invalid API URL '{}': {}", base_url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(config_error(&format!(
                "API URL must use http or https: {}",
                base_url
            )));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Reads `REVIEW_API_URL`, loading a `.env` file first if one exists.
    pub fn from_env() -> OpsResult<Self> {
        let _ = dotenvy::dotenv();
        match dotenvy::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(&url),
            _ => Ok(Self::default()),
        }
    }
}
