//! Client configuration loaded from the environment.
//!
//! ```bash
//! export RUNWAY_API_URL="https://api.example.com"
//! export RUNWAY_API_TIMEOUT_SECS="10"
//! ```
//!
//! A `.env` file in the working directory is read first when present.

use std::env;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and host of the content API, without a trailing slash.
    pub base_url: String,
    /// Upper bound for a whole request, connect through body read.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> ApiResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let base_url = lookup("RUNWAY_API_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidArgument(
                "RUNWAY_API_URL must not be empty".to_string(),
            ));
        }

        let timeout = match lookup("RUNWAY_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ApiError::InvalidArgument(format!("RUNWAY_API_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout),
        })
    }
}
