//! HTTP Client Utilities
//!
//! Shared HTTP client creation with consistent configuration.

use std::time::Duration;

use super::error::AppError;

/// Create a reqwest HTTP client with standard configuration
///
/// - 30 second request timeout
/// - 10 second connect timeout
pub fn create_http_client() -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("gworkspace/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Transport(format!("Failed to build HTTP client: {}", e)))
}
