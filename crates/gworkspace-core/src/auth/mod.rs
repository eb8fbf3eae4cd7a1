//! Authenticated Client Provider
//!
//! Turns client id, client secret and refresh token into a [`GoogleClient`]
//! carrying a fresh access token. Nothing is cached between invocations.

pub mod provider;

use tracing::{debug, warn};

use crate::common::AppResult;
use crate::config::{Credentials, Endpoints};
use crate::google::GoogleClient;
use provider::google::GoogleProvider;
use provider::OAuthProvider;

/// Exchange the refresh token and build an authorized client.
pub async fn connect(credentials: &Credentials, endpoints: Endpoints) -> AppResult<GoogleClient> {
    let provider = GoogleProvider::new(
        credentials.client_id.clone(),
        credentials.client_secret.clone(),
        endpoints.token_url.clone(),
    );

    let tokens = provider.refresh_token(&credentials.refresh_token).await?;
    debug!(
        provider = provider.name(),
        expiry = %tokens.expiry,
        "Obtained access token"
    );

    if !tokens.scopes.is_empty() {
        for scope in provider.default_scopes() {
            if !tokens.scopes.contains(&scope) && !covers(&tokens.scopes, &scope) {
                warn!("Access token lacks scope {}", scope);
            }
        }
    }

    GoogleClient::new(tokens.access_token, endpoints)
}

/// Credentials from the environment (or credential file), endpoints from the environment.
pub async fn connect_from_env() -> AppResult<GoogleClient> {
    let credentials = Credentials::load()?;
    connect(&credentials, Endpoints::from_env()).await
}

/// A read-only scope is covered by its read-write counterpart.
fn covers(granted: &[String], wanted: &str) -> bool {
    wanted
        .strip_suffix(".readonly")
        .map(|broader| granted.iter().any(|g| g == broader))
        .unwrap_or(false)
}
