//! OAuth Provider Abstraction
//!
//! Trait-based provider system; Google is the only implementation.

pub mod google;

use chrono::{DateTime, Utc};

use crate::common::AppResult;

/// Tokens returned from an OAuth token refresh.
#[derive(Clone)]
pub struct OAuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expiry: DateTime<Utc>,
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expiry", &self.expiry)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// OAuth provider trait.
#[allow(async_fn_in_trait)]
pub trait OAuthProvider {
    /// Provider name (e.g. "google")
    fn name(&self) -> &str;

    /// Mint a short-lived access token from a long-lived refresh token.
    async fn refresh_token(&self, refresh_token: &str) -> AppResult<OAuthTokens>;

    /// Scopes the helpers expect the refresh token to carry.
    fn default_scopes(&self) -> Vec<String>;
}
