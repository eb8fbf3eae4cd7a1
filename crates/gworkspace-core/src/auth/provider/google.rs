//! Google OAuth2 Provider
//!
//! Refresh-token grant against Google's token endpoint. The consent flow that
//! produces the refresh token happens elsewhere.

use std::collections::HashMap;
use tracing::{error, info};

use super::{OAuthProvider, OAuthTokens};
use crate::common::{create_http_client, AppError, AppResult};

/// Google OAuth2 provider.
pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    token_url: String,
}

impl GoogleProvider {
    pub fn new(client_id: String, client_secret: String, token_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            token_url,
        }
    }
}

impl OAuthProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn refresh_token(&self, refresh_token: &str) -> AppResult<OAuthTokens> {
        info!("Refreshing access token");

        let mut params = HashMap::new();
        params.insert("client_id", self.client_id.as_str());
        params.insert("client_secret", self.client_secret.as_str());
        params.insert("refresh_token", refresh_token);
        params.insert("grant_type", "refresh_token");

        let body = post_form(&self.token_url, &params).await?;
        parse_token_response(&body)
    }

    fn default_scopes(&self) -> Vec<String> {
        vec![
            "https://www.googleapis.com/auth/gmail.readonly".to_string(),
            "https://www.googleapis.com/auth/calendar".to_string(),
            "https://www.googleapis.com/auth/drive.readonly".to_string(),
            "https://www.googleapis.com/auth/spreadsheets.readonly".to_string(),
        ]
    }
}

// ── HTTP utilities ──────────────────────────────────────────────────────────

/// POST a form-encoded request and return the response body.
///
/// Secrets travel in the request body, never in the URL.
async fn post_form(url: &str, params: &HashMap<&str, &str>) -> AppResult<String> {
    let client = create_http_client()?;

    let response = client
        .post(url)
        .form(params)
        .send()
        .await
        .map_err(|e| AppError::Transport(format!("Token request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Transport(format!("Failed to read token response: {}", e)))?;

    if !status.is_success() {
        error!("Token endpoint returned HTTP {}", status);
        let message = match parse_token_response(&body) {
            Err(AppError::Remote { message, .. }) => message,
            _ => format!("HTTP {} error", status),
        };
        return Err(AppError::remote(status.as_u16(), message));
    }

    Ok(body)
}

/// Parse a Google OAuth2 token response.
fn parse_token_response(body: &str) -> AppResult<OAuthTokens> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AppError::Transport(format!("Invalid JSON token response: {}", e)))?;

    if let Some(err) = parsed.get("error").and_then(|v| v.as_str()) {
        let desc = parsed
            .get("error_description")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error");
        return Err(AppError::remote(400, format!("{}: {}", err, desc)));
    }

    let access_token = parsed
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::Transport("Missing access_token in token response".to_string()))?
        .to_string();

    let token_type = parsed
        .get("token_type")
        .and_then(|v| v.as_str())
        .unwrap_or("Bearer")
        .to_string();

    let expires_in = parsed
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);

    let expiry = chrono::Utc::now() + chrono::Duration::seconds(expires_in);

    let scopes = parsed
        .get("scope")
        .and_then(|v| v.as_str())
        .map(|s| s.split(' ').map(String::from).collect())
        .unwrap_or_default();

    Ok(OAuthTokens {
        access_token,
        token_type,
        expiry,
        scopes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_token_response_success() {
        let body = r#"{
            "access_token": "ya29.test",
            "token_type": "Bearer",
            "expires_in": 3599,
            "scope": "https://www.googleapis.com/auth/gmail.readonly https://www.googleapis.com/auth/calendar"
        }"#;

        let tokens = parse_token_response(body).unwrap();
        assert_eq!(tokens.access_token, "ya29.test");
        assert_eq!(tokens.scopes.len(), 2);
        assert!(tokens.expiry > chrono::Utc::now());
    }

    #[test]
    fn test_parse_token_response_error() {
        let body = r#"{"error": "invalid_grant", "error_description": "Token has been expired or revoked."}"#;
        let err = parse_token_response(body).unwrap_err();
        assert!(err.to_string().contains("invalid_grant"));
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let tokens = parse_token_response(r#"{"access_token": "ya29.secret"}"#).unwrap();
        assert!(!format!("{:?}", tokens).contains("ya29.secret"));
    }

    #[tokio::test]
    async fn test_refresh_posts_refresh_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=1%2F%2Frefresh"))
            .and(body_string_contains("client_id=cid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.fresh",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GoogleProvider::new(
            "cid".into(),
            "secret".into(),
            format!("{}/token", server.uri()),
        );
        let tokens = provider.refresh_token("1//refresh").await.unwrap();
        assert_eq!(tokens.access_token, "ya29.fresh");
    }

    #[tokio::test]
    async fn test_refresh_rejected_grant_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Bad Request"
            })))
            .mount(&server)
            .await;

        let provider = GoogleProvider::new(
            "cid".into(),
            "secret".into(),
            format!("{}/token", server.uri()),
        );
        let err = provider.refresh_token("stale").await.unwrap_err();
        assert!(matches!(err, AppError::Remote { status: 400, .. }));
        assert!(err.to_string().contains("invalid_grant: Bad Request"));
    }
}
