//! Google API Authenticated HTTP Client
//!
//! Injects the OAuth access token into every request, maps Google's error
//! envelope onto [`AppError::Remote`] and follows `nextPageToken` until the
//! requested number of items is collected.
//!
//! Only GET, POST and PATCH are available. There is no DELETE verb.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::common::{create_http_client, AppError, AppResult};
use crate::config::Endpoints;

/// Google API HTTP client with OAuth token injection
#[derive(Clone)]
pub struct GoogleClient {
    client: Client,
    access_token: String,
    endpoints: Endpoints,
}

impl GoogleClient {
    /// Create a new Google API client with an OAuth access token
    pub fn new(access_token: String, endpoints: Endpoints) -> AppResult<Self> {
        Ok(Self {
            client: create_http_client()?,
            access_token,
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Make an authenticated GET request
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> AppResult<Value> {
        let builder = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token);

        self.execute_request(builder).await
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post(&self, url: &str, query: &[(&str, String)], body: &Value) -> AppResult<Value> {
        let builder = self
            .client
            .post(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .json(body);

        self.execute_request(builder).await
    }

    /// Make an authenticated PATCH request with JSON body
    pub async fn patch(&self, url: &str, body: &Value) -> AppResult<Value> {
        let builder = self
            .client
            .patch(url)
            .bearer_auth(&self.access_token)
            .json(body);

        self.execute_request(builder).await
    }

    /// Execute a request and handle Google API response patterns
    async fn execute_request(&self, builder: RequestBuilder) -> AppResult<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by Google API");
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read response body: {}", e)))?;

        if status.is_success() && body.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        if !status.is_success() {
            let parsed = serde_json::from_str::<Value>(&body).unwrap_or(Value::Null);
            let message = extract_error_message(&parsed, status);
            error!("Google API error {}: {}", status.as_u16(), message);
            return Err(AppError::remote(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::Transport(format!("Failed to parse JSON response: {} (body: {})", e, body))
        })
    }

    /// Handle paginated list requests with nextPageToken
    ///
    /// `items_field` names the array in each page ("messages", "items",
    /// "files", ...) and `page_size_param` the API's page size parameter.
    pub async fn get_paginated(
        &self,
        url: &str,
        base_query: &[(&str, String)],
        items_field: &str,
        page_size_param: &str,
        max_results: usize,
    ) -> AppResult<Vec<Value>> {
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        while all_items.len() < max_results {
            let mut query = base_query.to_vec();
            if let Some(ref token) = page_token {
                query.push(("pageToken", token.clone()));
            }
            query.push((page_size_param, (max_results - all_items.len()).to_string()));

            let response = self.get(url, &query).await?;

            let page = response
                .get(items_field)
                .and_then(|v| v.as_array())
                .map(Vec::as_slice)
                .unwrap_or_default();
            if page.is_empty() {
                break;
            }
            all_items.extend(page.iter().cloned());

            match response.get("nextPageToken").and_then(|v| v.as_str()) {
                Some(next_token) => page_token = Some(next_token.to_string()),
                None => break,
            }
        }

        all_items.truncate(max_results);
        Ok(all_items)
    }
}

/// Extract error message from Google API error response
///
/// Google APIs return `{"error": {"code": 400, "message": "..."}}`; the token
/// endpoint returns `{"error": "invalid_grant", "error_description": "..."}`.
fn extract_error_message(response: &Value, status: StatusCode) -> String {
    if let Some(error_obj) = response.get("error") {
        if let Some(message) = error_obj.get("message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
        if let Some(code) = error_obj.as_str() {
            let description = response
                .get("error_description")
                .and_then(|v| v.as_str())
                .unwrap_or("no description");
            return format!("{}: {}", code, description);
        }
    }

    format!("HTTP {} error", status)
}
