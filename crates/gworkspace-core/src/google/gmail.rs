//! Gmail API v1 Client
//!
//! Read-only access:
//! - List/search messages and threads
//! - Get message details
//! - List labels

use serde_json::Value;
use tracing::{debug, info};

use super::client::GoogleClient;
use super::common::{extract_array, segment};
use crate::backend::{MailBackend, MessageFormat};
use crate::common::AppResult;

/// Headers requested for metadata-format fetches
const METADATA_HEADERS: [&str; 4] = ["From", "To", "Subject", "Date"];

pub struct GmailApi {
    client: GoogleClient,
}

super::google_api_wrapper!(GmailApi);

impl GmailApi {
    fn url(&self, path: &str) -> String {
        format!("{}/users/me/{}", self.client.endpoints().gmail, path)
    }
}

fn search_query(query: &str) -> Vec<(&'static str, String)> {
    if query.is_empty() {
        Vec::new()
    } else {
        vec![("q", query.to_string())]
    }
}

fn metadata_query(format: MessageFormat) -> Vec<(&'static str, String)> {
    let mut query = vec![("format", format.as_str().to_string())];
    if format == MessageFormat::Metadata {
        query.extend(METADATA_HEADERS.iter().map(|h| ("metadataHeaders", h.to_string())));
    }
    query
}

impl MailBackend for GmailApi {
    async fn list_messages(&self, query: &str, max_results: usize) -> AppResult<Vec<Value>> {
        info!("Listing Gmail messages");

        let messages = self
            .client
            .get_paginated(
                &self.url("messages"),
                &search_query(query),
                "messages",
                "maxResults",
                max_results,
            )
            .await?;

        debug!("Retrieved {} message references", messages.len());
        Ok(messages)
    }

    async fn get_message(&self, id: &str, format: MessageFormat) -> AppResult<Value> {
        info!("Fetching Gmail message: {}", id);

        let url = self.url(&format!("messages/{}", segment(id)));
        self.client.get(&url, &metadata_query(format)).await
    }

    async fn list_threads(&self, query: &str, max_results: usize) -> AppResult<Vec<Value>> {
        info!("Listing Gmail threads");

        let threads = self
            .client
            .get_paginated(
                &self.url("threads"),
                &search_query(query),
                "threads",
                "maxResults",
                max_results,
            )
            .await?;

        debug!("Retrieved {} thread references", threads.len());
        Ok(threads)
    }

    async fn get_thread(&self, id: &str) -> AppResult<Value> {
        info!("Fetching Gmail thread: {}", id);

        let url = self.url(&format!("threads/{}", segment(id)));
        self.client
            .get(&url, &metadata_query(MessageFormat::Metadata))
            .await
    }

    async fn list_labels(&self) -> AppResult<Vec<Value>> {
        info!("Listing Gmail labels");

        let response = self.client.get(&self.url("labels"), &[]).await?;
        let labels = extract_array(&response, "labels");

        debug!("Retrieved {} labels", labels.len());
        Ok(labels)
    }
}
