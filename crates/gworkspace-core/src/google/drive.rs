//! Google Drive API v3 Client
//!
//! File listing and search only.

use serde_json::Value;
use tracing::{debug, info};

use super::client::GoogleClient;
use crate::common::AppResult;

/// Only the fields the file projection reads
const FILE_FIELDS: &str =
    "nextPageToken,files(id,name,mimeType,modifiedTime,webViewLink,owners(emailAddress))";

pub struct DriveApi {
    client: GoogleClient,
}

super::google_api_wrapper!(DriveApi);

impl DriveApi {
    /// List files matching a Drive query expression, most recently modified first
    pub async fn list_files(&self, query: &str, max_results: usize) -> AppResult<Vec<Value>> {
        info!("Listing Drive files");

        let mut params = vec![
            ("orderBy", "modifiedTime desc".to_string()),
            ("fields", FILE_FIELDS.to_string()),
        ];
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }

        let url = format!("{}/files", self.client.endpoints().drive);
        let files = self
            .client
            .get_paginated(&url, &params, "files", "pageSize", max_results)
            .await?;

        debug!("Retrieved {} files", files.len());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_files_sends_query_order_and_page_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", "trashed = false"))
            .and(query_param("orderBy", "modifiedTime desc"))
            .and(query_param("pageSize", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "f1"}, {"id": "f2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let drive: DriveApi = GoogleClient::new("t".into(), Endpoints::with_root(&server.uri()))
            .unwrap()
            .into();
        let files = drive.list_files("trashed = false", 2).await.unwrap();
        assert_eq!(files.len(), 2);
    }
}
