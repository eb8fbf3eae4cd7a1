//! Google API Client Module
//!
//! Authenticated HTTP access to Gmail, Calendar, Drive and Sheets, and the
//! [`crate::backend`] implementations built on it.

pub mod calendar_api;
pub mod client;
pub mod common;
pub mod drive;
pub mod gmail;
pub mod sheets;

use serde_json::Value;

pub use calendar_api::CalendarApi;
pub use client::GoogleClient;
pub use drive::DriveApi;
pub use gmail::GmailApi;
pub use sheets::SheetsApi;

use crate::backend::FileStoreBackend;
use crate::common::AppResult;

/// Implements the standard wrapper constructor: every API struct wraps a
/// `GoogleClient` and is built from one.
macro_rules! google_api_wrapper {
    ($name:ident) => {
        impl From<crate::google::client::GoogleClient> for $name {
            fn from(client: crate::google::client::GoogleClient) -> Self {
                Self { client }
            }
        }
    };
}

pub(crate) use google_api_wrapper;

/// The file-store domain: Drive for listing, Sheets for cell data
pub struct FileStore {
    drive: DriveApi,
    sheets: SheetsApi,
}

impl From<GoogleClient> for FileStore {
    fn from(client: GoogleClient) -> Self {
        Self {
            drive: client.clone().into(),
            sheets: client.into(),
        }
    }
}

impl FileStoreBackend for FileStore {
    async fn list_files(&self, query: &str, max_results: usize) -> AppResult<Vec<Value>> {
        self.drive.list_files(query, max_results).await
    }

    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> AppResult<Value> {
        self.sheets.get_spreadsheet(spreadsheet_id).await
    }

    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> AppResult<Value> {
        self.sheets.get_values(spreadsheet_id, range).await
    }
}
