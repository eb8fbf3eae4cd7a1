//! Google Sheets API v4 Client
//!
//! Spreadsheet metadata and cell values, read-only.

use serde_json::Value;
use tracing::info;

use super::client::GoogleClient;
use super::common::segment;
use crate::common::AppResult;

const SPREADSHEET_FIELDS: &str = "spreadsheetId,properties(title,locale,timeZone),\
sheets(properties(sheetId,title,index,gridProperties(rowCount,columnCount)))";

pub struct SheetsApi {
    client: GoogleClient,
}

super::google_api_wrapper!(SheetsApi);

impl SheetsApi {
    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.client.endpoints().sheets,
            segment(spreadsheet_id)
        )
    }

    /// Spreadsheet title, locale and sheet properties (no cell data)
    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> AppResult<Value> {
        info!("Fetching spreadsheet: {}", spreadsheet_id);

        self.client
            .get(
                &self.spreadsheet_url(spreadsheet_id),
                &[("fields", SPREADSHEET_FIELDS.to_string())],
            )
            .await
    }

    /// Row-major formatted values of an A1 range
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> AppResult<Value> {
        info!("Reading range {} of spreadsheet: {}", range, spreadsheet_id);

        let url = format!(
            "{}/values/{}",
            self.spreadsheet_url(spreadsheet_id),
            segment(range)
        );
        self.client
            .get(&url, &[("majorDimension", "ROWS".to_string())])
            .await
    }
}
