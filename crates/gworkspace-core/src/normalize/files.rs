//! File-store projections: Drive files, spreadsheet metadata and value ranges.

use serde::Serialize;
use serde_json::Value;

use super::{first_text, items, string_list, text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileRef {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub modified_time: String,
    pub link: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub sheet_id: u64,
    pub title: String,
    pub index: u64,
    pub row_count: u64,
    pub column_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetInfo {
    pub spreadsheet_id: String,
    pub title: String,
    pub locale: String,
    pub time_zone: String,
    pub sheets: Vec<SheetProperties>,
}

/// Cell values of one range. `title` and `sheets` are only known when the
/// spreadsheet metadata was fetched alongside the values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRange {
    pub spreadsheet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub sheet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<String>>,
    pub range: String,
    pub values: Vec<Vec<Value>>,
}

pub fn drive_file(raw: &Value) -> DriveFileRef {
    let owner = items(raw, "owners")
        .first()
        .and_then(|o| o.get("emailAddress"))
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| text(raw, "owner"));

    DriveFileRef {
        id: text(raw, "id"),
        name: text(raw, "name"),
        mime_type: text(raw, "mimeType"),
        modified_time: text(raw, "modifiedTime"),
        link: first_text(raw, &["webViewLink", "link"]),
        owner,
    }
}

pub fn spreadsheet_info(raw: &Value) -> SpreadsheetInfo {
    let mut sheets: Vec<SheetProperties> = items(raw, "sheets").iter().map(sheet_properties).collect();
    sheets.sort_by_key(|s| s.index);

    SpreadsheetInfo {
        spreadsheet_id: text(raw, "spreadsheetId"),
        title: property(raw, "title"),
        locale: property(raw, "locale"),
        time_zone: property(raw, "timeZone"),
        sheets,
    }
}

/// Project a value range, enriched with spreadsheet metadata when available.
pub fn sheet_range(spreadsheet_id: &str, metadata: Option<&Value>, values: &Value) -> SheetRange {
    let range = text(values, "range");

    let sheet = match values.get("sheet").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => sheet_of_range(&range),
    };

    let (title, sheets) = match metadata {
        Some(meta) => {
            let info = spreadsheet_info(meta);
            (
                Some(info.title),
                Some(info.sheets.into_iter().map(|s| s.title).collect()),
            )
        }
        None => (
            values.get("title").and_then(Value::as_str).map(String::from),
            values.get("sheets").map(|_| string_list(values, "sheets")),
        ),
    };

    let rows = items(values, "values")
        .iter()
        .map(|row| row.as_array().cloned().unwrap_or_default())
        .collect();

    SheetRange {
        spreadsheet_id: spreadsheet_id.to_string(),
        title,
        sheet,
        sheets,
        range,
        values: rows,
    }
}

/// Title of the sheet with the lowest declared index.
pub fn first_sheet_title(metadata: &Value) -> Option<String> {
    items(metadata, "sheets")
        .iter()
        .map(sheet_properties)
        .min_by_key(|s| s.index)
        .map(|s| s.title)
}

/// `'Q1 Plan'!A1:B2` → `Q1 Plan`; a range without a sheet prefix names no sheet.
fn sheet_of_range(range: &str) -> String {
    match range.rsplit_once('!') {
        Some((sheet, _)) => {
            let unquoted = sheet
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .map(|s| s.replace("''", "'"));
            unquoted.unwrap_or_else(|| sheet.to_string())
        }
        None => String::new(),
    }
}

fn sheet_properties(raw: &Value) -> SheetProperties {
    let props = raw.get("properties").unwrap_or(raw);
    let grid = props.get("gridProperties").unwrap_or(props);
    let number = |v: &Value, key: &str| v.get(key).and_then(Value::as_u64).unwrap_or_default();

    SheetProperties {
        sheet_id: number(props, "sheetId"),
        title: text(props, "title"),
        index: number(props, "index"),
        row_count: number(grid, "rowCount"),
        column_count: number(grid, "columnCount"),
    }
}

/// Spreadsheet-level property, nested under `properties` in the raw resource.
fn property(raw: &Value, key: &str) -> String {
    raw.get("properties")
        .and_then(|p| p.get(key))
        .or_else(|| raw.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
