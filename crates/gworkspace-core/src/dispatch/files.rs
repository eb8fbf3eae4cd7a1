//! File-store domain: `gdrive <command> [args...]`. Spreadsheets only, read-only.

use std::ffi::OsString;
use std::future::Future;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use super::{parse_args, Capability, Invocation, Output, DEFAULT_COUNT, MAX_COUNT};
use crate::backend::FileStoreBackend;
use crate::common::{AppError, AppResult};
use crate::normalize::files::{drive_file, first_sheet_title, sheet_range, spreadsheet_info, DriveFileRef};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Parser)]
#[command(name = "gdrive", version, about = "Find and read Google Sheets spreadsheets")]
pub struct FilesCli {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum FilesCommand {
    /// Recently modified spreadsheets, optionally filtered by name
    Files {
        #[arg(default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_COUNT)))]
        count: u32,
        #[arg(default_value = "")]
        filter: String,
    },
    /// Cell values; the whole first sheet unless a range like `Sheet1!A1:D20` is given
    Read {
        spreadsheet_id: String,
        range: Option<String>,
    },
    /// Title, locale and sheet dimensions
    Info { spreadsheet_id: String },
    /// Spreadsheets whose name or content matches the query
    Search {
        query: String,
        #[arg(default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_COUNT)))]
        count: u32,
    },
}

impl FilesCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Files { .. } => "files",
            Self::Read { .. } => "read",
            Self::Info { .. } => "info",
            Self::Search { .. } => "search",
        }
    }

    pub fn capability(&self) -> Capability {
        Capability::Read
    }
}

pub async fn execute<I, T, B, C, Fut>(args: I, connect: C) -> AppResult<Output>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: FileStoreBackend,
    C: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<B>>,
{
    let command = match parse_args::<FilesCli, _, _>(args)? {
        Invocation::Run(cli) => cli.command,
        Invocation::Help(text) => return Ok(Output::Text(text)),
    };

    info!(command = command.name(), capability = %command.capability(), "Dispatching file-store command");
    let backend = connect().await?;
    dispatch(command, &backend).await
}

pub async fn dispatch<B: FileStoreBackend>(command: FilesCommand, backend: &B) -> AppResult<Output> {
    match command {
        FilesCommand::Files { count, filter } => {
            let files = list(backend, &name_query(&filter), count).await?;
            Output::list(&files, "No spreadsheets found.")
        }
        FilesCommand::Search { query, count } => {
            let files = list(backend, &search_query(&query), count).await?;
            Output::list(&files, format!("No spreadsheets matching '{}'.", query))
        }
        FilesCommand::Info { spreadsheet_id } => {
            let raw = backend.get_spreadsheet(&spreadsheet_id).await?;
            Output::json(&spreadsheet_info(&raw))
        }
        FilesCommand::Read { spreadsheet_id, range: Some(range) } => {
            let values = backend.get_values(&spreadsheet_id, &range).await?;
            Output::json(&sheet_range(&spreadsheet_id, None, &values))
        }
        FilesCommand::Read { spreadsheet_id, range: None } => {
            let metadata = backend.get_spreadsheet(&spreadsheet_id).await?;
            let title = first_sheet_title(&metadata).ok_or_else(|| {
                AppError::remote(404, format!("spreadsheet {} has no sheets", spreadsheet_id))
            })?;
            debug!("Reading whole first sheet: {}", title);

            let values = backend.get_values(&spreadsheet_id, &whole_sheet(&title)).await?;
            Output::json(&sheet_range(&spreadsheet_id, Some(&metadata), &values))
        }
    }
}

async fn list<B: FileStoreBackend>(backend: &B, query: &str, count: u32) -> AppResult<Vec<DriveFileRef>> {
    let raw = backend.list_files(query, count as usize).await?;
    Ok(raw.iter().map(drive_file).collect())
}

fn name_query(filter: &str) -> String {
    let mut query = format!("mimeType='{}' and trashed = false", SPREADSHEET_MIME);
    if !filter.is_empty() {
        query.push_str(&format!(" and name contains '{}'", escape(filter)));
    }
    query
}

fn search_query(text: &str) -> String {
    let text = escape(text);
    format!(
        "mimeType='{}' and trashed = false and (name contains '{}' or fullText contains '{}')",
        SPREADSHEET_MIME, text, text
    )
}

/// Escape a literal for a single-quoted Drive query string.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// A1 reference to a whole sheet: `'Q1 Plan'`, with embedded quotes doubled.
fn whole_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}
