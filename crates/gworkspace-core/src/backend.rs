//! Remote capabilities the dispatcher depends on.
//!
//! One trait per domain. The traits are the whole remote surface: there is no
//! delete method anywhere, so no command can remove remote state. Google
//! implementations live in [`crate::google`]; tests substitute recording fakes.

use serde_json::Value;

use crate::common::AppResult;

/// How much of a message to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Headers (From, To, Subject, Date) and snippet only
    Metadata,
    /// Headers plus the full MIME tree with bodies
    Full,
}

impl MessageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Full => "full",
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait MailBackend {
    /// Message references (`id`, `threadId`) matching `query`, newest first.
    async fn list_messages(&self, query: &str, max_results: usize) -> AppResult<Vec<Value>>;

    async fn get_message(&self, id: &str, format: MessageFormat) -> AppResult<Value>;

    /// Thread references (`id`, `snippet`) matching `query`.
    async fn list_threads(&self, query: &str, max_results: usize) -> AppResult<Vec<Value>>;

    /// Thread with message metadata.
    async fn get_thread(&self, id: &str) -> AppResult<Value>;

    async fn list_labels(&self) -> AppResult<Vec<Value>>;
}

/// Event listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// RFC 3339 lower bound on event end
    pub time_min: Option<String>,
    /// RFC 3339 upper bound on event start
    pub time_max: Option<String>,
    /// Free-text search
    pub text: Option<String>,
    pub max_results: usize,
}

#[allow(async_fn_in_trait)]
pub trait CalendarBackend {
    /// Single events ordered by start time.
    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> AppResult<Vec<Value>>;

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> AppResult<Value>;

    async fn insert_event(&self, calendar_id: &str, event: &Value) -> AppResult<Value>;

    /// Create an event from a free-text description ("Lunch with Ana tomorrow 1pm").
    async fn quick_add(&self, calendar_id: &str, text: &str) -> AppResult<Value>;

    /// Merge-patch: only the fields present in `patch` change.
    async fn patch_event(&self, calendar_id: &str, event_id: &str, patch: &Value) -> AppResult<Value>;

    async fn list_calendars(&self) -> AppResult<Vec<Value>>;
}

#[allow(async_fn_in_trait)]
pub trait FileStoreBackend {
    /// Files matching a Drive `q` expression, most recently modified first.
    async fn list_files(&self, query: &str, max_results: usize) -> AppResult<Vec<Value>>;

    /// Spreadsheet metadata: title, locale, sheet properties.
    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> AppResult<Value>;

    /// Cell values of an A1 range.
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> AppResult<Value>;
}
