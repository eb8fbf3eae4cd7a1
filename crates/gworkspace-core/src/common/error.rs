//! Common Error Types
//!
//! One variant per failure category. Every variant is fatal for the
//! invocation; nothing is retried.

use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing credential or unreadable credential file
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown command or bad/missing argument; carries the rendered usage text
    #[error("{0}")]
    Usage(String),

    /// Malformed or unreadable JSON payload
    #[error("invalid payload: {0}")]
    Input(String),

    /// The remote service answered with a non-success status
    #[error("Google API error {status}: {message}")]
    Remote { status: u16, message: String },

    /// The request never produced a usable response
    #[error("request failed: {0}")]
    Transport(String),

    /// One of several concurrent detail fetches failed
    #[error("fetching '{item}' failed: {source}")]
    Aggregation {
        item: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn missing_credential(name: &str) -> Self {
        Self::Config(format!(
            "missing credential {}: set the environment variable or add it to the credential file",
            name
        ))
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn aggregation(item: impl Into<String>, source: AppError) -> Self {
        Self::Aggregation {
            item: item.into(),
            source: Box::new(source),
        }
    }

    /// Short category name used in logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Usage(_) => "usage",
            Self::Input(_) => "input",
            Self::Remote { .. } | Self::Transport(_) => "remote",
            Self::Aggregation { .. } => "aggregation",
            Self::Serialization(_) => "internal",
        }
    }

    /// Remediation hint for remote failures whose cause is recognizable
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Remote { status, message } => remote_hint(*status, message),
            Self::Aggregation { source, .. } => source.hint(),
            _ => None,
        }
    }
}

fn remote_hint(status: u16, message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();

    if lower.contains("invalid_grant") || status == 401 {
        return Some(
            "The refresh token was rejected or has expired. Generate a new refresh token and update GOOGLE_REFRESH_TOKEN.",
        );
    }

    match status {
        403 if lower.contains("insufficient") => Some(
            "The refresh token was granted without the scope this command needs. Re-authorize with the Gmail, Calendar, Drive and Sheets scopes.",
        ),
        403 if lower.contains("has not been used") || lower.contains("is disabled") => {
            Some("Enable the API for your project in the Google Cloud Console, then retry.")
        }
        404 => Some("The requested resource was not found. Check the id and the calendar."),
        429 => Some("Google is rate limiting this project. Wait a moment before running the command again."),
        _ => None,
    }
}
