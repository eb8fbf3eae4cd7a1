//! Configuration management
//!
//! Google OAuth credentials come from the environment first and from the
//! credential file (`~/.gworkspace/google_oauth.json`) second. API endpoints
//! default to Google's production hosts and can be redirected for proxies and
//! tests.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::common::paths::credentials_path;
use crate::common::{AppError, AppResult};

pub const CLIENT_ID_VAR: &str = "GOOGLE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "GOOGLE_CLIENT_SECRET";
pub const REFRESH_TOKEN_VAR: &str = "GOOGLE_REFRESH_TOKEN";
pub const CREDENTIALS_FILE_VAR: &str = "GWORKSPACE_CREDENTIALS";
pub const API_ROOT_VAR: &str = "GWORKSPACE_API_ROOT";
pub const TOKEN_URL_VAR: &str = "GWORKSPACE_TOKEN_URL";

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// The three values needed to mint access tokens
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

// Secrets stay out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// On-disk credential file; every field is optional so the environment can fill gaps.
#[derive(Debug, Default, Deserialize)]
struct CredentialFile {
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
}

impl Credentials {
    /// Load credentials from the process environment and the credential file.
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var_os(CREDENTIALS_FILE_VAR).map(PathBuf::from);
        Self::load_with(|name| std::env::var(name).ok(), explicit, credentials_path().ok())
    }

    /// An explicit credential file must be readable. The default file is
    /// skipped when the environment is complete and ignored when unreadable.
    fn load_with(
        env: impl Fn(&str) -> Option<String>,
        explicit: Option<PathBuf>,
        default: Option<PathBuf>,
    ) -> AppResult<Self> {
        let file = match (explicit, default) {
            (Some(path), _) => read_credential_file(&path, true)?,
            (None, _) if env_is_complete(&env) => None,
            (None, Some(path)) => read_credential_file(&path, false).unwrap_or_else(|e| {
                warn!("Ignoring default credential file: {}", e);
                None
            }),
            (None, None) => None,
        };

        Self::resolve(env, file.unwrap_or_default())
    }

    fn resolve(env: impl Fn(&str) -> Option<String>, file: CredentialFile) -> AppResult<Self> {
        let pick = |var: &str, fallback: Option<String>| -> AppResult<String> {
            env(var)
                .filter(|v| !v.trim().is_empty())
                .or(fallback.filter(|v| !v.trim().is_empty()))
                .ok_or_else(|| AppError::missing_credential(var))
        };

        Ok(Self {
            client_id: pick(CLIENT_ID_VAR, file.client_id)?,
            client_secret: pick(CLIENT_SECRET_VAR, file.client_secret)?,
            refresh_token: pick(REFRESH_TOKEN_VAR, file.refresh_token)?,
        })
    }
}

fn env_is_complete(env: &impl Fn(&str) -> Option<String>) -> bool {
    [CLIENT_ID_VAR, CLIENT_SECRET_VAR, REFRESH_TOKEN_VAR]
        .iter()
        .all(|var| env(var).is_some_and(|v| !v.trim().is_empty()))
}

fn read_credential_file(path: &Path, required: bool) -> AppResult<Option<CredentialFile>> {
    if !path.exists() {
        if required {
            return Err(AppError::Config(format!(
                "credential file {} does not exist",
                path.display()
            )));
        }
        return Ok(None);
    }

    debug!("Reading credential file {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;
    let parsed = serde_json::from_str(&content).map_err(|e| {
        AppError::Config(format!("failed to parse {}: {}", path.display(), e))
    })?;
    Ok(Some(parsed))
}

/// Base URLs of every remote endpoint the helpers talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token_url: String,
    pub gmail: String,
    pub calendar: String,
    pub drive: String,
    pub sheets: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: TOKEN_ENDPOINT.to_string(),
            gmail: GMAIL_API_BASE.to_string(),
            calendar: CALENDAR_API_BASE.to_string(),
            drive: DRIVE_API_BASE.to_string(),
            sheets: SHEETS_API_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// Route every API through one root, keeping Google's path prefixes.
    pub fn with_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            token_url: format!("{}/token", root),
            gmail: format!("{}/gmail/v1", root),
            calendar: format!("{}/calendar/v3", root),
            drive: format!("{}/drive/v3", root),
            sheets: format!("{}/v4", root),
        }
    }

    /// Defaults, adjusted by `GWORKSPACE_API_ROOT` and `GWORKSPACE_TOKEN_URL`.
    pub fn from_env() -> Self {
        let mut endpoints = match std::env::var(API_ROOT_VAR) {
            Ok(root) if !root.is_empty() => Self::with_root(&root),
            _ => Self::default(),
        };
        if let Ok(token_url) = std::env::var(TOKEN_URL_VAR) {
            if !token_url.is_empty() {
                endpoints.token_url = token_url;
            }
        }
        endpoints
    }
}
