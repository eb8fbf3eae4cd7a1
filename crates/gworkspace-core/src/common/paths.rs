//! Path Utilities
//!
//! Resolution of the gworkspace configuration directory (`~/.gworkspace/`).

use std::path::PathBuf;

use super::error::AppError;

/// Get the gworkspace base directory (`~/.gworkspace/`)
pub fn gworkspace_dir() -> Result<PathBuf, AppError> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".gworkspace"))
}

/// Default location of the Google OAuth credential file
pub fn credentials_path() -> Result<PathBuf, AppError> {
    Ok(gworkspace_dir()?.join("google_oauth.json"))
}
