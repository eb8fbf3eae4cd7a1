//! Common Result Type

use super::error::AppError;

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
