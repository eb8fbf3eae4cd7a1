//! Common Utilities
//!
//! Error handling, HTTP client construction and path resolution shared by
//! every module.

pub mod error;
pub mod http;
pub mod paths;
pub mod result;

pub use error::AppError;
pub use http::create_http_client;
pub use result::AppResult;
