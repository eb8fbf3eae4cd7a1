//! gworkspace core
//!
//! Capability-scoped access to Gmail, Google Calendar and Drive/Sheets.
//! Commands parse into closed enums, run against backend traits, and print
//! minimal normalized JSON projections of the remote resources.

pub mod auth;
pub mod backend;
pub mod common;
pub mod config;
pub mod dispatch;
pub mod fanout;
pub mod google;
pub mod normalize;
pub mod time_window;

pub use common::{AppError, AppResult};
pub use dispatch::{Capability, Output};
