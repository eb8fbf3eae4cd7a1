//! Command Dispatcher
//!
//! Each domain owns a closed clap command enum, a `dispatch` that maps one
//! parsed command onto backend calls plus normalization, and an `execute`
//! that parses arguments before ever touching the network. The `connect`
//! capability is invoked only once a command has parsed.
//!
//! The command enums are the whole surface: reads everywhere, a handful of
//! calendar writes, no deletes.

pub mod calendar;
pub mod files;
pub mod mail;
pub mod payload;

use std::ffi::OsString;
use std::fmt;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use serde::Serialize;
use serde_json::Value;

use crate::common::{AppError, AppResult};

/// Default item count for listing commands
pub const DEFAULT_COUNT: u32 = 10;

/// Upper bound accepted for a count argument
pub const MAX_COUNT: u32 = 500;

/// What a command prints on success
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(Value),
    Text(String),
}

impl Output {
    pub fn json<T: Serialize>(value: &T) -> AppResult<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A list projection, or `empty` when there is nothing to show.
    pub fn list<T: Serialize>(items: &[T], empty: impl Into<String>) -> AppResult<Self> {
        if items.is_empty() {
            Ok(Self::text(empty))
        } else {
            Self::json(&items)
        }
    }

    /// Pretty-printed JSON or the plain line
    pub fn render(&self) -> AppResult<String> {
        match self {
            Self::Json(value) => Ok(serde_json::to_string_pretty(value)?),
            Self::Text(text) => Ok(text.trim_end().to_string()),
        }
    }
}

/// Capability class of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    Write,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Outcome of argument parsing
#[derive(Debug)]
pub enum Invocation<C> {
    Run(C),
    /// `--help` or `--version` text; nothing to dispatch
    Help(String),
}

/// Parse a full argv (program name first) into a domain command line.
///
/// Unknown or missing commands produce the domain's full command listing;
/// other argument problems produce clap's operation-specific usage.
pub fn parse_args<P, I, T>(args: I) -> AppResult<Invocation<P>>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let err = match P::try_parse_from(args) {
        Ok(cli) => return Ok(Invocation::Run(cli)),
        Err(err) => err,
    };

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            Ok(Invocation::Help(err.render().to_string()))
        }
        ErrorKind::InvalidSubcommand
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let rendered = err.render().to_string();
            let headline = rendered
                .lines()
                .find(|line| line.starts_with("error:"))
                .unwrap_or("error: a command is required");
            let listing = P::command().render_help();
            Err(AppError::Usage(format!("{}\n\n{}", headline, listing)))
        }
        _ => Err(AppError::Usage(err.render().to_string())),
    }
}
