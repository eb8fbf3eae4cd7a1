//! JSON payload arguments for calendar writes.
//!
//! `-` reads standard input, an argument starting with `{` is inline JSON,
//! anything else names a file. The payload must be a JSON object.
//! Sources are resolved into `Parsed` before any remote call is made.

use std::convert::Infallible;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;

use crate::common::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Stdin,
    Inline(String),
    File(PathBuf),
    Parsed(Value),
}

impl FromStr for PayloadSource {
    type Err = Infallible;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        Ok(if arg == "-" {
            Self::Stdin
        } else if arg.trim_start().starts_with('{') {
            Self::Inline(arg.to_string())
        } else {
            Self::File(PathBuf::from(arg))
        })
    }
}

impl PayloadSource {
    pub fn load(&self) -> AppResult<Value> {
        match self {
            Self::Parsed(value) => Ok(value.clone()),
            Self::Stdin => Self::load_from(std::io::stdin().lock(), "standard input"),
            Self::Inline(text) => parse_object(text, "inline payload"),
            Self::File(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    AppError::Input(format!("cannot read {}: {}", path.display(), e))
                })?;
                parse_object(&text, &path.display().to_string())
            }
        }
    }

    /// Read and validate the payload once, keeping the parsed object.
    pub fn resolve(self) -> AppResult<Self> {
        match self {
            Self::Parsed(_) => Ok(self),
            source => source.load().map(Self::Parsed),
        }
    }

    pub fn load_from(mut reader: impl Read, origin: &str) -> AppResult<Value> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| AppError::Input(format!("cannot read {}: {}", origin, e)))?;
        parse_object(&text, origin)
    }
}

fn parse_object(text: &str, origin: &str) -> AppResult<Value> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AppError::Input(format!("{} is not valid JSON: {}", origin, e)))?;

    if !value.is_object() {
        return Err(AppError::Input(format!("{} must be a JSON object", origin)));
    }
    Ok(value)
}
