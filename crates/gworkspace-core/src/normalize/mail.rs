//! Gmail projections: message summaries, full messages, threads and labels.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;

use super::{first_text, items, string_list, text};

/// Longest rich-text body rendering, in characters
pub const HTML_BODY_LIMIT: usize = 2000;

/// Prefix marking a body rendered from the HTML part
pub const HTML_TAG: &str = "[HTML] ";

/// Gmail emits base64url, sometimes padded and sometimes not
const GMAIL_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub id: String,
    pub thread_id: String,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFull {
    pub id: String,
    pub thread_id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: String,
    pub labels: Vec<String>,
    pub snippet: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub thread_id: String,
    pub message_count: usize,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub label_type: String,
}

pub fn message_summary(raw: &Value) -> MessageSummary {
    MessageSummary {
        id: text(raw, "id"),
        thread_id: text(raw, "threadId"),
        from: header_or_field(raw, "From", "from"),
        subject: header_or_field(raw, "Subject", "subject"),
        date: header_or_field(raw, "Date", "date"),
        snippet: text(raw, "snippet"),
    }
}

pub fn message_full(raw: &Value) -> MessageFull {
    let labels = if raw.get("labelIds").is_some() {
        string_list(raw, "labelIds")
    } else {
        string_list(raw, "labels")
    };

    let body = match raw.get("payload") {
        Some(payload) => message_body(payload),
        None => text(raw, "body"),
    };

    MessageFull {
        id: text(raw, "id"),
        thread_id: text(raw, "threadId"),
        from: header_or_field(raw, "From", "from"),
        to: header_or_field(raw, "To", "to"),
        subject: header_or_field(raw, "Subject", "subject"),
        date: header_or_field(raw, "Date", "date"),
        labels,
        snippet: text(raw, "snippet"),
        body,
    }
}

/// Summarize a thread by its first message.
pub fn thread_summary(raw: &Value) -> ThreadSummary {
    let messages = items(raw, "messages");
    let first = messages.first().unwrap_or(raw);

    let message_count = if raw.get("messages").is_some() {
        messages.len()
    } else {
        raw.get("messageCount")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or_default()
    };

    ThreadSummary {
        thread_id: first_text(raw, &["threadId", "id"]),
        message_count,
        from: header_or_field(first, "From", "from"),
        subject: header_or_field(first, "Subject", "subject"),
        date: header_or_field(first, "Date", "date"),
        snippet: first_text(first, &["snippet"]),
    }
}

pub fn label(raw: &Value) -> LabelRef {
    LabelRef {
        id: text(raw, "id"),
        name: text(raw, "name"),
        label_type: text(raw, "type"),
    }
}

/// Header value from `payload.headers` (case-insensitive), else the flat field.
fn header_or_field(raw: &Value, header: &str, field: &str) -> String {
    let from_headers = raw
        .get("payload")
        .map(|payload| items(payload, "headers"))
        .unwrap_or_default()
        .iter()
        .find(|h| {
            h.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.eq_ignore_ascii_case(header))
        })
        .and_then(|h| h.get("value").and_then(Value::as_str));

    match from_headers {
        Some(value) => value.to_string(),
        None => text(raw, field),
    }
}

/// Text of a message: the plain-text part if any, else the HTML part truncated and tagged.
pub fn message_body(payload: &Value) -> String {
    if let Some(plain) = find_part(payload, "text/plain").and_then(decode_part) {
        return plain;
    }

    if let Some(html) = find_part(payload, "text/html").and_then(decode_part) {
        let truncated: String = html.chars().take(HTML_BODY_LIMIT).collect();
        return format!("{}{}", HTML_TAG, truncated);
    }

    String::new()
}

/// Depth-first search for the first part of `mime_type` that carries data.
fn find_part<'a>(part: &'a Value, mime_type: &str) -> Option<&'a Value> {
    let is_match = part
        .get("mimeType")
        .and_then(Value::as_str)
        .is_some_and(|m| m.eq_ignore_ascii_case(mime_type));
    let has_data = part
        .get("body")
        .and_then(|b| b.get("data"))
        .and_then(Value::as_str)
        .is_some();

    if is_match && has_data {
        return Some(part);
    }

    items(part, "parts")
        .iter()
        .find_map(|child| find_part(child, mime_type))
}

fn decode_part(part: &Value) -> Option<String> {
    let data = part.get("body")?.get("data")?.as_str()?;
    let bytes = GMAIL_BASE64.decode(data.trim()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
