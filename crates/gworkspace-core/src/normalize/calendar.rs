//! Calendar projections: events and calendar list entries.

use serde::Serialize;
use serde_json::Value;

use super::{items, text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    pub response_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: String,
    pub end: String,
    pub status: String,
    pub attendees: Vec<Attendee>,
    pub organizer: String,
    pub html_link: String,
    pub hangout_link: String,
    pub recurring_event_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRef {
    pub id: String,
    pub summary: String,
    pub primary: bool,
    pub access_role: String,
    pub time_zone: String,
}

pub fn event(raw: &Value) -> CalendarEvent {
    let attendees = items(raw, "attendees")
        .iter()
        .map(|a| Attendee {
            email: text(a, "email"),
            response_status: text(a, "responseStatus"),
        })
        .collect();

    CalendarEvent {
        id: text(raw, "id"),
        summary: text(raw, "summary"),
        description: text(raw, "description"),
        location: text(raw, "location"),
        start: instant(raw.get("start")),
        end: instant(raw.get("end")),
        status: text(raw, "status"),
        attendees,
        organizer: organizer(raw.get("organizer")),
        html_link: text(raw, "htmlLink"),
        hangout_link: text(raw, "hangoutLink"),
        recurring_event_id: text(raw, "recurringEventId"),
    }
}

pub fn calendar(raw: &Value) -> CalendarRef {
    CalendarRef {
        id: text(raw, "id"),
        summary: text(raw, "summary"),
        primary: raw.get("primary").and_then(Value::as_bool).unwrap_or(false),
        access_role: text(raw, "accessRole"),
        time_zone: text(raw, "timeZone"),
    }
}

/// Timed events carry `dateTime`, all-day events only `date`.
fn instant(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v
            .get("dateTime")
            .or_else(|| v.get("date"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        None => String::new(),
    }
}

fn organizer(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v) => text(v, "email"),
        None => String::new(),
    }
}
