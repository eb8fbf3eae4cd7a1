//! Calendar domain: `gcal <command> [args...]`.
//!
//! Reads plus three writes (create, quick, update). Updates are merge-patches.
//! Events cannot be deleted.

use std::ffi::OsString;
use std::fmt::Display;
use std::future::Future;

use chrono::TimeZone;
use clap::{Parser, Subcommand};
use tracing::info;

use super::payload::PayloadSource;
use super::{parse_args, Capability, Invocation, Output, DEFAULT_COUNT, MAX_COUNT};
use crate::backend::{CalendarBackend, EventQuery};
use crate::common::AppResult;
use crate::normalize::calendar::{self as normalize, CalendarEvent, CalendarRef};
use crate::time_window::TimeWindow;

/// Event cap for the `today` and `week` windows
pub const WINDOW_MAX_EVENTS: usize = 50;

const PRIMARY: &str = "primary";

#[derive(Debug, Parser)]
#[command(name = "gcal", version, about = "Read and write Google Calendar events")]
pub struct CalendarCli {
    #[command(subcommand)]
    pub command: CalendarCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CalendarCommand {
    /// Upcoming events
    List {
        #[arg(default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_COUNT)))]
        count: u32,
        #[arg(default_value = PRIMARY)]
        calendar: String,
    },
    /// Events of the current day
    Today {
        #[arg(default_value = PRIMARY)]
        calendar: String,
    },
    /// Events from today through Sunday
    Week {
        #[arg(default_value = PRIMARY)]
        calendar: String,
    },
    /// One event
    Get {
        event_id: String,
        #[arg(default_value = PRIMARY)]
        calendar: String,
    },
    /// Upcoming events matching free text
    Search {
        query: String,
        #[arg(default_value_t = DEFAULT_COUNT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_COUNT)))]
        count: u32,
        #[arg(default_value = PRIMARY)]
        calendar: String,
    },
    /// Create an event from a JSON payload (`-` for stdin, inline `{...}`, or a file)
    Create {
        payload: PayloadSource,
        #[arg(default_value = PRIMARY)]
        calendar: String,
    },
    /// Create an event from a sentence ("Lunch with Ana tomorrow 1pm")
    Quick {
        text: String,
        #[arg(default_value = PRIMARY)]
        calendar: String,
    },
    /// Change only the fields present in a JSON patch payload
    Update {
        event_id: String,
        payload: PayloadSource,
        #[arg(default_value = PRIMARY)]
        calendar: String,
    },
    /// Calendars visible to the account
    Calendars,
}

impl CalendarCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Today { .. } => "today",
            Self::Week { .. } => "week",
            Self::Get { .. } => "get",
            Self::Search { .. } => "search",
            Self::Create { .. } => "create",
            Self::Quick { .. } => "quick",
            Self::Update { .. } => "update",
            Self::Calendars => "calendars",
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            Self::Create { .. } | Self::Quick { .. } | Self::Update { .. } => Capability::Write,
            _ => Capability::Read,
        }
    }

    /// Read and validate a write payload so input errors surface before connecting.
    pub fn resolve_payload(self) -> AppResult<Self> {
        Ok(match self {
            Self::Create { payload, calendar } => Self::Create {
                payload: payload.resolve()?,
                calendar,
            },
            Self::Update { event_id, payload, calendar } => Self::Update {
                event_id,
                payload: payload.resolve()?,
                calendar,
            },
            other => other,
        })
    }
}

pub async fn execute<I, T, B, C, Fut>(args: I, connect: C) -> AppResult<Output>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: CalendarBackend,
    C: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<B>>,
{
    let command = match parse_args::<CalendarCli, _, _>(args)? {
        Invocation::Run(cli) => cli.command,
        Invocation::Help(text) => return Ok(Output::Text(text)),
    };
    let command = command.resolve_payload()?;

    info!(command = command.name(), capability = %command.capability(), "Dispatching calendar command");
    let backend = connect().await?;
    dispatch(command, &backend).await
}

/// Dispatch with time windows taken from the local clock.
pub async fn dispatch<B: CalendarBackend>(command: CalendarCommand, backend: &B) -> AppResult<Output> {
    dispatch_at(command, backend, &TimeWindow::now()).await
}

pub async fn dispatch_at<B, Tz>(
    command: CalendarCommand,
    backend: &B,
    window: &TimeWindow<Tz>,
) -> AppResult<Output>
where
    B: CalendarBackend,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match command {
        CalendarCommand::List { count, calendar } => {
            let query = EventQuery {
                time_min: Some(window.instant()),
                max_results: count as usize,
                ..EventQuery::default()
            };
            list_events(backend, &calendar, &query, "No upcoming events found.").await
        }
        CalendarCommand::Today { calendar } => {
            let (start, end) = window.today();
            let query = bounded(start, end);
            list_events(backend, &calendar, &query, "No events today.").await
        }
        CalendarCommand::Week { calendar } => {
            let (start, end) = window.week();
            let query = bounded(start, end);
            list_events(backend, &calendar, &query, "No events this week.").await
        }
        CalendarCommand::Get { event_id, calendar } => {
            let raw = backend.get_event(&calendar, &event_id).await?;
            Output::json(&normalize::event(&raw))
        }
        CalendarCommand::Search { query, count, calendar } => {
            let empty = format!("No upcoming events matching '{}'.", query);
            let query = EventQuery {
                time_min: Some(window.instant()),
                text: Some(query),
                max_results: count as usize,
                ..EventQuery::default()
            };
            list_events(backend, &calendar, &query, empty).await
        }
        CalendarCommand::Create { payload, calendar } => {
            let body = payload.load()?;
            let raw = backend.insert_event(&calendar, &body).await?;
            Output::json(&normalize::event(&raw))
        }
        CalendarCommand::Quick { text, calendar } => {
            let raw = backend.quick_add(&calendar, &text).await?;
            Output::json(&normalize::event(&raw))
        }
        CalendarCommand::Update { event_id, payload, calendar } => {
            let patch = payload.load()?;
            let raw = backend.patch_event(&calendar, &event_id, &patch).await?;
            Output::json(&normalize::event(&raw))
        }
        CalendarCommand::Calendars => {
            let calendars: Vec<CalendarRef> =
                backend.list_calendars().await?.iter().map(normalize::calendar).collect();
            Output::list(&calendars, "No calendars found.")
        }
    }
}

fn bounded(start: String, end: String) -> EventQuery {
    EventQuery {
        time_min: Some(start),
        time_max: Some(end),
        text: None,
        max_results: WINDOW_MAX_EVENTS,
    }
}

async fn list_events<B: CalendarBackend>(
    backend: &B,
    calendar_id: &str,
    query: &EventQuery,
    empty: impl Into<String>,
) -> AppResult<Output> {
    let events: Vec<CalendarEvent> = backend
        .list_events(calendar_id, query)
        .await?
        .iter()
        .map(normalize::event)
        .collect();
    Output::list(&events, empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::AppError;
    use chrono::{DateTime, FixedOffset};
    use clap::CommandFactory;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// In-memory calendar that applies writes and records every call
    #[derive(Clone, Default)]
    struct FakeCalendar {
        events: Arc<Mutex<BTreeMap<String, Value>>>,
        calls: Arc<Mutex<Vec<String>>>,
        last_query: Arc<Mutex<Option<EventQuery>>>,
    }

    impl FakeCalendar {
        fn with_event(id: &str, event: Value) -> Self {
            let fake = Self::default();
            fake.events.lock().unwrap().insert(id.to_string(), event);
            fake
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    impl CalendarBackend for FakeCalendar {
        async fn list_events(&self, _calendar_id: &str, query: &EventQuery) -> AppResult<Vec<Value>> {
            self.record("list_events");
            *self.last_query.lock().unwrap() = Some(query.clone());
            Ok(self.events.lock().unwrap().values().cloned().collect())
        }

        async fn get_event(&self, _calendar_id: &str, event_id: &str) -> AppResult<Value> {
            self.record("get_event");
            self.events
                .lock()
                .unwrap()
                .get(event_id)
                .cloned()
                .ok_or_else(|| AppError::remote(404, "Not Found"))
        }

        async fn insert_event(&self, _calendar_id: &str, body: &Value) -> AppResult<Value> {
            self.record("insert_event");
            let mut created = body.clone();
            created["id"] = json!("new1");
            created["status"] = json!("confirmed");
            self.events.lock().unwrap().insert("new1".into(), created.clone());
            Ok(created)
        }

        async fn quick_add(&self, _calendar_id: &str, text: &str) -> AppResult<Value> {
            self.record("quick_add");
            Ok(json!({"id": "q1", "summary": text}))
        }

        async fn patch_event(&self, _calendar_id: &str, event_id: &str, patch: &Value) -> AppResult<Value> {
            self.record("patch_event");
            let mut events = self.events.lock().unwrap();
            let stored = events
                .get_mut(event_id)
                .ok_or_else(|| AppError::remote(404, "Not Found"))?;
            if let (Some(target), Some(fields)) = (stored.as_object_mut(), patch.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            Ok(stored.clone())
        }

        async fn list_calendars(&self) -> AppResult<Vec<Value>> {
            self.record("list_calendars");
            Ok(vec![json!({"id": "primary@example.com", "summary": "Me", "primary": true, "etag": "x"})])
        }
    }

    fn standup() -> Value {
        json!({
            "id": "ev1",
            "summary": "Standup",
            "description": "Daily sync",
            "location": "Room 4",
            "start": {"dateTime": "2026-10-14T09:00:00+02:00"},
            "end": {"dateTime": "2026-10-14T09:15:00+02:00"}
        })
    }

    fn parse(args: &[&str]) -> AppResult<CalendarCommand> {
        let argv = std::iter::once("gcal").chain(args.iter().copied());
        match parse_args::<CalendarCli, _, _>(argv)? {
            Invocation::Run(cli) => Ok(cli.command),
            Invocation::Help(_) => panic!("unexpected help"),
        }
    }

    fn wednesday() -> TimeWindow<FixedOffset> {
        TimeWindow::at(&DateTime::parse_from_rfc3339("2026-10-14T10:30:00+02:00").unwrap())
    }

    #[test]
    fn test_commands_parse_with_required_arguments() {
        let samples: [&[&str]; 9] = [
            &["list"],
            &["today"],
            &["week"],
            &["get", "ev1"],
            &["search", "standup"],
            &["create", "event.json"],
            &["quick", "Lunch tomorrow 1pm"],
            &["update", "ev1", "-"],
            &["calendars"],
        ];
        for args in samples {
            let command = parse(args).unwrap();
            assert_eq!(command.name(), args[0]);
        }

        assert_eq!(
            parse(&["update", "ev1", r#"{"summary":"X"}"#, "team@example.com"]).unwrap(),
            CalendarCommand::Update {
                event_id: "ev1".into(),
                payload: PayloadSource::Inline(r#"{"summary":"X"}"#.into()),
                calendar: "team@example.com".into(),
            }
        );

        let cases: [&[&str]; 6] = [&["get"], &["search"], &["create"], &["quick"], &["update", "ev1"], &["list", "-1"]];
        for args in cases {
            assert!(matches!(parse(args), Err(AppError::Usage(_))), "{:?}", args);
        }
    }

    #[test]
    fn test_no_delete_and_only_three_writes() {
        let names: Vec<String> = CalendarCli::command()
            .get_subcommands()
            .map(|c| c.get_name().to_string())
            .filter(|n| n != "help")
            .collect();
        assert!(!names.iter().any(|n| n.contains("delete") || n.contains("remove")));

        let samples: [&[&str]; 9] = [
            &["list"],
            &["today"],
            &["week"],
            &["get", "e"],
            &["search", "q"],
            &["create", "-"],
            &["quick", "t"],
            &["update", "e", "-"],
            &["calendars"],
        ];
        let writes: Vec<&str> = samples
            .iter()
            .map(|args| parse(args).unwrap())
            .filter(|c| c.capability() == Capability::Write)
            .map(|c| c.name())
            .collect();
        assert_eq!(writes, vec!["create", "quick", "update"]);
        assert_eq!(names.len(), samples.len());
    }

    #[tokio::test]
    async fn test_merge_patch_changes_only_supplied_fields() {
        let fake = FakeCalendar::with_event("ev1", standup());

        let command = parse(&["update", "ev1", r#"{"summary": "X"}"#]).unwrap();
        let output = dispatch(command, &fake).await.unwrap();

        let Output::Json(updated) = output else {
            panic!("expected JSON");
        };
        assert_eq!(updated["summary"], "X");
        assert_eq!(updated["description"], "Daily sync");
        assert_eq!(updated["location"], "Room 4");
        assert_eq!(updated["start"], "2026-10-14T09:00:00+02:00");

        let stored = fake.events.lock().unwrap()["ev1"].clone();
        let mut expected = standup();
        expected["summary"] = json!("X");
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn test_today_and_week_query_bounds() {
        let fake = FakeCalendar::default();

        let output = dispatch_at(parse(&["today"]).unwrap(), &fake, &wednesday())
            .await
            .unwrap();
        assert_eq!(output, Output::text("No events today."));
        let query = fake.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.time_min.as_deref(), Some("2026-10-14T00:00:00+02:00"));
        assert_eq!(query.time_max.as_deref(), Some("2026-10-14T23:59:59.999+02:00"));

        dispatch_at(parse(&["week"]).unwrap(), &fake, &wednesday())
            .await
            .unwrap();
        let query = fake.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.time_max.as_deref(), Some("2026-10-18T23:59:59.999+02:00"));
        assert_eq!(query.max_results, WINDOW_MAX_EVENTS);
    }

    #[tokio::test]
    async fn test_search_starts_now_and_passes_text() {
        let fake = FakeCalendar::with_event("ev1", standup());

        let output = dispatch_at(parse(&["search", "standup", "5"]).unwrap(), &fake, &wednesday())
            .await
            .unwrap();
        let query = fake.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.time_min.as_deref(), Some("2026-10-14T10:30:00+02:00"));
        assert_eq!(query.time_max, None);
        assert_eq!(query.text.as_deref(), Some("standup"));
        assert_eq!(query.max_results, 5);

        let Output::Json(events) = output else {
            panic!("expected JSON");
        };
        assert_eq!(events[0]["attendees"], json!([]));
    }

    #[tokio::test]
    async fn test_create_with_inline_payload() {
        let fake = FakeCalendar::default();
        let command = parse(&[
            "create",
            r#"{"summary": "Review", "start": {"dateTime": "2026-10-19T14:00:00Z"}, "end": {"dateTime": "2026-10-19T15:00:00Z"}}"#,
        ])
        .unwrap();

        let Output::Json(created) = dispatch(command, &fake).await.unwrap() else {
            panic!("expected JSON");
        };
        assert_eq!(created["id"], "new1");
        assert_eq!(created["start"], "2026-10-19T14:00:00Z");
    }

    #[tokio::test]
    async fn test_malformed_payload_makes_no_write() {
        let fake = FakeCalendar::with_event("ev1", standup());
        let command = parse(&["update", "ev1", "{not json"]).unwrap();

        let err = dispatch(command, &fake).await.unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_payload_fails_before_connecting() {
        let fake = FakeCalendar::with_event("ev1", standup());
        let mut connected = false;
        let flag = &mut connected;
        let backend = fake.clone();

        let result = execute(["gcal", "update", "ev1", "{not json"], || async move {
            *flag = true;
            Ok(backend)
        })
        .await;

        assert!(matches!(result, Err(AppError::Input(_))));
        assert!(!connected);
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_never_connects() {
        let fake = FakeCalendar::default();
        let mut connected = false;
        let flag = &mut connected;
        let backend = fake.clone();

        let result = execute(["gcal", "delete", "ev1"], || async move {
            *flag = true;
            Ok(backend)
        })
        .await;

        assert!(matches!(result, Err(AppError::Usage(_))));
        assert!(!connected);
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_calendars_projection() {
        let fake = FakeCalendar::default();
        let Output::Json(calendars) = dispatch(CalendarCommand::Calendars, &fake).await.unwrap() else {
            panic!("expected JSON");
        };
        assert_eq!(calendars[0]["primary"], true);
        assert!(calendars[0].get("etag").is_none());
    }
}
