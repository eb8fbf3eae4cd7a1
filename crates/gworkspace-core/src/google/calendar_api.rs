//! Google Calendar API v3 Client
//!
//! Provides methods for interacting with Google Calendar API:
//! - List calendars
//! - List/search/get events
//! - Create events (structured or quick-add) and merge-patch them
//!
//! Events can't be deleted through this client.

use serde_json::{json, Value};
use tracing::{debug, info};

use super::client::GoogleClient;
use super::common::{extract_array, segment};
use crate::backend::{CalendarBackend, EventQuery};
use crate::common::AppResult;

pub struct CalendarApi {
    client: GoogleClient,
}

super::google_api_wrapper!(CalendarApi);

impl CalendarApi {
    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.client.endpoints().calendar,
            segment(calendar_id)
        )
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!("{}/{}", self.events_url(calendar_id), segment(event_id))
    }
}

fn list_query(query: &EventQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        // Expand recurring events so orderBy=startTime is allowed
        ("singleEvents", "true".to_string()),
        ("orderBy", "startTime".to_string()),
    ];

    if let Some(min) = &query.time_min {
        params.push(("timeMin", min.clone()));
    }
    if let Some(max) = &query.time_max {
        params.push(("timeMax", max.clone()));
    }
    if let Some(text) = &query.text {
        params.push(("q", text.clone()));
    }
    params
}

impl CalendarBackend for CalendarApi {
    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> AppResult<Vec<Value>> {
        info!("Listing events for calendar: {}", calendar_id);

        let events = self
            .client
            .get_paginated(
                &self.events_url(calendar_id),
                &list_query(query),
                "items",
                "maxResults",
                query.max_results,
            )
            .await?;

        debug!("Retrieved {} events", events.len());
        Ok(events)
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> AppResult<Value> {
        info!("Fetching event: {} from calendar: {}", event_id, calendar_id);

        self.client
            .get(&self.event_url(calendar_id, event_id), &[])
            .await
    }

    async fn insert_event(&self, calendar_id: &str, event: &Value) -> AppResult<Value> {
        info!("Creating event in calendar: {}", calendar_id);

        let response = self
            .client
            .post(&self.events_url(calendar_id), &[], event)
            .await?;

        info!("Event created successfully");
        Ok(response)
    }

    async fn quick_add(&self, calendar_id: &str, text: &str) -> AppResult<Value> {
        info!("Quick-adding event in calendar: {}", calendar_id);

        let url = format!("{}/quickAdd", self.events_url(calendar_id));
        let response = self
            .client
            .post(&url, &[("text", text.to_string())], &json!({}))
            .await?;

        info!("Event created successfully");
        Ok(response)
    }

    async fn patch_event(&self, calendar_id: &str, event_id: &str, patch: &Value) -> AppResult<Value> {
        info!("Patching event: {} in calendar: {}", event_id, calendar_id);

        let response = self
            .client
            .patch(&self.event_url(calendar_id, event_id), patch)
            .await?;

        info!("Event updated successfully");
        Ok(response)
    }

    async fn list_calendars(&self) -> AppResult<Vec<Value>> {
        info!("Listing Google calendars");

        let url = format!("{}/users/me/calendarList", self.client.endpoints().calendar);
        let response = self.client.get(&url, &[]).await?;

        let calendars = extract_array(&response, "items");

        debug!("Retrieved {} calendars", calendars.len());
        Ok(calendars)
    }
}
