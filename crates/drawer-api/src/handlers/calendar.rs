//! Calendar HTTP handler: the unified bill/reminder feed.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use drawer_core::{aggregate, defaults, CalendarEvent, DocumentRepository, NoteRepository};

use crate::{ApiError, AppState};

/// Inclusive date range; omitted or unparseable bounds widen to the
/// default full range.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Merged calendar feed of document due dates and note reminders.
pub async fn get_calendar_events(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    let start = parse_date(query.start.as_deref()).unwrap_or_else(defaults::calendar_range_start);
    let end = parse_date(query.end.as_deref()).unwrap_or_else(defaults::calendar_range_end);

    let docs = state.db.documents.list().await?;
    let notes = state.db.notes.list().await?;
    Ok(Json(aggregate::calendar_events(&docs, &notes, start, end)))
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}
