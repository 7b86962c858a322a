//! Aggregation HTTP handlers: stats, monthly cash flow, storage rollups.
//!
//! All three recompute from current store state on every request — no
//! caching, no staleness window.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use drawer_core::{aggregate, CategoryStorage, DayFlow, DocumentRepository, Stats};

use crate::{ApiError, AppState};

/// Warehouse-wide statistics.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let docs = state.db.documents.list().await?;
    Ok(Json(aggregate::stats(&docs)))
}

/// Query parameters for the monthly flow table. Values arrive as raw
/// strings so that missing *and* unparseable input both fall back to the
/// current year/month instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct MonthlyFlowQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

/// Per-day cash flow for one month.
///
/// Defaults to the current UTC year/month when parameters are omitted,
/// unparseable, or out of range.
pub async fn get_monthly_flow(
    State(state): State<AppState>,
    Query(query): Query<MonthlyFlowQuery>,
) -> Result<Json<Vec<DayFlow>>, ApiError> {
    let now = Utc::now().date_naive();
    let year = query
        .year
        .as_deref()
        .and_then(|y| y.parse::<i32>().ok())
        .filter(|y| *y != 0)
        .unwrap_or_else(|| now.year());
    let month = query
        .month
        .as_deref()
        .and_then(|m| m.parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
        .unwrap_or_else(|| now.month());

    let docs = state.db.documents.list().await?;
    Ok(Json(aggregate::monthly_flow(&docs, year, month)))
}

/// Per-category storage usage, largest first.
pub async fn get_storage_by_category(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryStorage>>, ApiError> {
    let docs = state.db.documents.list().await?;
    Ok(Json(aggregate::storage_by_category(&docs)))
}
