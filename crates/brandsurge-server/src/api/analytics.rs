use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use brandsurge_core::{Slice, Table};
use brandsurge_metrics::{
    brand_list, breakdown, compute_metrics, is_brand, summarize, BrandMetrics, Breakdown,
    ChannelMetric, DateWindow, Summary,
};

use crate::middleware::RequestId;

use super::{map_cache_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Filters shared by the metrics and breakdown endpoints.
///
/// Dates are `YYYY-MM-DD`. Without `all_dates`, missing bounds default to the
/// last 30 days ending today.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AnalyticsQuery {
    pub brand: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub all_dates: bool,
    pub metric: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MetricsData {
    pub brand: Option<String>,
    pub window: Option<DateWindow>,
    pub metrics: BrandMetrics,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub(super) struct BreakdownData {
    pub brand: Option<String>,
    pub window: Option<DateWindow>,
    #[serde(flatten)]
    pub breakdown: Breakdown,
}

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let snapshot = state
        .cache
        .get()
        .await
        .map_err(|e| map_cache_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: brand_list(&snapshot.table),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_metrics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<MetricsData>>, ApiError> {
    let window = resolve_window(&req_id.0, &query)?;
    let snapshot = state
        .cache
        .get()
        .await
        .map_err(|e| map_cache_error(req_id.0.clone(), &e))?;

    let brand = requested_brand(&query);
    let slice = select(&req_id.0, &snapshot.table, brand.as_deref(), window.as_ref())?;
    let metrics = compute_metrics(&slice, &snapshot.table);
    let summary = summarize(&slice, &metrics);

    Ok(Json(ApiResponse {
        data: MetricsData {
            brand,
            window,
            metrics,
            summary,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_breakdown(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<BreakdownData>>, ApiError> {
    let metric = match query.metric.as_deref() {
        Some(raw) => raw
            .parse::<ChannelMetric>()
            .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?,
        None => ChannelMetric::default(),
    };
    let window = resolve_window(&req_id.0, &query)?;
    let snapshot = state
        .cache
        .get()
        .await
        .map_err(|e| map_cache_error(req_id.0.clone(), &e))?;

    let brand = requested_brand(&query);
    let slice = select(&req_id.0, &snapshot.table, brand.as_deref(), window.as_ref())?;

    Ok(Json(ApiResponse {
        data: BreakdownData {
            brand,
            window,
            breakdown: breakdown(&slice, metric),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn requested_brand(query: &AnalyticsQuery) -> Option<String> {
    query
        .brand
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(String::from)
}

fn resolve_window(request_id: &str, query: &AnalyticsQuery) -> Result<Option<DateWindow>, ApiError> {
    if query.all_dates {
        return Ok(None);
    }
    let from = parse_date(request_id, "from", query.from.as_deref())?;
    let to = parse_date(request_id, "to", query.to.as_deref())?;
    Ok(Some(DateWindow::resolve(from, to, Utc::now().date_naive())))
}

fn parse_date(
    request_id: &str,
    field: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some).map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("{field} must be a date in YYYY-MM-DD form, got \"{raw}\""),
        )
    })
}

fn select<'a>(
    request_id: &str,
    table: &'a Table,
    brand: Option<&str>,
    window: Option<&DateWindow>,
) -> Result<Slice<'a>, ApiError> {
    let mut slice = table.slice();
    if let Some(name) = brand {
        if !is_brand(name) || !brand_list(table).iter().any(|b| b == name) {
            return Err(ApiError::new(
                request_id,
                "not_found",
                format!("brand '{name}' not found"),
            ));
        }
        slice = slice.for_brand(name);
    }
    if let Some(window) = window {
        slice = window.apply(&slice);
    }
    Ok(slice)
}
