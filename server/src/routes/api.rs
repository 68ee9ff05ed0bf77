use std::fmt::Write as _;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, warn};
use worldcup_shared::{DashboardError, Layout, Year};

use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
const FIGURE_CACHE_CONTROL: &str = "no-cache";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let selected_year = state.year_region.read().await.selection();
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "records": state.dashboard.table.len(),
        "countries": state.dashboard.countries.len(),
        "years": state.dashboard.years.len(),
        "selected_year": selected_year,
        "observability": {
            "selections_accepted_total": observability.selections_accepted_total,
            "selections_rejected_total": observability.selections_rejected_total,
            "figure_requests_total": observability.figure_requests_total,
            "sse_connections_total": observability.sse_connections_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let selected_year = state.year_region.read().await.selection();
    let body = render_prometheus_metrics(
        state.dashboard.table.len(),
        state.dashboard.countries.len(),
        selected_year,
        state.observability.snapshot(),
    );

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(
    record_count: usize,
    country_count: usize,
    selected_year: Year,
    observability: ObservabilitySnapshot,
) -> String {
    let mut body = String::new();
    write_metric(
        &mut body,
        "worldcup_records",
        "gauge",
        "Tournament records loaded at startup.",
        record_count as u64,
    );
    write_metric(
        &mut body,
        "worldcup_countries",
        "gauge",
        "Distinct countries that reached a final.",
        country_count as u64,
    );
    write_metric(
        &mut body,
        "worldcup_selected_year",
        "gauge",
        "Year currently shown in the winner and runner-up map.",
        u64::from(selected_year),
    );
    write_metric(
        &mut body,
        "worldcup_selections_accepted_total",
        "counter",
        "Year selections that published a new map.",
        observability.selections_accepted_total,
    );
    write_metric(
        &mut body,
        "worldcup_selections_rejected_total",
        "counter",
        "Year selections rejected for an unknown year.",
        observability.selections_rejected_total,
    );
    write_metric(
        &mut body,
        "worldcup_figure_requests_total",
        "counter",
        "Figure requests served, including 304 responses.",
        observability.figure_requests_total,
    );
    write_metric(
        &mut body,
        "worldcup_sse_connections_total",
        "counter",
        "Event stream connections opened.",
        observability.sse_connections_total,
    );
    body
}

fn write_metric(body: &mut String, name: &str, kind: &str, help: &str, value: u64) {
    let _ = writeln!(body, "# HELP {name} {help}");
    let _ = writeln!(body, "# TYPE {name} {kind}");
    let _ = writeln!(body, "{name} {value}");
}

pub async fn get_layout(State(state): State<AppState>) -> Json<Layout> {
    Json(state.layout().await)
}

pub async fn get_winners_figure(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.observability.record_figure_request();
    static_figure_response(&state.figures.winners_json, "winners", &headers)
}

pub async fn get_win_tally_figure(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.observability.record_figure_request();
    static_figure_response(&state.figures.win_tally_json, "wins", &headers)
}

pub async fn get_year_figure(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.observability.record_figure_request();
    let (etag, json): (String, Arc<Bytes>) = {
        let region = state.year_region.read().await;
        let published = region.published();
        (
            year_map_etag(published.year, published.revision),
            Arc::clone(&published.figure_json),
        )
    };

    if if_none_match_matches(&headers, &etag) {
        return not_modified_response(FIGURE_CACHE_CONTROL, Some(etag.as_str()));
    }

    json_bytes_response((*json).clone(), FIGURE_CACHE_CONTROL, Some(etag.as_str()))
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub year: i64,
}

/// Year-selection event. Holds the region's write lock from validation
/// through broadcast, so selections are handled one at a time and published
/// in revision order.
pub async fn post_selection(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Response {
    let mut region = state.year_region.write().await;

    let outcome = match Year::try_from(request.year) {
        Ok(year) => region.select(&state.dashboard, year),
        Err(_) => Err(DashboardError::DataFormat(format!(
            "year {} is out of range",
            request.year
        ))),
    };

    match outcome {
        Ok(published) => {
            state.observability.record_selection_accepted();
            info!(
                year = published.year,
                revision = published.revision,
                "published year map"
            );
            let body = (*published.payload_json).clone();
            // No receivers just means no open event streams.
            let _ = state.event_tx.send(published);
            json_bytes_response(body, "no-store", None)
        }
        Err(e) => {
            state.observability.record_selection_rejected();
            let selected_year = region.selection();
            warn!(
                requested_year = request.year,
                selected_year,
                error = %e,
                "rejected year selection; keeping current map"
            );
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "year": request.year,
                    "selected_year": selected_year,
                })),
            )
                .into_response()
        }
    }
}

fn static_figure_response(json: &Arc<Bytes>, name: &str, headers: &HeaderMap) -> Response {
    let etag = content_etag(name, json);
    if if_none_match_matches(headers, &etag) {
        return not_modified_response(FIGURE_CACHE_CONTROL, Some(etag.as_str()));
    }
    json_bytes_response((**json).clone(), FIGURE_CACHE_CONTROL, Some(etag.as_str()))
}

fn content_etag(name: &str, body: &Bytes) -> String {
    let mut hasher = DefaultHasher::new();
    body.as_ref().hash(&mut hasher);
    format!("\"{name}-{:016x}\"", hasher.finish())
}

fn year_map_etag(year: Year, revision: u64) -> String {
    format!("\"year-map-{year}-{revision}\"")
}

fn json_bytes_response(
    body: Bytes,
    cache_control: &'static str,
    etag: Option<&str>,
) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
