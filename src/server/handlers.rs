//! Endpoint handlers. Every query is a pure read of the shared dataset.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::AppState;
use crate::types::{CustomerTrendPoint, HealthStatus, KpiSummary, MonthlyRevenue, RegionRevenue};

pub(crate) async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.insights.health())
}

pub(crate) async fn kpis_handler(State(state): State<AppState>) -> Json<KpiSummary> {
    Json(state.insights.kpis())
}

pub(crate) async fn revenue_monthly_handler(
    State(state): State<AppState>,
) -> Json<Vec<MonthlyRevenue>> {
    Json(state.insights.revenue_by_month())
}

pub(crate) async fn revenue_region_handler(
    State(state): State<AppState>,
) -> Json<Vec<RegionRevenue>> {
    Json(state.insights.revenue_by_region())
}

pub(crate) async fn customer_trend_handler(
    State(state): State<AppState>,
) -> Json<Vec<CustomerTrendPoint>> {
    Json(state.insights.customer_trend())
}

pub(crate) async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

pub(crate) async fn method_not_allowed_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "detail": "Method Not Allowed" })),
    )
}
