//! Admin analytics dashboard and metric histories.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AnalyticsDashboard, AnalyticsRecord, METRIC_HISTORY_DAYS_DEFAULT};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AnalyticsDashboardSchema, AnalyticsRecordSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query parameters for `GET /api/v1/analytics/metrics/{metricType}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricHistoryQuery {
    /// Defaults to 30, clamped to 1..=365.
    pub days: Option<u32>,
}

/// Platform-wide figures for admins.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = AnalyticsDashboardSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Platform admins only", body = ErrorSchema),
        (status = 503, description = "Data store unavailable", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "analyticsDashboard"
)]
#[get("/analytics/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AnalyticsDashboard>> {
    let actor = session.require_actor()?;
    let dashboard = state.analytics.dashboard(&actor).await?;
    Ok(web::Json(dashboard))
}

/// Samples of one metric type, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/metrics/{metricType}",
    params(
        ("metricType" = String, Path, description = "Metric type"),
        ("days" = Option<u32>, Query, description = "Window in days, default 30, max 365")
    ),
    responses(
        (status = 200, description = "Metric samples", body = [AnalyticsRecordSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Platform admins only", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "metricHistory"
)]
#[get("/analytics/metrics/{metric_type}")]
pub async fn metric_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<MetricHistoryQuery>,
) -> ApiResult<web::Json<Vec<AnalyticsRecord>>> {
    let actor = session.require_actor()?;
    let history = state
        .analytics
        .metric_history(
            &actor,
            &path.into_inner(),
            query.days.unwrap_or(METRIC_HISTORY_DAYS_DEFAULT),
        )
        .await?;
    Ok(web::Json(history))
}
