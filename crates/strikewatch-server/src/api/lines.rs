use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use strikewatch_arcgis::{ArcgisError, BoundingBox, LineCollection};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LinesParams {
    xmin: Option<f64>,
    ymin: Option<f64>,
    xmax: Option<f64>,
    ymax: Option<f64>,
}

pub(super) async fn fetch_lines(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<LinesParams>, QueryRejection>,
) -> Result<Json<LineCollection>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;

    let bbox = BoundingBox::from_parts(params.xmin, params.ymin, params.xmax, params.ymax)
        .map_err(|e| map_lines_error(req_id.0.clone(), &e))?;

    let client = state
        .lines
        .as_ref()
        .ok_or_else(|| map_lines_error(req_id.0.clone(), &ArcgisError::NotConfigured))?;

    let lines = client
        .fetch_lines(&bbox)
        .await
        .map_err(|e| map_lines_error(req_id.0.clone(), &e))?;

    tracing::debug!(features = lines.feature_count(), "lines fetched");
    Ok(Json(lines))
}

fn map_lines_error(request_id: String, error: &ArcgisError) -> ApiError {
    if error.is_validation() {
        return ApiError::new(request_id, "validation_error", error.to_string());
    }
    if matches!(error, ArcgisError::NotConfigured) {
        return ApiError::new(request_id, "configuration_error", error.to_string());
    }
    tracing::error!(error = %error, "lines fetch failed");
    ApiError::new(request_id, "upstream_error", "mapping service request failed")
}
