use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use strikewatch_lightning::{ScanError, ScanRequest, ScanResult};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ScanParams {
    minutes: Option<u32>,
    #[serde(rename = "radiusKm")]
    radius_km: Option<f64>,
    #[serde(rename = "includeIC")]
    include_ic: Option<String>,
}

pub(super) async fn run_scan(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<ScanParams>, QueryRejection>,
) -> Result<Json<ScanResult>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;

    let include_ic = parse_flag(params.include_ic.as_deref()).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "includeIC must be true, false, 1 or 0",
        )
    })?;

    let request = ScanRequest::new(
        params.minutes.unwrap_or(state.defaults.minutes),
        params.radius_km.unwrap_or(state.defaults.radius_km),
        include_ic,
    )
    .map_err(|e| map_scan_error(req_id.0.clone(), &e))?;

    let result = state
        .scanner
        .scan(&request, &state.stations)
        .await
        .map_err(|e| map_scan_error(req_id.0.clone(), &e))?;

    Ok(Json(result))
}

fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::trim) {
        None | Some("" | "false" | "0") => Some(false),
        Some("true" | "1") => Some(true),
        Some(_) => None,
    }
}

fn map_scan_error(request_id: String, error: &ScanError) -> ApiError {
    match error {
        ScanError::InvalidRequest(msg) => ApiError::new(request_id, "validation_error", msg.clone()),
        ScanError::Configuration(msg) => {
            tracing::error!(error = %error, "scan rejected: configuration");
            ApiError::new(request_id, "configuration_error", msg.clone())
        }
        ScanError::Network { .. } => {
            tracing::error!(error = %error, "scan failed");
            ApiError::new(request_id, "upstream_error", "lightning provider unreachable")
        }
    }
}
