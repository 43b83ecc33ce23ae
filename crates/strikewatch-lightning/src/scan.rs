//! Scan orchestration: one provider query per station, nearest-strike
//! distances, and the merged point set for the map.
//!
//! Station queries run concurrently up to `max_concurrent` in flight. Results
//! are gathered in station order regardless of completion order, and a failed
//! query only degrades its own [`StationResult`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use strikewatch_core::Station;

use crate::client::{StrikeClient, StrikeQuery};
use crate::dedup::dedup_points;
use crate::error::{LightningError, ScanError};
use crate::geo::nearest_km;
use crate::types::StrikePoint;
use crate::window::ScanWindow;

/// Description used when a station query failed without a provider error body.
const REQUEST_FAILED: &str = "request failed";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRequest {
    pub minutes: u32,
    pub radius_km: f64,
    pub include_ic: bool,
}

impl ScanRequest {
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidRequest`] unless `minutes` is non-zero and
    /// `radius_km` is finite and positive.
    pub fn new(minutes: u32, radius_km: f64, include_ic: bool) -> Result<Self, ScanError> {
        if minutes == 0 {
            return Err(ScanError::InvalidRequest(
                "minutes must be greater than zero".to_string(),
            ));
        }
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ScanError::InvalidRequest(format!(
                "radiusKm must be a positive number, got {radius_km}"
            )));
        }
        Ok(Self {
            minutes,
            radius_km,
            include_ic,
        })
    }
}

/// Why a station has no strikes in this scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub description: String,
}

impl From<&LightningError> for StationError {
    fn from(err: &LightningError) -> Self {
        match err {
            LightningError::Api { code, description } => Self {
                code: Some(code.clone()),
                description: description.clone(),
            },
            _ => Self {
                code: None,
                description: REQUEST_FAILED.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResult {
    pub station: String,
    pub lat: f64,
    pub lon: f64,
    /// Distance to the closest of this station's strikes; `None` when empty.
    pub nearest_km: Option<f64>,
    pub strikes: Vec<StrikePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StationError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// End of the scan window.
    pub updated_at: String,
    pub minutes: u32,
    pub radius_km: f64,
    pub results: Vec<StationResult>,
    pub points: Vec<StrikePoint>,
}

struct StationOutcome {
    result: StationResult,
    transport_error: Option<String>,
}

/// Runs scans against the lightning provider.
#[derive(Clone)]
pub struct ScanOrchestrator {
    client: StrikeClient,
    max_concurrent: usize,
}

impl ScanOrchestrator {
    #[must_use]
    pub fn new(client: StrikeClient, max_concurrent: usize) -> Self {
        Self {
            client,
            max_concurrent: max_concurrent.max(1),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.has_credentials()
    }

    /// Scans every station over the window ending now.
    ///
    /// # Errors
    ///
    /// See [`ScanOrchestrator::scan_at`].
    pub async fn scan(
        &self,
        request: &ScanRequest,
        stations: &[Station],
    ) -> Result<ScanResult, ScanError> {
        self.scan_at(request, stations, Utc::now()).await
    }

    /// Scans every station over the window ending at `now`.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Configuration`] before any request when provider
    ///   credentials are missing.
    /// - [`ScanError::Network`] when every station query failed to reach the
    ///   provider. Any other per-station failure is recorded on that
    ///   station's result instead.
    pub async fn scan_at(
        &self,
        request: &ScanRequest,
        stations: &[Station],
        now: DateTime<Utc>,
    ) -> Result<ScanResult, ScanError> {
        if !self.client.has_credentials() {
            return Err(ScanError::Configuration(
                "lightning provider credentials are not configured".to_string(),
            ));
        }

        let started = Instant::now();
        let window = ScanWindow::ending_at(now, request.minutes);

        let pending: Vec<_> = stations
            .iter()
            .map(|station| self.scan_station(station, request, &window))
            .collect();
        let outcomes: Vec<StationOutcome> = stream::iter(pending)
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let failed = outcomes
            .iter()
            .filter(|o| o.transport_error.is_some())
            .count();
        if !outcomes.is_empty() && failed == outcomes.len() {
            let message = outcomes
                .iter()
                .find_map(|o| o.transport_error.clone())
                .unwrap_or_default();
            tracing::error!(failed, error = %message, "every station query failed");
            return Err(ScanError::Network { failed, message });
        }

        let results: Vec<StationResult> = outcomes.into_iter().map(|o| o.result).collect();
        let points = dedup_points(&results);

        let degraded = results.iter().filter(|r| r.error.is_some()).count();
        tracing::info!(
            stations = results.len(),
            degraded,
            points = points.len(),
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "scan complete"
        );

        Ok(ScanResult {
            updated_at: window.to_param(),
            minutes: request.minutes,
            radius_km: request.radius_km,
            results,
            points,
        })
    }

    async fn scan_station(
        &self,
        station: &Station,
        request: &ScanRequest,
        window: &ScanWindow,
    ) -> StationOutcome {
        let query = StrikeQuery {
            lat: station.lat,
            lon: station.lon,
            radius_km: request.radius_km,
            window,
            include_ic: request.include_ic,
        };

        match self.client.fetch_strikes(&query).await {
            Ok(strikes) => {
                let nearest = nearest_km(station.lat, station.lon, &strikes);
                tracing::debug!(
                    station = %station.name,
                    strikes = strikes.len(),
                    nearest_km = ?nearest,
                    "station scanned"
                );
                StationOutcome {
                    result: StationResult {
                        station: station.name.clone(),
                        lat: station.lat,
                        lon: station.lon,
                        nearest_km: nearest,
                        strikes,
                        error: None,
                    },
                    transport_error: None,
                }
            }
            Err(err) => {
                tracing::warn!(station = %station.name, error = %err, "station query failed");
                StationOutcome {
                    result: StationResult {
                        station: station.name.clone(),
                        lat: station.lat,
                        lon: station.lon,
                        nearest_km: None,
                        strikes: Vec::new(),
                        error: Some(StationError::from(&err)),
                    },
                    transport_error: err.is_transport().then(|| err.to_string()),
                }
            }
        }
    }
}
