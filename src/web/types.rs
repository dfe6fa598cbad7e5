//! Query, request and response types for the web handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::placement::{PlanError, StationLevel};

/// Query string of `GET /map`.
///
/// Fields stay strings so empty form inputs (`budget=`) are accepted and
/// parse errors can be shown on the page instead of rejected up front.
#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    pub year: Option<String>,
    pub budget: Option<String>,
    pub stations: Option<String>,
    /// Checkbox: present when existing chargers should be shown and used.
    pub existing: Option<String>,
}

/// A station in a JSON request.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct StationSpec {
    pub lhrs: u32,
    /// Level 1, 2 or 3.
    pub level: u8,
}

impl StationSpec {
    pub fn entry(self) -> Result<(u32, StationLevel), PlanError> {
        Ok((self.lhrs, StationLevel::from_index(self.level)?))
    }
}

/// Body of `POST /api/simulate`.
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub stations: Vec<StationSpec>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Include the per-car event log in the response.
    #[serde(default)]
    pub record_events: bool,
}

/// Body of `POST /api/optimize`.
#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub budget: f64,
    /// Stations that must stay in the plan.
    #[serde(default)]
    pub fixed: Vec<StationSpec>,
    /// Count existing DC fast chargers as free capacity.
    #[serde(default)]
    pub existing: bool,
}

/// Response of `POST /api/optimize`.
#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub stations: Vec<StationSpec>,
    pub budget: f64,
    pub cost: f64,
    pub covered_demand: f64,
    pub total_demand: f64,
    pub coverage_ratio: f64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Request errors, all reported as 400 with an [`ErrorResponse`] body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Invalid(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
