//! HTTP front end: server-rendered pages plus a small JSON API.
//!
//! Pages:
//! - `/` landing page
//! - `/map` station map, placement form and simulation results
//! - `/about` guide to the tool, the model and the simulation
//!
//! JSON endpoints live under `/api/`, assets under `/static/`. Any other
//! path gets the not-found page with status 404.

pub mod assets;
mod handlers;
pub mod routes;
pub mod types;
pub mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ScenarioConfig};
use crate::network::{DataError, ExistingChargers, Highway};
use crate::sim::SimConfig;
use routes::Route;

/// Immutable application state shared across all request handlers.
///
/// Built once at startup and wrapped in `Arc`. No locks: every request
/// works on its own plan and RNG.
pub struct AppState {
    /// Segment network the map and simulations run on.
    pub highway: Highway,
    /// Existing public chargers snapped onto `highway`.
    pub existing: ExistingChargers,
    /// Defaults for simulation parameters not given by a request.
    pub scenario: ScenarioConfig,
}

impl AppState {
    pub fn new(highway: Highway, existing: ExistingChargers, scenario: ScenarioConfig) -> Self {
        Self {
            highway,
            existing,
            scenario,
        }
    }

    /// State over the bundled Highway 401 samples with default settings.
    pub fn sample() -> Result<Self, DataError> {
        let highway = Highway::sample()?;
        let existing = ExistingChargers::sample(&highway)?;
        Ok(Self::new(highway, existing, ScenarioConfig::default()))
    }

    /// Existing chargers when a request opts in, otherwise none.
    fn existing_for(&self, enabled: bool) -> ExistingChargers {
        if enabled {
            self.existing.clone()
        } else {
            ExistingChargers::default()
        }
    }

    /// Scenario simulation settings with optional per-request overrides.
    fn sim_config(&self, year: Option<u16>, seed: Option<u64>) -> Result<SimConfig, ConfigError> {
        let mut scenario = ScenarioConfig {
            simulation: self.scenario.simulation.clone(),
            ..ScenarioConfig::default()
        };
        if let Some(year) = year {
            scenario.simulation.year = year;
        }
        if let Some(seed) = seed {
            scenario.simulation.seed = seed;
        }
        scenario.sim_config()
    }
}

/// Builds the router with every page, asset and API route.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(Route::Home.path(), get(handlers::home))
        .route(Route::Map.path(), get(handlers::map_page))
        .route(Route::About.path(), get(handlers::about))
        .route("/static/style.css", get(handlers::stylesheet))
        .route("/static/img/{name}", get(handlers::image))
        .route("/api/segments", get(handlers::api_segments))
        .route("/api/simulate", post(handlers::api_simulate))
        .route("/api/optimize", post(handlers::api_optimize))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds to the given address and serves until the process stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(%local, segments = state.highway.len(), "listening on http://{local}");
    axum::serve(listener, router(state)).await
}
