//! Request handlers for pages, assets and the JSON API.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Serialize;

use super::AppState;
use super::assets;
use super::routes::Route;
use super::types::{
    ApiError, MapQuery, OptimizeRequest, OptimizeResponse, SimulateRequest, StationSpec,
};
use super::views::{self, map::MapForm, map::MapPage, map::MapResult};
use crate::network::Segment;
use crate::placement::{StationPlan, optimize};
use crate::runner::{SimulationRun, simulate_plan};
use crate::sim::types::year_scale;

/// `GET /`
pub async fn home() -> Html<String> {
    Html(views::home::render())
}

/// `GET /about`
pub async fn about() -> Html<String> {
    Html(views::about::render())
}

/// `GET /map?year=&budget=&stations=&existing=`
///
/// Without a placement the bare map is shown. `stations` alone is simulated
/// as given. With a `budget` the optimizer keeps the listed stations and
/// places more around them. `existing` marks existing chargers and counts
/// them as free capacity. Bad input re-renders the page with an error banner
/// and status 400.
pub async fn map_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MapQuery>,
) -> Response {
    let year = parse_field::<u16>(query.year.as_deref(), "year")
        .ok()
        .flatten()
        .filter(|y| year_scale(*y).is_some());
    let mut form = MapForm {
        year: year.unwrap_or(state.scenario.simulation.year),
        budget: query.budget.clone().unwrap_or_default(),
        stations: query.stations.clone().unwrap_or_default(),
        existing: query.existing.as_deref().is_some_and(|v| !v.trim().is_empty()),
    };
    let existing = form.existing.then_some(&state.existing);

    match map_result(&state, &query, form.existing) {
        Ok(result) => {
            if let Some(result) = result.as_ref().filter(|r| !r.optimized) {
                form.stations = result.plan.to_query();
            }
            let page = MapPage {
                highway: &state.highway,
                form: &form,
                result: result.as_ref(),
                existing,
                error: None,
            };
            Html(views::map::render(&page)).into_response()
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected map query");
            let message = err.to_string();
            let page = MapPage {
                highway: &state.highway,
                form: &form,
                result: None,
                existing,
                error: Some(&message),
            };
            (StatusCode::BAD_REQUEST, Html(views::map::render(&page))).into_response()
        }
    }
}

fn map_result(
    state: &AppState,
    query: &MapQuery,
    existing: bool,
) -> Result<Option<MapResult>, ApiError> {
    let year: Option<u16> = parse_field(query.year.as_deref(), "year")?;
    let budget: Option<f64> = parse_field(query.budget.as_deref(), "budget")?;
    if budget.is_some_and(|b| !(b >= 0.0)) {
        return Err(ApiError::Invalid("budget must be a non-negative number".into()));
    }
    let stations = query
        .stations
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let config = state.sim_config(year, None)?;
    let listed = match stations {
        Some(stations) => {
            let entries = StationPlan::parse_stations(stations)?;
            Some(StationPlan::from_entries(&state.highway, None, entries)?)
        }
        None => None,
    };

    let (plan, optimized, fixed) = match (listed, budget) {
        (Some(plan), None) => (plan, false, 0),
        (listed, Some(budget)) => {
            let fixed = listed.unwrap_or_else(StationPlan::unlimited);
            let result = optimize(
                &state.highway,
                budget,
                &fixed,
                &state.existing_for(existing),
                config.range_km,
            )?;
            (result.plan, true, fixed.len())
        }
        (None, None) => return Ok(None),
    };

    let run = simulate_plan(&state.highway, &plan, &config);
    Ok(Some(MapResult {
        plan,
        run,
        optimized,
        fixed,
    }))
}

/// Parses an optional form field; blank counts as absent.
fn parse_field<T: FromStr>(raw: Option<&str>, name: &str) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::Invalid(format!("invalid {name} \"{value}\""))),
    }
}

/// Any path without a route.
///
/// Known views with a trailing slash redirect to their canonical path.
pub async fn not_found(uri: Uri) -> Response {
    if let Some(route) = Route::resolve(uri.path()) {
        if route.path() != uri.path() {
            return Redirect::permanent(route.path()).into_response();
        }
    }
    (
        StatusCode::NOT_FOUND,
        Html(views::not_found::render(uri.path())),
    )
        .into_response()
}

/// `GET /static/style.css`
pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}

/// `GET /static/img/{name}`
pub async fn image(Path(name): Path<String>, uri: Uri) -> Response {
    match assets::image(&name) {
        Some(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        None => not_found(uri).await,
    }
}

/// `GET /api/segments` → 200 + segment list JSON
pub async fn api_segments(State(state): State<Arc<AppState>>) -> Json<Vec<Segment>> {
    Json(state.highway.segments().to_vec())
}

/// Body of a successful `POST /api/simulate`.
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub plan: StationPlan,
    #[serde(flatten)]
    pub run: SimulationRun,
}

/// `POST /api/simulate` → 200 + report, bands and plan JSON
///
/// Unknown segments, bad levels, unknown years and plans over budget
/// → 400 + `ErrorResponse`.
pub async fn api_simulate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let entries = req
        .stations
        .iter()
        .map(|s| s.entry())
        .collect::<Result<Vec<_>, _>>()?;
    let plan = StationPlan::from_entries(&state.highway, req.budget, entries)?;

    let mut config = state.sim_config(req.year, req.seed)?;
    config.record_events = req.record_events;

    let run = simulate_plan(&state.highway, &plan, &config);
    Ok(Json(SimulateResponse { plan, run }))
}

/// `POST /api/optimize` → 200 + `OptimizeResponse` JSON
pub async fn api_optimize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    if !(req.budget >= 0.0) {
        return Err(ApiError::Invalid("budget must be >= 0".into()));
    }
    let fixed_entries = req
        .fixed
        .iter()
        .map(|s| s.entry())
        .collect::<Result<Vec<_>, _>>()?;
    let fixed = StationPlan::from_entries(&state.highway, None, fixed_entries)?;

    let range_km = state.scenario.simulation.range_km;
    let existing = state.existing_for(req.existing);
    let result = optimize(&state.highway, req.budget, &fixed, &existing, range_km)?;

    Ok(Json(OptimizeResponse {
        stations: result
            .plan
            .iter()
            .map(|(lhrs, level)| StationSpec {
                lhrs,
                level: level.index(),
            })
            .collect(),
        budget: req.budget,
        cost: result.plan.cumulative_cost(),
        covered_demand: result.covered_demand,
        total_demand: result.total_demand,
        coverage_ratio: result.coverage_ratio(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::web::router;

    fn app() -> axum::Router {
        router(Arc::new(AppState::sample().expect("sample state")))
    }

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn trailing_slash_redirects() {
        let req = Request::builder().uri("/map/").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/map")
        );
    }

    #[tokio::test]
    async fn blank_form_fields_show_bare_map() {
        let req = Request::builder()
            .uri("/map?year=2024&budget=&stations=")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(!html.contains("Simulation Results"));
        assert!(!html.contains("error-banner"));
    }

    #[tokio::test]
    async fn bad_budget_shows_banner() {
        let req = Request::builder()
            .uri("/map?budget=lots")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let html = body_string(resp).await;
        assert!(html.contains("invalid budget &quot;lots&quot;"));
    }

    #[tokio::test]
    async fn unknown_year_shows_banner() {
        let req = Request::builder()
            .uri("/map?year=2031&stations=10890:1")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(resp).await.contains("no demand projection"));
    }

    #[tokio::test]
    async fn budget_only_runs_optimizer() {
        let req = Request::builder()
            .uri("/map?budget=500000")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("Placement chosen by the optimizer"));
        assert!(html.contains("marker station"));
    }

    #[tokio::test]
    async fn valid_year_is_kept_in_the_form() {
        let req = Request::builder()
            .uri("/map?year=2029")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains("<option value=\"2029\" selected>2029</option>"));
        assert!(!html.contains("Simulation Results"));

        let req = Request::builder()
            .uri("/map?year=2034&stations=10890:9")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let html = body_string(resp).await;
        assert!(html.contains("<option value=\"2034\" selected>2034</option>"));
    }

    #[tokio::test]
    async fn existing_toggle_marks_chargers() {
        let req = Request::builder()
            .uri("/map?existing=on")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert_eq!(html.matches("<circle class=\"existing-charger\"").count(), 7);
        assert!(html.contains("value=\"on\" checked"));

        let req = Request::builder().uri("/map").body(Body::empty()).unwrap();
        let html = body_string(app().oneshot(req).await.unwrap()).await;
        assert!(!html.contains("existing-charger\""));
    }

    #[tokio::test]
    async fn stylesheet_has_css_content_type() {
        let req = Request::builder()
            .uri("/static/style.css")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/css")
        );
    }

    #[tokio::test]
    async fn unknown_image_is_404() {
        let req = Request::builder()
            .uri("/static/img/nope.svg")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn parse_field_treats_blank_as_absent() {
        assert_eq!(parse_field::<u16>(Some("  "), "year").ok(), Some(None));
        assert_eq!(parse_field::<u16>(Some("2029"), "year").ok(), Some(Some(2029)));
        assert!(parse_field::<u16>(Some("x"), "year").is_err());
    }
}
