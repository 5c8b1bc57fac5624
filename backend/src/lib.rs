pub mod acquisition;
pub mod config;
pub mod directions;
pub mod emissions;
pub mod error;
pub mod fallback;
pub mod geocode;
pub mod models;
pub mod ranking;
pub mod search;
pub mod selection;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::directions::{DirectionsError, OrsDirectionsClient};
use crate::geocode::{GeocodeError, GeocodeOverrides, Geocoder};
use crate::models::{ApiError, GeocodeResult, RankedRoute, RouteSearchRequest};
use crate::search::{RouteSearch, require_endpoints};

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<RouteSearch<OrsDirectionsClient>>,
    pub geocoder: Arc<Geocoder>,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Directions(#[from] DirectionsError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

impl AppState {
    pub fn new(search: RouteSearch<OrsDirectionsClient>, geocoder: Geocoder) -> Self {
        Self {
            search: Arc::new(search),
            geocoder: Arc::new(geocoder),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let search = match config.ors.usable_key() {
            Some(key) => RouteSearch::live(OrsDirectionsClient::new(
                key,
                &config.ors.base_url,
                &config.ors.profile,
                config.http_timeout,
            )?),
            None => {
                tracing::warn!("ORS_API_KEY missing or too short, route search runs in demo mode");
                RouteSearch::demo(config.demo_delay)
            }
        };

        let overrides = match &config.geocode_overrides_path {
            Some(path) => {
                let overrides = GeocodeOverrides::from_path(path)?;
                tracing::info!(
                    "loaded {} geocode override(s) from {}",
                    overrides.len(),
                    path.display()
                );
                overrides
            }
            None => GeocodeOverrides::default(),
        };
        let geocoder = Geocoder::new(&config.geocoder, overrides)?;

        Ok(Self::new(search, geocoder))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/routes", post(routes_handler))
        .route("/api/geocode", get(geocode_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

async fn routes_handler(
    State(state): State<AppState>,
    Json(req): Json<RouteSearchRequest>,
) -> Result<Json<Vec<RankedRoute>>, (StatusCode, Json<ApiError>)> {
    let (start, end) = require_endpoints(&req).map_err(|err| {
        tracing::debug!("rejecting route search: {err}");
        api_error(StatusCode::BAD_REQUEST, "Start and End locations are required")
    })?;
    let vehicle = req.vehicle_class();
    tracing::info!(
        "route search {:?} -> {:?} for {}",
        start,
        end,
        vehicle.as_str()
    );

    let routes = state.search.search_or_fallback(start, end, vehicle).await;
    Ok(Json(routes))
}

#[derive(Debug, Deserialize)]
struct GeocodeParams {
    q: Option<String>,
}

async fn geocode_handler(
    State(state): State<AppState>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<Vec<GeocodeResult>>, (StatusCode, Json<ApiError>)> {
    let query = params.q.unwrap_or_default();
    state
        .geocoder
        .search(&query)
        .await
        .map(Json)
        .map_err(geocode_error_to_api_error)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mode: String,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mode = if state.search.is_live() { "live" } else { "demo" };
    Json(HealthResponse {
        status: "ok".into(),
        mode: mode.into(),
    })
}

fn geocode_error_to_api_error(err: GeocodeError) -> (StatusCode, Json<ApiError>) {
    match err {
        GeocodeError::EmptyQuery => {
            api_error(StatusCode::BAD_REQUEST, "Query parameter \"q\" is required")
        }
        other => {
            tracing::error!("geocoding error: {other}");
            api_error(StatusCode::BAD_GATEWAY, "Failed to fetch location data")
        }
    }
}

fn api_error(status: StatusCode, message: &str) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            message: message.to_string(),
        }),
    )
}
