use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Coordinate, RawRoute};

pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_ORS_PROFILE: &str = "driving-car";

/// Source of driving routes for an ordered list of waypoints.
///
/// Implementations must:
/// - Return every route the provider produced, best first
/// - Return `Ok(vec![])` when the provider answered successfully with no route
/// - Report HTTP 4xx answers as [`DirectionsError::Rejected`] so callers can
///   treat them as "no route from this request" rather than a fault
pub trait DirectionsProvider: Send + Sync {
    fn directions(
        &self,
        waypoints: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<RawRoute>, DirectionsError>> + Send;
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("directions request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("directions request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("directions provider error ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("failed to decode directions response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("provider returned no route")]
    NoRoutes,
}

impl DirectionsError {
    pub fn is_client_rejection(&self) -> bool {
        matches!(self, DirectionsError::Rejected { .. })
    }
}

#[derive(Debug, Serialize)]
struct OrsDirectionsBody {
    coordinates: Vec<[f64; 2]>,
    preference: &'static str,
    units: &'static str,
    geometry: bool,
    radiuses: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct OrsDirectionsResponse {
    #[serde(default)]
    routes: Vec<OrsRoute>,
}

#[derive(Debug, Deserialize)]
struct OrsRoute {
    #[serde(default)]
    summary: OrsSummary,
    #[serde(default)]
    geometry: String,
}

/// ORS drops zero-valued summary fields, e.g. for a start equal to the end.
#[derive(Debug, Default, Deserialize)]
struct OrsSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OrsErrorPayload {
    error: OrsErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OrsErrorDetail {
    #[serde(default)]
    code: Option<u32>,
    message: String,
}

/// OpenRouteService directions client.
pub struct OrsDirectionsClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OrsDirectionsClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        profile: &str,
        timeout: Duration,
    ) -> Result<Self, DirectionsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_key, base_url, profile))
    }

    pub fn with_client(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: &str,
        profile: &str,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: format!("{}/v2/directions/{}", base_url.trim_end_matches('/'), profile),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// ORS expects `[lon, lat]` pairs and one snapping radius per waypoint.
fn request_body(waypoints: &[Coordinate]) -> OrsDirectionsBody {
    OrsDirectionsBody {
        coordinates: waypoints.iter().map(|c| [c.lon, c.lat]).collect(),
        preference: "recommended",
        units: "km",
        geometry: true,
        radiuses: vec![-1; waypoints.len()],
    }
}

fn error_message(text: &str) -> String {
    match serde_json::from_str::<OrsErrorPayload>(text) {
        Ok(OrsErrorPayload {
            error: OrsErrorDetail {
                code: Some(code),
                message,
            },
        }) => format!("{message} (code {code})"),
        Ok(payload) => payload.error.message,
        Err(_) => text.to_string(),
    }
}

impl DirectionsProvider for OrsDirectionsClient {
    async fn directions(&self, waypoints: &[Coordinate]) -> Result<Vec<RawRoute>, DirectionsError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .json(&request_body(waypoints))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_client_error() {
            return Err(DirectionsError::Rejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        if !status.is_success() {
            return Err(DirectionsError::Upstream {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: OrsDirectionsResponse = serde_json::from_str(&text)?;
        tracing::debug!(
            "ORS returned {} route(s) for {} waypoints",
            parsed.routes.len(),
            waypoints.len()
        );

        Ok(parsed
            .routes
            .into_iter()
            .map(|route| RawRoute {
                geometry: route.geometry,
                distance_km: route.summary.distance,
                duration_min: route.summary.duration / 60.0,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_uses_lon_lat_order_and_unlimited_radiuses() {
        let body = request_body(&[
            Coordinate { lat: 52.52, lon: 13.405 },
            Coordinate { lat: 52.3906, lon: 13.0645 },
        ]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["coordinates"][0][0], 13.405);
        assert_eq!(json["coordinates"][0][1], 52.52);
        assert_eq!(json["radiuses"], serde_json::json!([-1, -1]));
        assert_eq!(json["units"], "km");
        assert_eq!(json["geometry"], true);
    }

    #[test]
    fn structured_error_payload_is_unwrapped() {
        let text = r#"{"error":{"code":2004,"message":"Request parameters exceed the server configuration limits."}}"#;
        assert_eq!(
            error_message(text),
            "Request parameters exceed the server configuration limits. (code 2004)"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn endpoint_is_built_from_base_and_profile() {
        let client = OrsDirectionsClient::with_client(
            reqwest::Client::new(),
            "key",
            "http://localhost:9999/",
            DEFAULT_ORS_PROFILE,
        );
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v2/directions/driving-car"
        );
    }

    #[test]
    fn only_rejections_are_client_errors() {
        let rejected = DirectionsError::Rejected {
            status: 400,
            message: String::new(),
        };
        assert!(rejected.is_client_rejection());
        assert!(!DirectionsError::NoRoutes.is_client_rejection());
    }
}
