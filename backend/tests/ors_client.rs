//! `OrsDirectionsClient` against a wiremock stand-in for OpenRouteService.

use std::time::Duration;

use ecoroute::directions::{DirectionsError, DirectionsProvider, OrsDirectionsClient};
use ecoroute::models::Coordinate;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "ors-test-key-000000";

fn client(server: &MockServer) -> OrsDirectionsClient {
    OrsDirectionsClient::new(KEY, &server.uri(), "driving-car", Duration::from_secs(5))
        .expect("client construction should not fail")
}

fn waypoints() -> Vec<Coordinate> {
    vec![
        Coordinate { lat: 48.8566, lon: 2.3522 },
        Coordinate { lat: 48.8049, lon: 2.1204 },
    ]
}

#[tokio::test]
async fn parses_routes_and_converts_seconds_to_minutes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/directions/driving-car"))
        .and(header("authorization", KEY))
        .and(body_partial_json(json!({
            "coordinates": [[2.3522, 48.8566], [2.1204, 48.8049]],
            "preference": "recommended",
            "units": "km",
            "radiuses": [-1, -1]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routes": [
                {"summary": {"distance": 21.4, "duration": 1740.0}, "geometry": "abc"},
                {"summary": {"distance": 24.0, "duration": 1500.0}, "geometry": "def"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let routes = client(&server).directions(&waypoints()).await.unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].geometry, "abc");
    assert_eq!(routes[0].distance_km, 21.4);
    assert_eq!(routes[0].duration_min, 29.0);
    assert_eq!(routes[1].duration_min, 25.0);
}

#[tokio::test]
async fn missing_summary_fields_default_to_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routes": [{"summary": {}, "geometry": "x"}]
        })))
        .mount(&server)
        .await;

    let routes = client(&server).directions(&waypoints()).await.unwrap();
    assert_eq!(routes[0].distance_km, 0.0);
    assert_eq!(routes[0].duration_min, 0.0);
}

#[tokio::test]
async fn success_without_routes_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"routes": []})))
        .mount(&server)
        .await;

    let routes = client(&server).directions(&waypoints()).await.unwrap();
    assert!(routes.is_empty());
}

#[tokio::test]
async fn client_errors_are_rejections() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 2010, "message": "Could not find routable point within a radius"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).directions(&waypoints()).await.unwrap_err();
    assert!(err.is_client_rejection());
    match err {
        DirectionsError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("code 2010"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn server_errors_are_upstream_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server).directions(&waypoints()).await.unwrap_err();
    assert!(matches!(
        err,
        DirectionsError::Upstream { status: 502, ref message } if message == "Bad Gateway"
    ));
}

#[tokio::test]
async fn garbage_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).directions(&waypoints()).await.unwrap_err();
    assert!(matches!(err, DirectionsError::Decode(_)));
}
