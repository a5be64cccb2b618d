use axum::{
    body::{Body, to_bytes},
    http::Request,
};
use hyper::StatusCode;
use serde_json::json;
use shared::{ApiError, SegmentResponse};
use tower::ServiceExt;
use trip_backend::{AppState, config::PlannerConfig, create_router};

fn test_app() -> axum::Router {
    create_router(AppState::new(PlannerConfig::default()))
}

fn post_segments(payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/segments")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn segments_endpoint_samples_route() {
    let app = test_app();
    let payload = json!({
        "path": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0}],
        "interval_minutes": 30.0,
        "travel_mode": "driving",
        "departure_time": "2024-06-01T08:00:00Z"
    });

    let response = app.oneshot(post_segments(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: SegmentResponse = serde_json::from_slice(&bytes).unwrap();
    let distances: Vec<f64> = body
        .waypoints
        .iter()
        .map(|w| w.distance_from_start_km)
        .collect();

    assert_eq!(distances.len(), 4);
    assert!((distances[1] - 40.0).abs() < 1e-6);
    assert!((distances[2] - 80.0).abs() < 1e-6);
    assert!((body.distance_km - 111.19).abs() < 0.01);
    assert_eq!(body.distance_label, "111 km");
    assert_eq!(body.duration_label, "1 h 23 min");
    assert_eq!(body.skipped_samples, 0);
    assert!(!body.gpx_base64.is_empty());
}

#[tokio::test]
async fn short_route_returns_endpoints() {
    let app = test_app();
    let payload = json!({
        "path": [{"lat": 45.0, "lon": 5.0}, {"lat": 45.05, "lon": 5.05}],
        "travel_mode": "cycling",
        "departure_offset_minutes": 15.0
    });

    let response = app.oneshot(post_segments(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: SegmentResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.waypoints.len(), 2);
    assert_eq!(body.waypoints[0].estimated_time_min, 15.0);
    assert!(body.waypoints[1].estimated_time_min > 15.0);
}

#[tokio::test]
async fn empty_path_is_not_an_error() {
    let app = test_app();
    let payload = json!({ "path": [] });

    let response = app.oneshot(post_segments(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: SegmentResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(body.waypoints.is_empty());
    assert_eq!(body.distance_km, 0.0);
    assert_eq!(body.duration_minutes, 0.0);
}

#[tokio::test]
async fn out_of_range_coordinate_is_rejected() {
    let app = test_app();
    let payload = json!({
        "path": [{"lat": 45.0, "lon": 5.0}, {"lat": 145.0, "lon": 5.0}]
    });

    let response = app.oneshot(post_segments(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: ApiError = serde_json::from_slice(&bytes).unwrap();
    assert!(body.message.contains("#1"));
}

#[tokio::test]
async fn bad_departure_time_is_rejected() {
    let app = test_app();
    let payload = json!({
        "path": [{"lat": 45.0, "lon": 5.0}, {"lat": 45.5, "lon": 5.0}],
        "departure_time": "next tuesday"
    });

    let response = app.oneshot(post_segments(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app();
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn huge_departure_offset_is_rejected_not_fatal() {
    let app = test_app();
    let payload = json!({
        "path": [{"lat": 45.0, "lon": 5.0}, {"lat": 45.5, "lon": 5.0}],
        "departure_offset_minutes": 1.0e15,
        "departure_time": "2024-06-01T08:00:00Z"
    });

    let response = app.oneshot(post_segments(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: ApiError = serde_json::from_slice(&bytes).unwrap();
    assert!(body.message.contains("date range"));
}

#[tokio::test]
async fn crawling_speed_arrival_is_rejected_not_fatal() {
    let app = test_app();
    // one interval covers the whole ~55 km route, but reaching its end takes
    // longer than any representable date allows
    let payload = json!({
        "path": [{"lat": 45.0, "lon": 5.0}, {"lat": 45.5, "lon": 5.0}],
        "average_speed_kmh": 1.0e-9,
        "interval_minutes": 1.0e13,
        "departure_time": "2024-06-01T08:00:00Z"
    });

    let response = app.oneshot(post_segments(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
