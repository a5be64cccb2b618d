// Handlers for the segment planning API

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};

use crate::{
    AppState,
    error::{ExportError, RequestError},
    formatting::{arrival_time, format_distance, format_duration},
    geometry::total_length_km,
    gpx_export::encode_plan_as_gpx,
    models::{ApiError, SegmentRequest, SegmentResponse, Waypoint},
    segments::SegmentationParameters,
};

/// POST /api/segments - Sample a route at even travel-time intervals
pub async fn plan_segments_handler(
    State(state): State<AppState>,
    Json(req): Json<SegmentRequest>,
) -> Result<Json<SegmentResponse>, (StatusCode, Json<ApiError>)> {
    validate_path(&req).map_err(request_error_to_api_error)?;
    let departure = parse_departure(req.departure_time.as_deref())
        .map_err(request_error_to_api_error)?;

    let params = state.planner.sanitize(&resolve_parameters(&state, &req));
    tracing::info!(
        "Segment request: {} points, every {} min at {} km/h, offset {} min",
        req.path.len(),
        params.interval_minutes,
        params.average_speed_kmh,
        params.departure_offset_minutes
    );

    let (waypoints, diagnostics) = state.planner.plan_with_diagnostics(&req.path, &params);
    if let Some(reason) = diagnostics.fallback {
        tracing::warn!("Plan degraded to endpoints: {:?}", reason);
    }
    check_arrivals(departure, &waypoints).map_err(request_error_to_api_error)?;

    let distance_km = total_length_km(&req.path);
    let duration_minutes = if waypoints.is_empty() {
        0.0
    } else {
        params.time_at(distance_km) - params.departure_offset_minutes
    };
    let gpx_base64 =
        encode_plan_as_gpx(&req.path, &waypoints, Some(departure)).map_err(export_error_to_api_error)?;

    tracing::info!(
        "Planned {} waypoints over {:.1} km",
        waypoints.len(),
        distance_km
    );

    Ok(Json(SegmentResponse {
        distance_label: format_distance(distance_km),
        duration_label: format_duration(duration_minutes),
        waypoints,
        distance_km,
        duration_minutes,
        skipped_samples: diagnostics.skipped.len(),
        gpx_base64,
    }))
}

/// GET /api/health
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Interval falls back to the configured default, speed prefers an explicit
/// value over the travel mode lookup.
fn resolve_parameters(state: &AppState, req: &SegmentRequest) -> SegmentationParameters {
    let interval = req
        .interval_minutes
        .unwrap_or(state.config.default_interval_minutes);
    let speed = req
        .average_speed_kmh
        .or_else(|| req.travel_mode.map(|mode| state.config.speed_for(mode)))
        .unwrap_or(state.config.default_speed_kmh);
    SegmentationParameters::new(interval, speed, req.departure_offset_minutes)
}

fn validate_path(req: &SegmentRequest) -> Result<(), RequestError> {
    match req.path.iter().position(|coord| !coord.is_valid()) {
        Some(index) => Err(RequestError::InvalidCoordinate {
            index,
            lat: req.path[index].lat,
            lon: req.path[index].lon,
        }),
        None => Ok(()),
    }
}

/// Times never decrease along a plan, so checking the last one covers all.
fn check_arrivals(departure: DateTime<Utc>, waypoints: &[Waypoint]) -> Result<(), RequestError> {
    match waypoints.last() {
        Some(last) if arrival_time(&departure, last.estimated_time_min).is_none() => {
            Err(RequestError::ArrivalOutOfRange {
                minutes: last.estimated_time_min,
            })
        }
        _ => Ok(()),
    }
}

fn parse_departure(raw: Option<&str>) -> Result<DateTime<Utc>, RequestError> {
    match raw {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|_| RequestError::InvalidDepartureTime(raw.to_string())),
        None => Ok(Utc::now()),
    }
}

fn request_error_to_api_error(err: RequestError) -> (StatusCode, Json<ApiError>) {
    tracing::debug!("Rejected segment request: {}", err);
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}

fn export_error_to_api_error(err: ExportError) -> (StatusCode, Json<ApiError>) {
    tracing::error!("GPX export failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
