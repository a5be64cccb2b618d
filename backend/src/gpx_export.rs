use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint as GpxWaypoint};

use crate::error::ExportError;
use crate::formatting::{arrival_time, format_distance, format_duration};
use crate::models::{Coordinate, Waypoint};

const CREATOR: &str = "trip_planner";

/// Encodes the route as a track and the planned samples as GPX waypoints,
/// base64 encoded. With a departure instant each waypoint carries its
/// expected arrival time in the comment.
pub fn encode_plan_as_gpx(
    path: &[Coordinate],
    waypoints: &[Waypoint],
    departure: Option<DateTime<Utc>>,
) -> Result<String, ExportError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };

    if !path.is_empty() {
        let mut track = Track {
            name: Some(CREATOR.into()),
            ..Default::default()
        };
        let mut segment = TrackSegment::new();
        segment.points.extend(path.iter().map(to_point));
        track.segments.push(segment);
        gpx.tracks.push(track);
    }

    gpx.waypoints
        .extend(waypoints.iter().map(|w| to_gpx_waypoint(w, departure)));

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn to_point(coord: &Coordinate) -> GpxWaypoint {
    GpxWaypoint::new(Point::new(coord.lon, coord.lat))
}

fn to_gpx_waypoint(waypoint: &Waypoint, departure: Option<DateTime<Utc>>) -> GpxWaypoint {
    let mut wpt = to_point(&waypoint.position);
    wpt.name = Some(format!("Stop {}", waypoint.sequence_index));
    wpt.description = Some(format!(
        "{} from start, {}",
        format_distance(waypoint.distance_from_start_km),
        format_duration(waypoint.estimated_time_min)
    ));
    wpt.comment = departure
        .and_then(|at| arrival_time(&at, waypoint.estimated_time_min))
        .map(|arrival| arrival.to_rfc3339_opts(SecondsFormat::Secs, true));
    wpt
}
