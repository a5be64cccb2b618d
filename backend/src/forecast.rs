use std::{future::Future, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;

use crate::{
    formatting::arrival_time,
    models::{Coordinate, Waypoint},
};

#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("weather provider error: {0}")]
    Provider(String),
}

/// Weather source queried once per planned waypoint.
///
/// Implementations own their HTTP client, caching and retries. Each call is
/// independent, so lookups for one plan may run in any order.
pub trait WeatherLookup: Send + Sync + 'static {
    type Record: Send + 'static;

    fn forecast(
        &self,
        position: Coordinate,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Self::Record, ForecastError>> + Send;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaypointForecast<R> {
    pub waypoint: Waypoint,
    /// `None` when the arrival falls outside the representable date range.
    pub arrival: Option<DateTime<Utc>>,
    /// `None` when the lookup failed or was never made.
    pub forecast: Option<R>,
}

/// Runs one lookup per waypoint concurrently and returns results in waypoint
/// order. A failing or panicking lookup leaves its slot empty, and so does a
/// waypoint whose arrival cannot be expressed as a timestamp.
pub async fn collect_forecasts<L: WeatherLookup>(
    lookup: Arc<L>,
    waypoints: &[Waypoint],
    departure: DateTime<Utc>,
) -> Vec<WaypointForecast<L::Record>> {
    let mut results: Vec<WaypointForecast<L::Record>> = waypoints
        .iter()
        .map(|w| WaypointForecast {
            waypoint: *w,
            arrival: arrival_time(&departure, w.estimated_time_min),
            forecast: None,
        })
        .collect();

    let mut tasks = JoinSet::new();
    for (slot, entry) in results.iter().enumerate() {
        let Some(at) = entry.arrival else {
            tracing::warn!(
                "skipping forecast for waypoint {}: arrival {:.0} min after departure is out of range",
                slot,
                entry.waypoint.estimated_time_min
            );
            continue;
        };
        let lookup = Arc::clone(&lookup);
        let position = entry.waypoint.position;
        tasks.spawn(async move { (slot, lookup.forecast(position, at).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((slot, Ok(record))) => results[slot].forecast = Some(record),
            Ok((slot, Err(err))) => {
                tracing::warn!("forecast for waypoint {} failed: {}", slot, err);
            }
            Err(err) => tracing::error!("forecast task aborted: {}", err),
        }
    }

    let missing = results.iter().filter(|r| r.forecast.is_none()).count();
    tracing::debug!(
        "collected {} forecasts ({} missing)",
        results.len() - missing,
        missing
    );
    results
}
