use crate::{
    config::{DEFAULT_INTERVAL_MINUTES, DEFAULT_SPEED_KMH, PlannerConfig},
    geometry::{PolylineWalker, total_length_km},
    models::{Coordinate, TravelMode, Waypoint},
};

/// Upper bound on emitted samples. Finer intervals are widened to fit.
pub const MAX_WAYPOINTS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationParameters {
    pub interval_minutes: f64,
    pub average_speed_kmh: f64,
    pub departure_offset_minutes: f64,
}

impl SegmentationParameters {
    pub fn new(interval_minutes: f64, average_speed_kmh: f64, departure_offset_minutes: f64) -> Self {
        Self {
            interval_minutes,
            average_speed_kmh,
            departure_offset_minutes,
        }
    }

    /// Parameters with the average speed looked up from the travel mode.
    pub fn for_mode(
        mode: TravelMode,
        interval_minutes: f64,
        departure_offset_minutes: f64,
        config: &PlannerConfig,
    ) -> Self {
        Self::new(interval_minutes, config.speed_for(mode), departure_offset_minutes)
    }

    /// Kilometers covered during one interval.
    pub fn distance_per_interval_km(&self) -> f64 {
        self.average_speed_kmh * (self.interval_minutes / 60.0)
    }

    /// Minutes after the departure reference at which `distance_km` is reached.
    pub fn time_at(&self, distance_km: f64) -> f64 {
        self.departure_offset_minutes + distance_km / self.average_speed_kmh * 60.0
    }
}

/// Source of interpolated points for increasing distances along a route.
pub trait PointLocator {
    fn locate(&mut self, distance_km: f64) -> Option<Coordinate>;
}

impl PointLocator for PolylineWalker<'_> {
    fn locate(&mut self, distance_km: f64) -> Option<Coordinate> {
        self.advance_to(distance_km)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The locator produced no point.
    Unlocated,
    /// The locator produced a non-finite coordinate.
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedSample {
    pub distance_km: f64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NonFiniteLength,
}

/// What a plan had to drop or degrade. Never changes the shape of the
/// returned waypoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanDiagnostics {
    pub skipped: Vec<SkippedSample>,
    pub fallback: Option<FallbackReason>,
    /// Spacing actually used when the requested one would exceed
    /// `MAX_WAYPOINTS`.
    pub widened_step_km: Option<f64>,
}

impl PlanDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.fallback.is_none() && self.widened_step_km.is_none()
    }
}

/// Splits a route into samples evenly spaced in travel time.
///
/// Planning never fails: degenerate routes give an empty list, bad
/// parameters are replaced by the configured defaults and interior points
/// that cannot be located are dropped. A route with at least two points
/// always yields its start and end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPlanner {
    default_interval_minutes: f64,
    default_speed_kmh: f64,
}

impl Default for SegmentPlanner {
    fn default() -> Self {
        Self {
            default_interval_minutes: DEFAULT_INTERVAL_MINUTES,
            default_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl SegmentPlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            default_interval_minutes: config.default_interval_minutes,
            default_speed_kmh: config.default_speed_kmh,
        }
    }

    /// Replaces unusable parameters with defaults.
    pub fn sanitize(&self, params: &SegmentationParameters) -> SegmentationParameters {
        let positive_or = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        SegmentationParameters {
            interval_minutes: positive_or(params.interval_minutes, self.default_interval_minutes),
            average_speed_kmh: positive_or(params.average_speed_kmh, self.default_speed_kmh),
            departure_offset_minutes: if params.departure_offset_minutes.is_finite() {
                params.departure_offset_minutes.max(0.0)
            } else {
                0.0
            },
        }
    }

    pub fn plan(&self, path: &[Coordinate], params: &SegmentationParameters) -> Vec<Waypoint> {
        self.plan_with_diagnostics(path, params).0
    }

    pub fn plan_with_diagnostics(
        &self,
        path: &[Coordinate],
        params: &SegmentationParameters,
    ) -> (Vec<Waypoint>, PlanDiagnostics) {
        self.plan_with_locator(path, params, PolylineWalker::new(path))
    }

    /// Plans using `locator` for interior samples. Endpoints always come
    /// straight from `path`.
    pub fn plan_with_locator<L: PointLocator>(
        &self,
        path: &[Coordinate],
        params: &SegmentationParameters,
        mut locator: L,
    ) -> (Vec<Waypoint>, PlanDiagnostics) {
        let mut diagnostics = PlanDiagnostics::default();
        let (Some(&start), Some(&end)) = (path.first(), path.last()) else {
            return (Vec::new(), diagnostics);
        };
        if path.len() < 2 {
            return (Vec::new(), diagnostics);
        }

        let params = self.sanitize(params);
        let total_km = total_length_km(path);
        let mut step_km = params.distance_per_interval_km();

        if !total_km.is_finite() {
            tracing::warn!("route length is not finite, keeping only endpoints");
            diagnostics.fallback = Some(FallbackReason::NonFiniteLength);
            return (endpoints_only(start, end, &params), diagnostics);
        }

        let start_wp = Waypoint {
            position: start,
            distance_from_start_km: 0.0,
            estimated_time_min: params.departure_offset_minutes,
            sequence_index: 0,
        };

        if total_km <= step_km {
            let end_wp = Waypoint {
                position: end,
                distance_from_start_km: total_km,
                estimated_time_min: params.time_at(total_km),
                sequence_index: 1,
            };
            return (vec![start_wp, end_wp], diagnostics);
        }

        if total_km / step_km > MAX_WAYPOINTS as f64 {
            let widened = total_km / MAX_WAYPOINTS as f64;
            tracing::warn!(
                "{:.0} samples requested for {:.1} km at {:.3} km per interval, widening to {:.3} km",
                (total_km / step_km).ceil(),
                total_km,
                step_km,
                widened
            );
            step_km = widened;
            diagnostics.widened_step_km = Some(widened);
        }

        let expected = (total_km / step_km).ceil() as usize;
        let mut waypoints = Vec::with_capacity(expected + 1);
        waypoints.push(start_wp);

        let mut steps = 0usize;
        while (steps as f64) * step_km < total_km - step_km {
            steps += 1;
            let cursor_km = steps as f64 * step_km;

            let position = match locator.locate(cursor_km) {
                Some(p) if p.lat.is_finite() && p.lon.is_finite() => p,
                Some(_) => {
                    tracing::debug!("skipping non-finite sample at {:.3} km", cursor_km);
                    diagnostics.skipped.push(SkippedSample {
                        distance_km: cursor_km,
                        reason: SkipReason::NonFinite,
                    });
                    continue;
                }
                None => {
                    tracing::debug!("skipping unlocated sample at {:.3} km", cursor_km);
                    diagnostics.skipped.push(SkippedSample {
                        distance_km: cursor_km,
                        reason: SkipReason::Unlocated,
                    });
                    continue;
                }
            };

            waypoints.push(Waypoint {
                position,
                distance_from_start_km: cursor_km,
                estimated_time_min: params.time_at(cursor_km),
                sequence_index: waypoints.len(),
            });
        }

        waypoints.push(Waypoint {
            position: end,
            distance_from_start_km: total_km,
            estimated_time_min: params.time_at(total_km),
            sequence_index: waypoints.len(),
        });

        tracing::debug!(
            "planned {} waypoints over {:.1} km ({} skipped)",
            waypoints.len(),
            total_km,
            diagnostics.skipped.len()
        );

        (waypoints, diagnostics)
    }
}

fn endpoints_only(
    start: Coordinate,
    end: Coordinate,
    params: &SegmentationParameters,
) -> Vec<Waypoint> {
    [start, end]
        .into_iter()
        .enumerate()
        .map(|(sequence_index, position)| Waypoint {
            position,
            distance_from_start_km: 0.0,
            estimated_time_min: params.departure_offset_minutes,
            sequence_index,
        })
        .collect()
}

/// Samples `path` every `interval_minutes` of travel at `average_speed_kmh`,
/// using the built-in defaults for unusable parameters.
pub fn plan_segments(
    path: &[Coordinate],
    interval_minutes: f64,
    average_speed_kmh: f64,
    departure_offset_minutes: f64,
) -> Vec<Waypoint> {
    SegmentPlanner::default().plan(
        path,
        &SegmentationParameters::new(interval_minutes, average_speed_kmh, departure_offset_minutes),
    )
}
