use crate::models::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Total length of a polyline in kilometers. Zero below two points.
pub fn total_length_km(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Point reached after travelling `distance_km` along `path`.
///
/// The distance is clamped to `[0, total_length_km(path)]`, so slight floating
/// point overshoot lands on the last vertex. Interpolation is linear in
/// lat/lon within a segment, which is fine at road-trip scale.
///
/// Returns `None` for an empty path or a non-finite distance.
pub fn point_at_distance(path: &[Coordinate], distance_km: f64) -> Option<Coordinate> {
    PolylineWalker::new(path).advance_to(distance_km)
}

/// Forward-only cursor over a polyline.
///
/// Keeps the current segment and the distance accumulated before it, so a
/// non-decreasing series of queries walks the path once in total.
#[derive(Debug, Clone)]
pub struct PolylineWalker<'a> {
    path: &'a [Coordinate],
    segment: usize,
    /// Distance from the start to `path[segment]`.
    walked_km: f64,
}

impl<'a> PolylineWalker<'a> {
    pub fn new(path: &'a [Coordinate]) -> Self {
        Self {
            path,
            segment: 0,
            walked_km: 0.0,
        }
    }

    /// Moves the cursor to `distance_km` and returns the point there.
    ///
    /// Queries behind the cursor restart the walk from the first vertex.
    pub fn advance_to(&mut self, distance_km: f64) -> Option<Coordinate> {
        let first = *self.path.first()?;
        if !distance_km.is_finite() {
            return None;
        }
        if distance_km <= 0.0 || self.path.len() < 2 {
            return Some(first);
        }
        if distance_km < self.walked_km {
            self.segment = 0;
            self.walked_km = 0.0;
        }

        while self.segment + 1 < self.path.len() {
            let a = self.path[self.segment];
            let b = self.path[self.segment + 1];
            let seg_len = haversine_km(a, b);

            if self.walked_km + seg_len >= distance_km {
                if seg_len <= f64::EPSILON {
                    return Some(b);
                }
                let t = ((distance_km - self.walked_km) / seg_len).clamp(0.0, 1.0);
                return Some(a.interpolate(b, t));
            }

            self.walked_km += seg_len;
            self.segment += 1;
        }

        // Past the end: stay parked on the last segment so later queries are cheap.
        self.segment = self.segment.saturating_sub(1);
        if let Some(last_len) = self
            .path
            .get(self.segment)
            .zip(self.path.get(self.segment + 1))
            .map(|(a, b)| haversine_km(*a, *b))
        {
            self.walked_km -= last_len;
        }
        self.path.last().copied()
    }
}
