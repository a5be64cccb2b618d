use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// `"850 m"`, `"12.3 km"` or `"123 km"`.
pub fn format_distance(km: f64) -> String {
    let km = if km.is_finite() { km.max(0.0) } else { 0.0 };
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 100.0 {
        format!("{km:.1} km")
    } else {
        format!("{km:.0} km")
    }
}

/// `"45 min"`, `"1 h 05 min"` or `"2 h"`.
pub fn format_duration(minutes: f64) -> String {
    let total = if minutes.is_finite() {
        minutes.max(0.0).round() as u64
    } else {
        0
    };
    let (hours, mins) = (total / 60, total % 60);
    match (hours, mins) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m:02} min"),
    }
}

/// Absolute instant reached `offset_minutes` after `departure`.
///
/// Sub-second parts of the offset are kept. `None` when the offset is not
/// finite or the result falls outside the representable date range.
pub fn arrival_time<Tz: TimeZone>(
    departure: &DateTime<Tz>,
    offset_minutes: f64,
) -> Option<DateTime<Utc>> {
    let millis = (offset_minutes * 60_000.0).round();
    if !(i64::MIN as f64..i64::MAX as f64).contains(&millis) {
        return None;
    }
    let delta = TimeDelta::try_milliseconds(millis as i64)?;
    departure.with_timezone(&Utc).checked_add_signed(delta)
}

/// `"HH:MM"` wall-clock time in the departure's own time zone.
pub fn format_time_of_day<Tz: TimeZone>(
    departure: &DateTime<Tz>,
    offset_minutes: f64,
) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    arrival_time(departure, offset_minutes).map(|at| {
        at.with_timezone(&departure.timezone())
            .format("%H:%M")
            .to_string()
    })
}
