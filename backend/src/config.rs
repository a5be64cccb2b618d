//! Planner configuration from defaults and environment.

use std::{
    env,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
};

use crate::{error::ConfigError, models::TravelMode};

pub const DEFAULT_INTERVAL_MINUTES: f64 = 30.0;
pub const DEFAULT_SPEED_KMH: f64 = 80.0;
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedTable {
    pub driving_kmh: f64,
    pub cycling_kmh: f64,
    pub walking_kmh: f64,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            driving_kmh: 80.0,
            cycling_kmh: 15.0,
            walking_kmh: 5.0,
        }
    }
}

impl SpeedTable {
    pub fn speed_for(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Driving => self.driving_kmh,
            TravelMode::Cycling => self.cycling_kmh,
            TravelMode::Walking => self.walking_kmh,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Used when a caller passes a non-positive interval.
    pub default_interval_minutes: f64,
    /// Used when a caller passes a non-positive speed and no mode.
    pub default_speed_kmh: f64,
    pub speeds: SpeedTable,
    pub bind_addr: SocketAddr,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_interval_minutes: DEFAULT_INTERVAL_MINUTES,
            default_speed_kmh: DEFAULT_SPEED_KMH,
            speeds: SpeedTable::default(),
            bind_addr: DEFAULT_BIND_ADDR,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let positive = |key: &str, fallback: f64| -> Result<f64, ConfigError> {
            match lookup(key) {
                Some(raw) => parse_positive(key, &raw),
                None => Ok(fallback),
            }
        };

        let bind_addr = match lookup("TRIP_BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr(raw.clone()))?,
            None => defaults.bind_addr,
        };

        Ok(Self {
            default_interval_minutes: positive(
                "TRIP_DEFAULT_INTERVAL_MIN",
                defaults.default_interval_minutes,
            )?,
            default_speed_kmh: positive("TRIP_DEFAULT_SPEED_KMH", defaults.default_speed_kmh)?,
            speeds: SpeedTable {
                driving_kmh: positive("TRIP_SPEED_DRIVING_KMH", defaults.speeds.driving_kmh)?,
                cycling_kmh: positive("TRIP_SPEED_CYCLING_KMH", defaults.speeds.cycling_kmh)?,
                walking_kmh: positive("TRIP_SPEED_WALKING_KMH", defaults.speeds.walking_kmh)?,
            },
            bind_addr,
        })
    }

    pub fn speed_for(&self, mode: TravelMode) -> f64 {
        self.speeds.speed_for(mode)
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
