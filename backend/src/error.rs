use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("coordinate #{index} is out of range: ({lat}, {lon})")]
    InvalidCoordinate { index: usize, lat: f64, lon: f64 },
    #[error("departure time is not a valid RFC 3339 timestamp: {0}")]
    InvalidDepartureTime(String),
    #[error("arrival {minutes} min after departure is outside the supported date range")]
    ArrivalOutOfRange { minutes: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive number, got {value:?}")]
    InvalidNumber { key: String, value: String },
    #[error("invalid bind address: {0}")]
    InvalidBindAddr(String),
}
