//! Error types for pulseglobe

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the globe modules
pub type GlobeResult<T> = Result<T, GlobeError>;

#[derive(Error, Debug)]
pub enum GlobeError {
    /// Beacon list must carry exactly one primary beacon
    #[error("expected exactly one primary beacon, found {0}")]
    PrimaryCount(usize),

    #[error("invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    #[error("location ({lat}, {lng}) is outside latitude [-90, 90] / longitude [-180, 180]")]
    InvalidLocation { lat: f32, lng: f32 },

    #[error("beacon {index} has invalid pulse speed {speed} (must be > 0)")]
    InvalidSpeed { index: usize, speed: f32 },

    #[error("{what} is out of range: {value}")]
    InvalidValue { what: &'static str, value: f32 },

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_count_message() {
        assert_eq!(
            GlobeError::PrimaryCount(2).to_string(),
            "expected exactly one primary beacon, found 2"
        );
    }

    #[test]
    fn invalid_color_message() {
        let err = GlobeError::InvalidColor("gold".to_string());
        assert_eq!(err.to_string(), "invalid color 'gold': expected #RRGGBB");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no tty");
        let err: GlobeError = io.into();
        assert!(err.to_string().contains("no tty"));
    }
}
