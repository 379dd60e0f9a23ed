//! Device geolocation capability
//!
//! The platform position source is an injectable trait so the controller and
//! tests never depend on real hardware. A position request is bounded by its
//! own timeout, distinct from the weather-request timeout.

use crate::config::GeolocationConfig;
use crate::{Result, SkycastError};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::debug;

/// A device position fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters, when the source reports one
    pub accuracy: Option<f64>,
    /// Fix timestamp (epoch millis)
    pub timestamp: i64,
}

/// Capability that yields device coordinates or fails with one of the
/// geolocation error classes.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position>;
}

/// Fixed-coordinate source configured at deploy time; stands in for platform
/// positioning on devices without one. Unconfigured coordinates report the
/// capability as unavailable.
pub struct StaticGeolocator {
    coordinates: Option<(f64, f64)>,
}

impl StaticGeolocator {
    #[must_use]
    pub fn from_config(config: &GeolocationConfig) -> Self {
        let coordinates = match (config.latitude, config.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        Self { coordinates }
    }
}

#[async_trait]
impl Geolocator for StaticGeolocator {
    async fn current_position(&self) -> Result<Position> {
        match self.coordinates {
            Some((latitude, longitude)) => Ok(Position {
                latitude,
                longitude,
                accuracy: None,
                timestamp: Utc::now().timestamp_millis(),
            }),
            None => Err(SkycastError::GeolocationUnavailable),
        }
    }
}

/// Request a position, bounding the wait.
///
/// Elapsed quiet maps to [`SkycastError::GeolocationTimeout`]; only this
/// request is aborted, nothing else.
pub async fn locate(geolocator: &dyn Geolocator, timeout: Duration) -> Result<Position> {
    match tokio::time::timeout(timeout, geolocator.current_position()).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Geolocation did not answer within {:?}", timeout);
            Err(SkycastError::GeolocationTimeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StalledGeolocator;

    #[async_trait]
    impl Geolocator for StalledGeolocator {
        async fn current_position(&self) -> Result<Position> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(SkycastError::GeolocationUnavailable)
        }
    }

    struct DeniedGeolocator;

    #[async_trait]
    impl Geolocator for DeniedGeolocator {
        async fn current_position(&self) -> Result<Position> {
            Err(SkycastError::GeolocationDenied)
        }
    }

    #[tokio::test]
    async fn test_static_geolocator_yields_configured_fix() {
        let config = GeolocationConfig {
            latitude: Some(46.8182),
            longitude: Some(8.2275),
            ..GeolocationConfig::default()
        };
        let geolocator = StaticGeolocator::from_config(&config);
        let position = geolocator.current_position().await.expect("position");
        assert_eq!(position.latitude, 46.8182);
        assert_eq!(position.longitude, 8.2275);
    }

    #[tokio::test]
    async fn test_unconfigured_static_geolocator_is_unavailable() {
        let geolocator = StaticGeolocator::from_config(&GeolocationConfig::default());
        let err = geolocator.current_position().await.unwrap_err();
        assert_eq!(err, SkycastError::GeolocationUnavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_source_times_out() {
        let err = locate(&StalledGeolocator, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert_eq!(err, SkycastError::GeolocationTimeout);
    }

    #[tokio::test]
    async fn test_denial_passes_through_unchanged() {
        let err = locate(&DeniedGeolocator, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert_eq!(err, SkycastError::GeolocationDenied);
    }
}
