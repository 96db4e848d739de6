use async_trait::async_trait;
use chrono::Utc;
use weather_core::{GeolocationError, Geolocator, LocationConfig, Position, PositionOptions};

/// Reports the location stored in the config file.
#[derive(Debug, Clone)]
pub struct ConfiguredGeolocator {
    location: LocationConfig,
}

impl ConfiguredGeolocator {
    pub fn new(location: LocationConfig) -> Self {
        Self { location }
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, GeolocationError> {
        if !self.location.allow {
            return Err(GeolocationError::PermissionDenied);
        }

        let (lat, lon) = (self.location.latitude, self.location.longitude);
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            tracing::warn!("Configured location {}, {} is out of range", lat, lon);
            return Err(GeolocationError::PositionUnavailable);
        }

        tracing::debug!(
            "Using configured location (high accuracy requested: {})",
            options.enable_high_accuracy
        );
        Ok(Position {
            latitude: lat,
            longitude: lon,
            accuracy_meters: None,
            timestamp: Utc::now(),
        })
    }
}
