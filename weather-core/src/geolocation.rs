//! Device position lookup.
//!
//! The client only needs a one-shot "where am I" call. Platforms plug in via
//! [`Geolocator`]; [`CachedGeolocator`] layers the request options (timeout and
//! maximum position age) on top of any of them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{fmt::Debug, time::Duration};
use thiserror::Error;
use tokio::sync::Mutex;

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// A previously obtained position younger than this may be reused.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(10_000),
            maximum_age: Duration::from_millis(60_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
            timestamp: Utc::now(),
        }
    }

    /// Whether this position may still be served for a request allowing `maximum_age`.
    pub fn is_fresh(&self, maximum_age: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.timestamp);
        match chrono::Duration::from_std(maximum_age) {
            Ok(max) => age >= chrono::Duration::zero() && age < max,
            Err(_) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

impl GeolocationError {
    /// Human-readable reason. Timeouts fall into the generic bucket.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location access denied",
            Self::PositionUnavailable => "Location unavailable",
            Self::Timeout | Self::Other(_) => "Unknown error",
        }
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, GeolocationError>;
}

/// Applies [`PositionOptions::timeout`] and [`PositionOptions::maximum_age`]
/// around another geolocator.
#[derive(Debug)]
pub struct CachedGeolocator<G> {
    inner: G,
    last: Mutex<Option<Position>>,
}

impl<G: Geolocator> CachedGeolocator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<G: Geolocator> Geolocator for CachedGeolocator<G> {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, GeolocationError> {
        let cached = self.last.lock().await.clone();
        if let Some(position) = cached {
            if position.is_fresh(options.maximum_age, Utc::now()) {
                tracing::debug!("Reusing cached position from {}", position.timestamp);
                return Ok(position);
            }
        }

        let position = tokio::time::timeout(options.timeout, self.inner.current_position(options))
            .await
            .map_err(|_| GeolocationError::Timeout)??;

        *self.last.lock().await = Some(position.clone());
        Ok(position)
    }
}
