//! Client-side error types.

use thiserror::Error;

use crate::geolocation::GeolocationError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("empty city name")]
    EmptyCity,

    #[error("geolocation is not available")]
    GeolocationUnsupported,

    #[error("geolocation failed: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("proxy responded with status {status}")]
    Api {
        status: u16,
        detail: Option<String>,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected weather payload: {0}")]
    MalformedPayload(String),

    #[error("invalid proxy URL: {0}")]
    InvalidProxyUrl(String),
}

impl ClientError {
    /// Message shown in the error element.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCity => "Please enter a city name".to_string(),
            Self::GeolocationUnsupported => {
                "Geolocation is not supported on this device".to_string()
            }
            Self::Geolocation(err) => format!("Failed to get location: {}", err.reason()),
            Self::Api { .. } => "City not found or API error".to_string(),
            Self::Network(_) | Self::InvalidProxyUrl(_) => {
                "Failed to fetch weather data".to_string()
            }
            Self::MalformedPayload(_) => "Unexpected weather data received".to_string(),
        }
    }
}
