//! Core library for the weather lookup client.
//!
//! This crate defines:
//! - The query and payload model shared with the proxy
//! - The view state machine and its display elements
//! - A client for the weather proxy and a geolocation seam
//! - Client configuration handling
//!
//! It is used by `weather-cli` and, for the shared model, by `weather-proxy`.

pub mod app;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod proxy_client;
pub mod session;
pub mod view;

pub use app::{Renderer, WeatherApp};
pub use config::{Config, LocationConfig};
pub use error::ClientError;
pub use geolocation::{
    CachedGeolocator, GeolocationError, Geolocator, Position, PositionOptions,
};
pub use model::{ErrorBody, WeatherQuery, WeatherResult};
pub use proxy_client::ProxyClient;
pub use session::{Ticket, WeatherSession};
pub use view::{UiState, ViewHandles, WeatherDisplay};
