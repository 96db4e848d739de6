use serde::{Deserialize, Serialize};

/// What the client asks the proxy for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl WeatherQuery {
    /// Build a city query from raw user input. Returns `None` for empty or
    /// whitespace-only input.
    pub fn city(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::City(trimmed.to_string()))
        }
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self::Coordinates { lat, lon }
    }

    /// Query-string pairs for the proxy endpoint.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(city) => vec![("city", city.clone())],
            Self::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

/// Error body returned by the proxy for its own failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// The subset of the upstream current-conditions payload the client displays.
///
/// The proxy never deserializes this; it relays the upstream bytes as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherResult {
    pub name: String,
    pub sys: SysInfo,
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    pub wind: Wind,
}

impl WeatherResult {
    /// First condition entry, which is the one that gets displayed.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysInfo {
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}
