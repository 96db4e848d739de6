//! Display elements and the Idle / Loading / Error / Result state machine.

use crate::{error::ClientError, model::WeatherResult};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Loading,
    Error,
    Result,
}

/// A text element that can be hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextElement {
    pub text: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageElement {
    pub src: String,
    pub alt: String,
}

/// The result panel. Its fields are blanked whenever the panel is hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherPanel {
    pub hidden: bool,
    pub city_name: String,
    pub icon: ImageElement,
    pub temperature: String,
    pub description: String,
    pub wind_speed: String,
    pub humidity: String,
}

/// Formatted display values for one weather payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherDisplay {
    pub city_name: String,
    pub icon_src: String,
    pub icon_alt: String,
    pub temperature: String,
    pub description: String,
    pub wind_speed: String,
    pub humidity: String,
}

impl WeatherDisplay {
    pub fn from_result(result: &WeatherResult) -> Result<Self, ClientError> {
        let condition = result.primary_condition().ok_or_else(|| {
            ClientError::MalformedPayload("no condition entries".to_string())
        })?;

        Ok(Self {
            city_name: format!("{}, {}", result.name, result.sys.country),
            icon_src: icon_url(&condition.icon),
            icon_alt: condition.description.clone(),
            temperature: format!("{}°C", round_half_up(result.main.temp)),
            description: condition.description.clone(),
            wind_speed: format!("{} m/s", result.wind.speed),
            humidity: format!("{}%", result.main.humidity),
        })
    }
}

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

/// Nearest integer, ties toward positive infinity (-2.5 -> -2, 2.5 -> 3).
fn round_half_up(value: f64) -> i64 {
    let rounded = value.round();
    // `round` breaks negative ties away from zero.
    if value - rounded == 0.5 {
        (rounded + 1.0) as i64
    } else {
        rounded as i64
    }
}

/// Every display element the client writes to, looked up once and passed
/// into the render operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHandles {
    pub city_input: String,
    pub loading: TextElement,
    pub error: TextElement,
    pub weather: WeatherPanel,
}

impl Default for ViewHandles {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHandles {
    /// A freshly initialized view in the Idle state.
    pub fn new() -> Self {
        let mut view = Self {
            city_input: String::new(),
            loading: TextElement {
                text: "Loading...".to_string(),
                hidden: true,
            },
            error: TextElement::default(),
            weather: WeatherPanel::default(),
        };
        view.hide_weather();
        view.hide_error();
        view
    }

    pub fn state(&self) -> UiState {
        if !self.loading.hidden {
            UiState::Loading
        } else if !self.error.hidden {
            UiState::Error
        } else if !self.weather.hidden {
            UiState::Result
        } else {
            UiState::Idle
        }
    }

    pub fn show_loading(&mut self) {
        self.hide_error();
        self.hide_weather();
        self.loading.hidden = false;
    }

    pub fn hide_loading(&mut self) {
        self.loading.hidden = true;
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error.text = message.into();
        self.error.hidden = false;
        self.hide_loading();
        self.hide_weather();
    }

    pub fn hide_error(&mut self) {
        self.error.hidden = true;
    }

    pub fn hide_weather(&mut self) {
        self.weather = WeatherPanel {
            hidden: true,
            ..WeatherPanel::default()
        };
    }

    pub fn show_result(&mut self, display: WeatherDisplay) {
        self.hide_loading();
        self.hide_error();
        self.weather = WeatherPanel {
            hidden: false,
            city_name: display.city_name,
            icon: ImageElement {
                src: display.icon_src,
                alt: display.icon_alt,
            },
            temperature: display.temperature,
            description: display.description,
            wind_speed: display.wind_speed,
            humidity: display.humidity,
        };
    }

    /// Render a payload, falling back to the error state if it can't be displayed.
    pub fn display_weather(&mut self, result: &WeatherResult) -> Result<(), ClientError> {
        match WeatherDisplay::from_result(result) {
            Ok(display) => {
                self.show_result(display);
                Ok(())
            }
            Err(err) => {
                self.show_error(err.user_message());
                Err(err)
            }
        }
    }
}
