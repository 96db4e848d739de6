//! Request bookkeeping for one UI session.
//!
//! Every request that enters Loading gets a [`Ticket`]. Only the ticket from
//! the most recent request may change the view when it completes; anything
//! older is dropped, so a slow response can't overwrite a newer one.

use crate::{
    error::ClientError,
    model::{WeatherQuery, WeatherResult},
    view::ViewHandles,
};

/// How a request was started. City searches clear the input on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    City,
    Geolocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    kind: RequestKind,
}

impl Ticket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Debug, Default)]
pub struct WeatherSession {
    view: ViewHandles,
    generation: u64,
}

impl WeatherSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewHandles {
        &self.view
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.view.city_input = text.into();
    }

    /// Validate the input field and enter Loading. An empty input shows the
    /// validation error and returns `None`.
    pub fn begin_city_search(&mut self) -> Option<(Ticket, WeatherQuery)> {
        match WeatherQuery::city(&self.view.city_input) {
            Some(query) => Some((self.begin(RequestKind::City), query)),
            None => {
                self.view.show_error(ClientError::EmptyCity.user_message());
                None
            }
        }
    }

    /// Enter Loading for a geolocation lookup, or show the unsupported error.
    pub fn begin_locate(&mut self, supported: bool) -> Option<Ticket> {
        if supported {
            Some(self.begin(RequestKind::Geolocation))
        } else {
            self.view.show_error(ClientError::GeolocationUnsupported.user_message());
            None
        }
    }

    fn begin(&mut self, kind: RequestKind) -> Ticket {
        self.generation += 1;
        self.view.show_loading();
        Ticket {
            generation: self.generation,
            kind,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply the outcome of a request. Returns `false` if the ticket is stale
    /// and the view was left alone.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<WeatherResult, ClientError>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding stale response (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                let shown = self.view.display_weather(&result).is_ok();
                if shown && ticket.kind == RequestKind::City {
                    self.view.city_input.clear();
                }
            }
            // The error element already tells the user.
            Err(err) => {
                tracing::debug!("Weather request failed: {}", err);
                self.view.show_error(err.user_message());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Condition, MainReadings, SysInfo, Wind},
        view::UiState,
    };
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    #[derive(Debug, Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn result(name: &str) -> WeatherResult {
        WeatherResult {
            name: name.into(),
            sys: SysInfo {
                country: "GB".into(),
            },
            weather: vec![Condition {
                description: "light rain".into(),
                icon: "10d".into(),
            }],
            main: MainReadings {
                temp: 11.2,
                humidity: 81.0,
            },
            wind: Wind { speed: 5.1 },
        }
    }

    #[test]
    fn blank_input_shows_error_without_request() {
        let mut session = WeatherSession::new();
        session.set_input("   ");

        assert!(session.begin_city_search().is_none());
        assert_eq!(session.view().state(), UiState::Error);
        assert_eq!(session.view().error.text, "Please enter a city name");
    }

    #[test]
    fn successful_city_search_clears_input() {
        let mut session = WeatherSession::new();
        session.set_input(" London ");

        let (ticket, query) = session.begin_city_search().unwrap();
        assert_eq!(query, WeatherQuery::City("London".into()));
        assert_eq!(session.view().state(), UiState::Loading);

        assert!(session.complete(ticket, Ok(result("London"))));
        assert_eq!(session.view().state(), UiState::Result);
        assert_eq!(session.view().weather.city_name, "London, GB");
        assert!(session.view().city_input.is_empty());
    }

    #[test]
    fn failed_city_search_keeps_input() {
        let mut session = WeatherSession::new();
        session.set_input("Atlantis");

        let (ticket, _) = session.begin_city_search().unwrap();
        let err = ClientError::Api {
            status: 404,
            detail: None,
        };
        session.complete(ticket, Err(err));

        assert_eq!(session.view().state(), UiState::Error);
        assert_eq!(session.view().error.text, "City not found or API error");
        assert_eq!(session.view().city_input, "Atlantis");
    }

    #[test]
    fn failed_lookup_is_quiet_at_warn_level() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        let mut session = WeatherSession::new();
        session.set_input("Atlantis");
        let (ticket, _) = session.begin_city_search().unwrap();
        let err = ClientError::Api {
            status: 404,
            detail: None,
        };
        tracing::subscriber::with_default(subscriber, || session.complete(ticket, Err(err)));

        assert_eq!(session.view().state(), UiState::Error);
        assert_eq!(logs.contents(), "");
    }

    #[test]
    fn geolocation_success_leaves_input_alone() {
        let mut session = WeatherSession::new();
        session.set_input("draft");

        let ticket = session.begin_locate(true).unwrap();
        session.complete(ticket, Ok(result("Camden Town")));

        assert_eq!(session.view().state(), UiState::Result);
        assert_eq!(session.view().city_input, "draft");
    }

    #[test]
    fn unsupported_geolocation_fails_immediately() {
        let mut session = WeatherSession::new();
        assert!(session.begin_locate(false).is_none());
        assert_eq!(
            session.view().error.text,
            "Geolocation is not supported on this device"
        );
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut session = WeatherSession::new();
        session.set_input("Paris");
        let (first, _) = session.begin_city_search().unwrap();
        session.set_input("Rome");
        let (second, _) = session.begin_city_search().unwrap();

        assert!(session.complete(second, Ok(result("Rome"))));
        let before = session.view().clone();

        assert!(!session.complete(first, Ok(result("Paris"))));
        assert_eq!(session.view(), &before);
        assert_eq!(session.view().weather.city_name, "Rome, GB");
    }

    #[test]
    fn stale_failure_is_discarded() {
        let mut session = WeatherSession::new();
        let first = session.begin_locate(true).unwrap();
        let second = session.begin_locate(true).unwrap();

        assert!(!session.complete(first, Err(ClientError::GeolocationUnsupported)));
        assert_eq!(session.view().state(), UiState::Loading);

        session.complete(second, Ok(result("Leeds")));
        assert_eq!(session.view().state(), UiState::Result);
    }
}
