use std::sync::Arc;

use crate::{
    error::ClientError,
    geolocation::{Geolocator, PositionOptions},
    model::{WeatherQuery, WeatherResult},
    proxy_client::ProxyClient,
    session::WeatherSession,
    view::{UiState, ViewHandles},
};

/// Receives the view after every state transition.
pub trait Renderer {
    fn render(&mut self, view: &ViewHandles);
}

/// Drives the two input paths (typed city, device location) end to end.
#[derive(Debug)]
pub struct WeatherApp<R> {
    session: WeatherSession,
    proxy: ProxyClient,
    geolocator: Option<Arc<dyn Geolocator>>,
    position_options: PositionOptions,
    renderer: R,
}

impl<R: Renderer> WeatherApp<R> {
    /// `geolocator` is `None` when the device has no location capability.
    pub fn new(
        proxy: ProxyClient,
        geolocator: Option<Arc<dyn Geolocator>>,
        renderer: R,
    ) -> Self {
        Self {
            session: WeatherSession::new(),
            proxy,
            geolocator,
            position_options: PositionOptions::default(),
            renderer,
        }
    }

    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.position_options = options;
        self
    }

    pub fn view(&self) -> &ViewHandles {
        self.session.view()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.session.set_input(text);
    }

    /// Submit whatever is in the input field.
    pub async fn submit_city(&mut self) -> UiState {
        let Some((ticket, query)) = self.session.begin_city_search() else {
            self.refresh();
            return self.view().state();
        };
        self.refresh();

        tracing::info!("Looking up weather for {:?}", query);
        let outcome = self.proxy.fetch_weather(&query).await;
        self.session.complete(ticket, outcome);
        self.refresh();
        self.view().state()
    }

    /// Look up weather for the device's current position.
    pub async fn locate(&mut self) -> UiState {
        let Some(ticket) = self.session.begin_locate(self.geolocator.is_some()) else {
            self.refresh();
            return self.view().state();
        };
        self.refresh();

        let outcome = self.weather_here().await;
        self.session.complete(ticket, outcome);
        self.refresh();
        self.view().state()
    }

    async fn weather_here(&self) -> Result<WeatherResult, ClientError> {
        let geolocator = self
            .geolocator
            .as_ref()
            .ok_or(ClientError::GeolocationUnsupported)?;
        let position = geolocator.current_position(&self.position_options).await?;
        tracing::info!(
            "Current position: {}, {}",
            position.latitude,
            position.longitude
        );

        let query = WeatherQuery::coordinates(position.latitude, position.longitude);
        self.proxy.fetch_weather(&query).await
    }

    fn refresh(&mut self) {
        self.renderer.render(self.session.view());
    }
}
