use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Select, Text};
use weather_core::{
    CachedGeolocator, Config, Geolocator, LocationConfig, ProxyClient, UiState, WeatherApp,
};

use crate::{location::ConfiguredGeolocator, render::TerminalRenderer};

const SEARCH_CITY: &str = "Search by city";
const USE_LOCATION: &str = "Use my location";
const QUIT: &str = "Quit";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather via the weather proxy"
)]
pub struct Cli {
    /// Base URL of the weather proxy. Overrides the config file.
    #[arg(long, global = true, env = "WEATHER_PROXY_URL")]
    pub proxy_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the proxy URL and an optional fixed location.
    Configure,

    /// Show current weather for a city.
    Search {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },

    /// Show current weather for this device's location.
    Locate,

    /// Prompt for lookups until you quit.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match &self.command {
            Command::Configure => {
                configure(editable_config(Config::load()))?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Search { city } => {
                let mut app = self.build_app(&self.search_config()?)?;
                app.set_input(city.as_str());
                Ok(exit_code(app.submit_city().await))
            }
            Command::Locate => {
                let mut app = self.build_app(&Config::load()?)?;
                Ok(exit_code(app.locate().await))
            }
            Command::Interactive => {
                let mut app = self.build_app(&Config::load()?)?;
                interactive(&mut app).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    /// A city search only needs the proxy URL, so `--proxy-url` makes the
    /// config file irrelevant.
    fn search_config(&self) -> anyhow::Result<Config> {
        match self.proxy_url {
            Some(_) => Ok(Config::default()),
            None => Config::load(),
        }
    }

    fn build_app(&self, config: &Config) -> anyhow::Result<WeatherApp<TerminalRenderer>> {
        let proxy_url = config.resolve_proxy_url(self.proxy_url.as_deref());
        let proxy = ProxyClient::new(&proxy_url)
            .with_context(|| format!("Invalid proxy URL: {proxy_url}"))?;
        tracing::debug!("Using weather proxy at {}", proxy.endpoint());

        let geolocator = config.location.clone().map(|location| {
            let geolocator = CachedGeolocator::new(ConfiguredGeolocator::new(location));
            Arc::new(geolocator) as Arc<dyn Geolocator>
        });

        Ok(WeatherApp::new(proxy, geolocator, TerminalRenderer))
    }
}

/// `configure` must still work when the stored file is broken; it is the
/// command that rewrites it.
fn editable_config(loaded: anyhow::Result<Config>) -> Config {
    loaded.unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable config, starting from defaults: {:#}", e);
        Config::default()
    })
}

fn exit_code(state: UiState) -> ExitCode {
    if state == UiState::Result {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Esc and Ctrl-C end the prompt loop rather than the process with an error.
fn cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

async fn interactive(app: &mut WeatherApp<TerminalRenderer>) -> anyhow::Result<()> {
    loop {
        let menu = Select::new(
            "What would you like to do?",
            vec![SEARCH_CITY, USE_LOCATION, QUIT],
        );
        let choice = match menu.prompt() {
            Ok(choice) => choice,
            Err(e) if cancelled(&e) => return Ok(()),
            Err(e) => return Err(e).context("Failed to read menu choice"),
        };

        match choice {
            SEARCH_CITY => {
                let prompt = Text::new("City:").with_initial_value(&app.view().city_input);
                let city = match prompt.prompt() {
                    Ok(city) => city,
                    Err(e) if cancelled(&e) => continue,
                    Err(e) => return Err(e).context("Failed to read city name"),
                };
                app.set_input(city);
                app.submit_city().await;
            }
            USE_LOCATION => {
                app.locate().await;
            }
            _ => return Ok(()),
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current = config.resolve_proxy_url(None);
    let proxy_url = Text::new("Weather proxy URL:")
        .with_default(&current)
        .prompt()?;
    ProxyClient::new(&proxy_url).with_context(|| format!("Invalid proxy URL: {proxy_url}"))?;
    config.proxy_url = Some(proxy_url);

    let wants_location = Confirm::new("Set a fixed location for \"use my location\"?")
        .with_default(config.location.is_some())
        .prompt()?;

    config.location = if wants_location {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number, e.g. 48.8566")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number, e.g. 2.3522")
            .prompt()?;
        let allow = Confirm::new("Allow location lookups?")
            .with_default(true)
            .prompt()?;
        Some(LocationConfig {
            latitude,
            longitude,
            allow,
        })
    } else {
        None
    };

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
