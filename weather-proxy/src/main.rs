//! Binary crate for the `weather-proxy` server.

use std::net::SocketAddr;

use clap::Parser;
use reqwest::Url;
use weather_proxy::{
    ApiKeySource, ProxyConfig,
    config::{DEFAULT_API_KEY_VAR, DEFAULT_UPSTREAM_URL},
};

#[derive(Debug, Parser)]
#[command(
    name = "weather-proxy",
    version,
    about = "Key-hiding proxy for the weather API"
)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "WEATHER_PROXY_LISTEN", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Upstream current-conditions endpoint.
    #[arg(long, env = "WEATHER_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: Url,

    /// Environment variable holding the upstream API key. Read on every request.
    #[arg(long, default_value = DEFAULT_API_KEY_VAR)]
    api_key_env: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let api_key = ApiKeySource::Env(args.api_key_env);
    if api_key.resolve().is_none() {
        tracing::warn!("Upstream API key is not set yet ({:?})", api_key);
    }

    let config = ProxyConfig::new(args.listen, args.upstream_url, api_key);
    weather_proxy::run(config).await
}
