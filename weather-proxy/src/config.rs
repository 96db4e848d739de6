use std::net::SocketAddr;

use reqwest::Url;

/// Upstream current-conditions endpoint used when nothing else is configured.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Environment variable holding the upstream API key by default.
pub const DEFAULT_API_KEY_VAR: &str = "API_KEY";

/// Where the upstream credential comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read from this environment variable on every request.
    Env(String),
    Fixed(String),
}

impl ApiKeySource {
    pub fn resolve(&self) -> Option<String> {
        match self {
            Self::Env(var) => std::env::var(var).ok().filter(|key| !key.is_empty()),
            Self::Fixed(key) => Some(key.clone()),
        }
    }
}

// Keeps the key itself out of logs.
impl std::fmt::Debug for ApiKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env(var) => f.debug_tuple("Env").field(var).finish(),
            Self::Fixed(_) => f.write_str("Fixed(***)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub listen: SocketAddr,
    pub upstream_url: Url,
    pub api_key: ApiKeySource,
}

impl ProxyConfig {
    pub fn new(listen: SocketAddr, upstream_url: Url, api_key: ApiKeySource) -> Self {
        Self {
            listen,
            upstream_url,
            api_key,
        }
    }
}
