//! HTTP proxy that keeps the weather API key on the server.
//!
//! Exposes a single `GET /api/weather` endpoint. Requests are validated,
//! forwarded upstream with the server-held key, and the upstream status and
//! JSON body are relayed unchanged.

pub mod config;
pub mod relay;
pub mod server;
pub mod upstream;

pub use config::{ApiKeySource, ProxyConfig};
pub use relay::{RelayOutcome, relay};
pub use server::{routes, run};
pub use upstream::{Upstream, UpstreamQuery};
