//! The one thing the proxy does: validate the query, call upstream, and hand
//! back whatever upstream said.

use weather_core::ErrorBody;

use crate::upstream::{Upstream, UpstreamQuery};

pub const MISSING_QUERY: &str = "City or coordinates are required";
pub const FETCH_FAILED: &str = "Failed to fetch weather data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Upstream JSON body, byte-for-byte.
    Forward { status: u16, body: Vec<u8> },
    /// The proxy's own error.
    Failure { status: u16, body: ErrorBody },
}

impl RelayOutcome {
    pub fn status(&self) -> u16 {
        match self {
            Self::Forward { status, .. } | Self::Failure { status, .. } => *status,
        }
    }

    fn failure(status: u16, message: &str) -> Self {
        Self::Failure {
            status,
            body: ErrorBody::new(message),
        }
    }
}

/// First value for `key`, the way a browser's `URLSearchParams::get` behaves.
fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

#[tracing::instrument(skip(upstream), level = "debug")]
pub async fn relay(upstream: &Upstream, params: &[(String, String)]) -> RelayOutcome {
    let city = param(params, "city");
    let (lat, lon) = (param(params, "lat"), param(params, "lon"));
    let Some(query) = UpstreamQuery::from_params(city, lat, lon) else {
        tracing::debug!("Rejecting request without city or coordinates");
        return RelayOutcome::failure(400, MISSING_QUERY);
    };

    match upstream.fetch(&query).await {
        Ok(res) if res.is_success() => RelayOutcome::Forward {
            status: 200,
            body: res.body,
        },
        Ok(res) => {
            tracing::info!("Upstream returned {} for {:?}", res.status, query);
            RelayOutcome::Forward {
                status: res.status,
                body: res.body,
            }
        }
        Err(e) => {
            tracing::error!("Upstream call failed for {:?}: {}", query, e);
            RelayOutcome::failure(500, FETCH_FAILED)
        }
    }
}
