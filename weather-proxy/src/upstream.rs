use reqwest::{Client, Url};
use thiserror::Error;

use crate::config::ApiKeySource;

/// Validated query parameters, borrowed from the inbound request.
/// Coordinates stay as the caller wrote them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamQuery<'a> {
    City(&'a str),
    Coordinates { lat: &'a str, lon: &'a str },
}

impl<'a> UpstreamQuery<'a> {
    /// A non-empty `city` wins; otherwise both `lat` and `lon` must be non-empty.
    pub fn from_params(
        city: Option<&'a str>,
        lat: Option<&'a str>,
        lon: Option<&'a str>,
    ) -> Option<Self> {
        let present = |value: Option<&'a str>| value.filter(|v| !v.is_empty());

        if let Some(city) = present(city) {
            return Some(Self::City(city));
        }
        match (present(lat), present(lon)) {
            (Some(lat), Some(lon)) => Some(Self::Coordinates { lat, lon }),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(reqwest::Error),

    #[error("upstream body is not JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

// The request URL carries the API key, so it never goes into the error.
impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// Status and raw JSON body as returned by the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The third-party weather API, called with the server-held key.
#[derive(Debug, Clone)]
pub struct Upstream {
    http: Client,
    base_url: Url,
    api_key: ApiKeySource,
}

impl Upstream {
    pub fn new(base_url: Url, api_key: ApiKeySource) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
        }
    }

    pub fn request_url(&self, query: &UpstreamQuery<'_>, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                UpstreamQuery::City(city) => {
                    pairs.append_pair("q", city);
                }
                UpstreamQuery::Coordinates { lat, lon } => {
                    pairs.append_pair("lat", lat);
                    pairs.append_pair("lon", lon);
                }
            }
            pairs.append_pair("appid", api_key);
            pairs.append_pair("units", "metric");
        }
        url
    }

    /// Call upstream once. Any status is returned as-is; only transport
    /// failures and non-JSON bodies are errors.
    pub async fn fetch(
        &self,
        query: &UpstreamQuery<'_>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let api_key = self.api_key.resolve().unwrap_or_else(|| {
            tracing::warn!(
                "No upstream API key configured ({:?}); upstream will reject the request",
                self.api_key
            );
            String::new()
        });

        let url = self.request_url(query, &api_key);
        let res = self.http.get(url).send().await?;

        let status = res.status().as_u16();
        let body = res.bytes().await?.to_vec();
        serde_json::from_slice::<serde_json::Value>(&body)?;

        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream() -> Upstream {
        let base = Url::parse("https://api.openweathermap.org/data/2.5/weather").unwrap();
        Upstream::new(base, ApiKeySource::Fixed("KEY".into()))
    }

    #[test]
    fn non_empty_city_wins() {
        assert_eq!(
            UpstreamQuery::from_params(Some("Oslo"), Some("1"), Some("2")),
            Some(UpstreamQuery::City("Oslo"))
        );
    }

    #[test]
    fn empty_city_falls_back_to_coordinates() {
        assert_eq!(
            UpstreamQuery::from_params(Some(""), Some("59.91"), Some("10.75")),
            Some(UpstreamQuery::Coordinates {
                lat: "59.91",
                lon: "10.75"
            })
        );
    }

    #[test]
    fn incomplete_params_are_rejected() {
        assert_eq!(UpstreamQuery::from_params(None, None, None), None);
        assert_eq!(UpstreamQuery::from_params(None, Some("59.91"), None), None);
        assert_eq!(UpstreamQuery::from_params(None, None, Some("10.75")), None);
        assert_eq!(
            UpstreamQuery::from_params(Some(""), Some(""), Some("10.75")),
            None
        );
    }

    #[test]
    fn city_url_is_encoded_with_key_and_units() {
        let url = upstream().request_url(&UpstreamQuery::City("São Paulo"), "KEY");
        assert_eq!(
            url.as_str(),
            "https://api.openweathermap.org/data/2.5/weather?q=S%C3%A3o+Paulo&appid=KEY&units=metric"
        );
    }

    #[test]
    fn coordinate_url_keeps_values_verbatim() {
        let query = UpstreamQuery::Coordinates {
            lat: "48.85660",
            lon: "-2.0",
        };
        let url = upstream().request_url(&query, "KEY");
        assert_eq!(
            url.query(),
            Some("lat=48.85660&lon=-2.0&appid=KEY&units=metric")
        );
    }

    #[test]
    fn success_range() {
        let response = |status| UpstreamResponse {
            status,
            body: vec![],
        };
        assert!(response(200).is_success());
        assert!(response(203).is_success());
        assert!(!response(401).is_success());
    }
}
