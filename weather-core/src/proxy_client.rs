use reqwest::{Client, Url};

use crate::{
    error::ClientError,
    model::{ErrorBody, WeatherQuery, WeatherResult},
};

/// Path of the weather endpoint, relative to the proxy base URL.
pub const WEATHER_ENDPOINT: &str = "api/weather";

/// Calls the weather proxy. The proxy holds the upstream credential, so this
/// client never sees an API key.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    endpoint: Url,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let endpoint = endpoint_url(base_url)?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for a query.
    pub fn request_url(&self, query: &WeatherQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        url
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn fetch_weather(
        &self,
        query: &WeatherQuery,
    ) -> Result<WeatherResult, ClientError> {
        let url = self.request_url(query);
        let res = self.http.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.json::<ErrorBody>().await.ok().map(|body| body.error);
            tracing::debug!("Proxy returned {}: {:?}", status, detail);
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let body = res.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ClientError::MalformedPayload(e.to_string()))
    }
}

fn endpoint_url(base_url: &str) -> Result<Url, ClientError> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|base| base.join(WEATHER_ENDPOINT))
        .map_err(|e| ClientError::InvalidProxyUrl(format!("{base_url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let client = ProxyClient::new("https://example.com/weather-app").unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://example.com/weather-app/api/weather"
        );

        let client = ProxyClient::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://127.0.0.1:3000/api/weather"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ProxyClient::new("not a url").unwrap_err();
        assert!(matches!(err, ClientError::InvalidProxyUrl(_)));
    }

    #[test]
    fn city_is_url_encoded() {
        let client = ProxyClient::new("http://localhost:3000").unwrap();
        let url = client.request_url(&WeatherQuery::City("São Paulo".into()));
        assert_eq!(url.query(), Some("city=S%C3%A3o+Paulo"));
    }

    #[test]
    fn coordinates_are_sent_as_lat_lon() {
        let client = ProxyClient::new("http://localhost:3000").unwrap();
        let url = client.request_url(&WeatherQuery::coordinates(51.5072, -0.1276));
        assert_eq!(url.query(), Some("lat=51.5072&lon=-0.1276"));
    }
}
