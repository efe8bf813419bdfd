use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::endpoint;
use crate::domains::tools::ToolError;

const PROVIDER: &str = "Geocoding service";

/// Nominatim search client.
#[derive(Clone)]
pub struct GeocodingClient {
    base: String,
    http: Client,
}

/// The best match for a free-form place query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub display_name: String,
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "coordinate")]
    pub lon: f64,
}

/// Nominatim encodes coordinates as strings; accept plain numbers too.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("coordinate out of range")),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected coordinate, found {}",
            other
        ))),
    }
}

impl GeocodingClient {
    pub fn new(http: Client, base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http,
        }
    }

    /// Return the first match for `query`, or `None` when nothing matched.
    pub async fn search(&self, query: &str) -> Result<Option<Place>, ToolError> {
        let url = endpoint(&self.base, "search");
        debug!(%url, query, "Geocoding request");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::upstream(PROVIDER, e))?;
        if !resp.status().is_success() {
            return Err(ToolError::upstream_status(PROVIDER, resp.status().as_u16()));
        }

        let places: Vec<Place> = resp
            .json()
            .await
            .map_err(|e| ToolError::upstream(PROVIDER, e))?;
        Ok(places.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::build_http_client;
    use crate::core::config::ProvidersConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base: String) -> GeocodingClient {
        GeocodingClient::new(build_http_client(&ProvidersConfig::default()).unwrap(), base)
    }

    #[tokio::test]
    async fn it_returns_the_first_place() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Paris")
                .query_param("format", "jsonv2")
                .query_param("limit", "1")
                .query_param("addressdetails", "1")
                .header_exists("user-agent");
            then.status(200).json_body(json!([
                {"display_name": "Paris, Île-de-France, France", "lat": "48.8588897", "lon": "2.3200410"},
                {"display_name": "Paris, Texas", "lat": 33.66, "lon": -95.55}
            ]));
        });

        let place = client(server.base_url()).search("Paris").await.unwrap().unwrap();
        m.assert();
        assert_eq!(place.display_name, "Paris, Île-de-France, France");
        assert!((place.lat - 48.8588897).abs() < 1e-9);
        assert!((place.lon - 2.3200410).abs() < 1e-9);
    }

    #[tokio::test]
    async fn it_maps_empty_results_to_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!([]));
        });

        let place = client(server.base_url()).search("Nowhere").await.unwrap();
        assert!(place.is_none());
    }

    #[tokio::test]
    async fn it_reports_upstream_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        });

        let err = client(server.base_url()).search("Paris").await.unwrap_err();
        assert!(matches!(err, ToolError::UpstreamStatus { status: 503, .. }));
    }
}
