//! HTTP clients for the upstream providers behind the network-backed tools.
//!
//! - `geocoding.rs` - Nominatim place search
//! - `weather.rs` - Open-Meteo forecasts
//! - `image.rs` - Hugging Face text-to-image inference
//!
//! All clients share one `reqwest::Client` built by [`build_http_client`].

mod geocoding;
mod image;
mod weather;

pub use geocoding::{GeocodingClient, Place};
pub use image::{GeneratedImage, ImageClient, ProviderPayload, to_binary};
pub use weather::{
    CurrentWeather, DailySeries, Forecast, ForecastRequest, HourlySeries, WeatherClient,
};

#[cfg(test)]
pub(crate) use weather::tests::sample_forecast as weather_fixture;

use std::time::Duration;

use crate::core::config::ProvidersConfig;
use crate::domains::tools::ToolError;

/// Build the shared provider client.
///
/// Only a connect timeout is set: image inference can legitimately take a
/// long time. Idle connections are not pooled.
pub fn build_http_client(cfg: &ProvidersConfig) -> Result<reqwest::Client, ToolError> {
    reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|e| ToolError::internal(format!("failed to build HTTP client: {}", e)))
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(endpoint("http://x/", "/search"), "http://x/search");
        assert_eq!(endpoint("http://x", "v1/forecast"), "http://x/v1/forecast");
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&ProvidersConfig::default()).is_ok());
    }
}
