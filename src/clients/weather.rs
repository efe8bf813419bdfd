use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::endpoint;
use crate::domains::tools::ToolError;

const PROVIDER: &str = "Weather service";

const HOURLY_FIELDS: &str = "temperature_2m,precipitation,weathercode";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

/// Open-Meteo forecast client.
#[derive(Clone)]
pub struct WeatherClient {
    base: String,
    http: Client,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub forecast_days: u8,
}

/// The subset of an Open-Meteo forecast the weather tool renders.
///
/// Series entries are `None` where the provider reports `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    pub current_weather: CurrentWeather,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub time: String,
    pub temperature: f64,
    pub windspeed: f64,
    #[serde(default)]
    pub winddirection: Option<f64>,
    pub weathercode: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    #[serde(default)]
    pub weathercode: Vec<Option<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub weathercode: Vec<Option<i64>>,
}

impl WeatherClient {
    pub fn new(http: Client, base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http,
        }
    }

    pub async fn forecast(&self, req: ForecastRequest) -> Result<Forecast, ToolError> {
        let url = endpoint(&self.base, "v1/forecast");
        debug!(%url, latitude = req.latitude, longitude = req.longitude, days = req.forecast_days, "Forecast request");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("latitude", req.latitude.to_string()),
                ("longitude", req.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("forecast_days", req.forecast_days.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ToolError::upstream(PROVIDER, e))?;
        if !resp.status().is_success() {
            return Err(ToolError::upstream_status(PROVIDER, resp.status().as_u16()));
        }

        resp.json()
            .await
            .map_err(|e| ToolError::upstream(PROVIDER, e))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clients::build_http_client;
    use crate::core::config::ProvidersConfig;
    use httpmock::prelude::*;
    use serde_json::{Value, json};

    /// A two-day forecast with 48 hourly rows and one null temperature.
    pub(crate) fn sample_forecast() -> Value {
        let hours: Vec<String> = (0..48)
            .map(|h| format!("2024-06-{:02}T{:02}:00", 1 + h / 24, h % 24))
            .collect();
        let mut temps: Vec<Value> = (0..48).map(|h| json!(15.0 + (h % 24) as f64 * 0.5)).collect();
        temps[3] = Value::Null;
        json!({
            "latitude": 48.86,
            "longitude": 2.34,
            "timezone": "Europe/Paris",
            "current_weather": {
                "time": "2024-06-01T12:00",
                "interval": 900,
                "temperature": 21.4,
                "windspeed": 11.2,
                "winddirection": 250,
                "is_day": 1,
                "weathercode": 3
            },
            "hourly": {
                "time": hours,
                "temperature_2m": temps,
                "precipitation": vec![0.0; 48],
                "weathercode": vec![3; 48]
            },
            "daily": {
                "time": ["2024-06-01", "2024-06-02"],
                "temperature_2m_max": [23.1, 19.8],
                "temperature_2m_min": [12.4, 11.0],
                "precipitation_sum": [0.0, 4.2],
                "weathercode": [3, 61]
            }
        })
    }

    fn client(base: String) -> WeatherClient {
        WeatherClient::new(build_http_client(&ProvidersConfig::default()).unwrap(), base)
    }

    #[tokio::test]
    async fn it_requests_the_forecast_fields() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/forecast")
                .query_param("latitude", "48.86")
                .query_param("longitude", "2.34")
                .query_param("current_weather", "true")
                .query_param("hourly", HOURLY_FIELDS)
                .query_param("daily", DAILY_FIELDS)
                .query_param("forecast_days", "2")
                .query_param("timezone", "auto");
            then.status(200).json_body(sample_forecast());
        });

        let forecast = client(server.base_url())
            .forecast(ForecastRequest {
                latitude: 48.86,
                longitude: 2.34,
                forecast_days: 2,
            })
            .await
            .unwrap();
        m.assert();
        assert_eq!(forecast.current_weather.weathercode, 3);
        assert_eq!(forecast.hourly.time.len(), 48);
        assert_eq!(forecast.hourly.temperature_2m[3], None);
        assert_eq!(forecast.daily.weathercode, vec![Some(3), Some(61)]);
    }

    #[tokio::test]
    async fn it_reports_upstream_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/forecast");
            then.status(400).json_body(json!({"error": true, "reason": "bad"}));
        });

        let err = client(server.base_url())
            .forecast(ForecastRequest {
                latitude: 0.0,
                longitude: 0.0,
                forecast_days: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UpstreamStatus { status: 400, .. }));
    }

    #[tokio::test]
    async fn it_rejects_malformed_bodies() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/forecast");
            then.status(200).body("not json");
        });

        let err = client(server.base_url())
            .forecast(ForecastRequest {
                latitude: 0.0,
                longitude: 0.0,
                forecast_days: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Upstream { .. }));
    }
}
