//! Weather forecast tool.
//!
//! Renders three text blocks (current conditions, the next 24 hourly rows,
//! and one row per forecast day) and mirrors the same data as structured
//! content.

use std::borrow::Cow;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::clients::{Forecast, ForecastRequest, WeatherClient};
use crate::domains::tools::{
    ContentEnvelope, ContentItem, Schema, ToolDescriptor, ToolError, ToolHandler, ValidatedInput,
};

const HOURLY_ROWS: usize = 24;

/// Describe a WMO weather interpretation code.
pub fn describe_weather_code(code: i64) -> Cow<'static, str> {
    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        other => return Cow::Owned(format!("code: {}", other)),
    };
    Cow::Borrowed(text)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherParams {
    pub latitude: f64,
    pub longitude: f64,
    pub forecast_days: u8,
}

pub struct WeatherTool {
    client: WeatherClient,
}

impl WeatherTool {
    pub const NAME: &'static str = "get_weather";
    pub const DESCRIPTION: &'static str =
        "Get current conditions plus hourly and daily forecasts for a coordinate.";

    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    pub fn input_schema() -> Schema {
        Schema::object()
            .required(
                "latitude",
                Schema::number()
                    .range(-90.0, 90.0)
                    .describe("Latitude in decimal degrees"),
            )
            .required(
                "longitude",
                Schema::number()
                    .range(-180.0, 180.0)
                    .describe("Longitude in decimal degrees"),
            )
            .optional_with_default(
                "forecastDays",
                Schema::integer()
                    .range(1.0, 16.0)
                    .describe("Number of forecast days"),
                7,
            )
            .into()
    }

    pub fn output_schema() -> Schema {
        let hourly = Schema::object()
            .required("time", Schema::string())
            .optional("temperature", Schema::number())
            .optional("precipitation", Schema::number())
            .optional("conditions", Schema::string());
        let daily = Schema::object()
            .required("date", Schema::string())
            .optional("temperature_max", Schema::number())
            .optional("temperature_min", Schema::number())
            .optional("precipitation_sum", Schema::number())
            .optional("conditions", Schema::string());

        Schema::object()
            .required("latitude", Schema::number())
            .required("longitude", Schema::number())
            .optional("timezone", Schema::string())
            .required(
                "current",
                Schema::object()
                    .required("time", Schema::string())
                    .required("temperature", Schema::number())
                    .required("windspeed", Schema::number())
                    .required("conditions", Schema::string()),
            )
            .required("hourly", Schema::array(hourly))
            .required("daily", Schema::array(daily))
            .into()
    }

    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::input_schema(),
            Self::output_schema(),
            self,
        )
    }

    pub async fn execute(&self, params: &WeatherParams) -> Result<ContentEnvelope, ToolError> {
        let forecast = self
            .client
            .forecast(ForecastRequest {
                latitude: params.latitude,
                longitude: params.longitude,
                forecast_days: params.forecast_days,
            })
            .await?;
        Ok(render(&forecast))
    }
}

#[async_trait]
impl ToolHandler for WeatherTool {
    async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
        let params: WeatherParams = input.parse()?;
        Ok(self
            .execute(&params)
            .await
            .unwrap_or_else(ToolError::into_envelope))
    }
}

fn reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, unit),
        None => "n/a".to_string(),
    }
}

fn conditions(code: Option<i64>) -> String {
    code.map(|c| describe_weather_code(c).into_owned())
        .unwrap_or_else(|| "n/a".to_string())
}

/// Insert `value` under `key` unless it is missing.
fn put<T: Into<Value>>(row: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        row.insert(key.to_string(), v.into());
    }
}

fn render(forecast: &Forecast) -> ContentEnvelope {
    let current = &forecast.current_weather;
    let current_conditions = describe_weather_code(current.weathercode);
    let timezone = forecast.timezone.as_deref().unwrap_or("GMT");

    let current_text = format!(
        "Weather for {}, {} ({})\nCurrent conditions at {}:\n  Temperature: {:.1}°C\n  Wind speed: {:.1} km/h\n  Conditions: {}",
        forecast.latitude,
        forecast.longitude,
        timezone,
        current.time,
        current.temperature,
        current.windspeed,
        current_conditions,
    );

    let hourly = &forecast.hourly;
    let mut hourly_text = String::from("Hourly forecast (next 24 hours):");
    let mut hourly_rows = Vec::new();
    for (i, time) in hourly.time.iter().take(HOURLY_ROWS).enumerate() {
        let temperature = hourly.temperature_2m.get(i).copied().flatten();
        let precipitation = hourly.precipitation.get(i).copied().flatten();
        let code = hourly.weathercode.get(i).copied().flatten();
        hourly_text.push_str(&format!(
            "\n  {}: {}, {} precipitation, {}",
            time,
            reading(temperature, "°C"),
            reading(precipitation, " mm"),
            conditions(code),
        ));

        let mut row = Map::new();
        row.insert("time".into(), time.clone().into());
        put(&mut row, "temperature", temperature);
        put(&mut row, "precipitation", precipitation);
        put(&mut row, "conditions", code.map(|c| describe_weather_code(c).into_owned()));
        hourly_rows.push(Value::Object(row));
    }

    let daily = &forecast.daily;
    let mut daily_text = format!("Daily forecast ({} days):", daily.time.len());
    let mut daily_rows = Vec::new();
    for (i, date) in daily.time.iter().enumerate() {
        let max = daily.temperature_2m_max.get(i).copied().flatten();
        let min = daily.temperature_2m_min.get(i).copied().flatten();
        let precipitation = daily.precipitation_sum.get(i).copied().flatten();
        let code = daily.weathercode.get(i).copied().flatten();
        daily_text.push_str(&format!(
            "\n  {}: low {}, high {}, {} precipitation, {}",
            date,
            reading(min, "°C"),
            reading(max, "°C"),
            reading(precipitation, " mm"),
            conditions(code),
        ));

        let mut row = Map::new();
        row.insert("date".into(), date.clone().into());
        put(&mut row, "temperature_max", max);
        put(&mut row, "temperature_min", min);
        put(&mut row, "precipitation_sum", precipitation);
        put(&mut row, "conditions", code.map(|c| describe_weather_code(c).into_owned()));
        daily_rows.push(Value::Object(row));
    }

    let mut structured = json!({
        "latitude": forecast.latitude,
        "longitude": forecast.longitude,
        "current": {
            "time": current.time,
            "temperature": current.temperature,
            "windspeed": current.windspeed,
            "conditions": current_conditions,
        },
        "hourly": hourly_rows,
        "daily": daily_rows,
    });
    if let (Some(tz), Some(obj)) = (&forecast.timezone, structured.as_object_mut()) {
        obj.insert("timezone".into(), tz.clone().into());
    }

    ContentEnvelope::text(current_text)
        .with_item(ContentItem::text(hourly_text))
        .with_item(ContentItem::text(daily_text))
        .with_structured(structured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::build_http_client;
    use crate::core::config::ProvidersConfig;
    use crate::domains::tools::validate;
    use httpmock::prelude::*;

    fn tool(base: String) -> WeatherTool {
        let http = build_http_client(&ProvidersConfig::default()).unwrap();
        WeatherTool::new(WeatherClient::new(http, base))
    }

    #[test]
    fn test_weather_codes() {
        assert_eq!(describe_weather_code(0), "Clear sky");
        assert_eq!(describe_weather_code(95), "Thunderstorm");
        assert_eq!(describe_weather_code(42), "code: 42");
    }

    #[test]
    fn test_render_limits_hourly_rows() {
        let forecast: Forecast =
            serde_json::from_value(crate::clients::weather_fixture()).unwrap();
        let envelope = render(&forecast);

        assert_eq!(envelope.items().len(), 3);
        let current = envelope.items()[0].as_text().unwrap();
        assert!(current.contains("Temperature: 21.4°C"));
        assert!(current.contains("Conditions: Overcast"));

        let hourly = envelope.items()[1].as_text().unwrap();
        assert_eq!(hourly.lines().count(), 1 + HOURLY_ROWS);
        assert!(hourly.contains("2024-06-01T03:00: n/a"));
        assert!(!hourly.contains("2024-06-02T00:00"));

        let daily = envelope.items()[2].as_text().unwrap();
        assert!(daily.starts_with("Daily forecast (2 days):"));
        assert!(daily.contains("2024-06-02: low 11.0°C, high 19.8°C, 4.2 mm precipitation, Slight rain"));

        let structured = envelope.structured().unwrap();
        assert_eq!(structured["hourly"].as_array().unwrap().len(), HOURLY_ROWS);
        assert!(structured["hourly"][3].get("temperature").is_none());
        assert_eq!(structured["timezone"], "Europe/Paris");
    }

    #[test]
    fn test_structured_mirror_matches_output_schema() {
        let forecast: Forecast =
            serde_json::from_value(crate::clients::weather_fixture()).unwrap();
        let envelope = render(&forecast);
        assert!(validate(&WeatherTool::output_schema(), envelope.structured().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_forecast_days_reach_provider() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/forecast")
                .query_param("forecast_days", "7");
            then.status(200).json_body(crate::clients::weather_fixture());
        });

        let input = validate(
            &WeatherTool::input_schema(),
            &json!({"latitude": 48.86, "longitude": 2.34}),
        )
        .unwrap();
        let envelope = tool(server.base_url()).call(input).await.unwrap();
        m.assert();
        assert!(!envelope.is_error());
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/forecast");
            then.status(500);
        });

        let envelope = tool(server.base_url())
            .execute(&WeatherParams {
                latitude: 0.0,
                longitude: 0.0,
                forecast_days: 1,
            })
            .await
            .unwrap_or_else(ToolError::into_envelope);
        assert_eq!(
            envelope.first_text(),
            Some("Error: Weather service request failed with status 500")
        );
    }
}
