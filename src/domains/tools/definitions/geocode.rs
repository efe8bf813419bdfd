//! Place name geocoding.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::clients::GeocodingClient;
use crate::domains::tools::{
    ContentEnvelope, Schema, ToolDescriptor, ToolError, ToolHandler, ValidatedInput,
};

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeParams {
    pub query: String,
}

pub struct GeocodeTool {
    client: GeocodingClient,
}

impl GeocodeTool {
    pub const NAME: &'static str = "geocode";
    pub const DESCRIPTION: &'static str =
        "Look up the coordinates of a place, address or landmark.";

    pub fn new(client: GeocodingClient) -> Self {
        Self { client }
    }

    pub fn input_schema() -> Schema {
        Schema::object()
            .required(
                "query",
                Schema::string()
                    .min_length(1)
                    .describe("Place name or address to look up"),
            )
            .into()
    }

    pub fn output_schema() -> Schema {
        Schema::object()
            .required("query", Schema::string())
            .required("display_name", Schema::string())
            .required("latitude", Schema::number())
            .required("longitude", Schema::number())
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

    pub async fn execute(&self, params: &GeocodeParams) -> Result<ContentEnvelope, ToolError> {
        let Some(place) = self.client.search(&params.query).await? else {
            return Ok(ContentEnvelope::text(format!(
                "No results found for '{}'",
                params.query
            )));
        };

        info!(query = %params.query, lat = place.lat, lon = place.lon, "Geocoded");
        let text = format!(
            "Location: {}\nLatitude: {}\nLongitude: {}",
            place.display_name, place.lat, place.lon
        );
        Ok(ContentEnvelope::text(text).with_structured(json!({
            "query": params.query,
            "display_name": place.display_name,
            "latitude": place.lat,
            "longitude": place.lon,
        })))
    }
}

#[async_trait]
impl ToolHandler for GeocodeTool {
    async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
        let params: GeocodeParams = input.parse()?;
        Ok(self
            .execute(&params)
            .await
            .unwrap_or_else(ToolError::into_envelope))
    }
}
