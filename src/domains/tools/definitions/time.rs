//! Current time in an IANA timezone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::json;

use crate::domains::tools::{
    ContentEnvelope, Schema, ToolDescriptor, ToolError, ToolHandler, ValidatedInput,
};

#[derive(Debug, Clone, Deserialize)]
pub struct TimeParams {
    pub timezone: String,
}

pub struct TimeTool {
    default_timezone: String,
}

impl TimeTool {
    pub const NAME: &'static str = "get_time";
    pub const DESCRIPTION: &'static str = "Get the current date and time in an IANA timezone.";

    pub fn new(default_timezone: impl Into<String>) -> Self {
        Self {
            default_timezone: default_timezone.into(),
        }
    }

    pub fn input_schema(&self) -> Schema {
        Schema::object()
            .optional_with_default(
                "timezone",
                Schema::string().describe("IANA timezone name, e.g. Europe/Paris"),
                self.default_timezone.clone(),
            )
            .into()
    }

    pub fn output_schema() -> Schema {
        Schema::object()
            .required("timezone", Schema::string())
            .required("datetime", Schema::string().describe("RFC 3339 timestamp"))
            .required("formatted", Schema::string())
            .into()
    }

    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            self.input_schema(),
            Self::output_schema(),
            self,
        )
    }

    pub fn execute(params: &TimeParams, now: DateTime<Utc>) -> ContentEnvelope {
        let tz: Tz = match params.timezone.parse() {
            Ok(tz) => tz,
            Err(_) => {
                return ToolError::domain(format!("Invalid timezone '{}'", params.timezone))
                    .into_envelope();
            }
        };

        let local = now.with_timezone(&tz);
        let formatted = local.format("%Y-%m-%d %H:%M:%S %Z").to_string();
        ContentEnvelope::text(format!("Current time in {}: {}", params.timezone, formatted))
            .with_structured(json!({
                "timezone": params.timezone,
                "datetime": local.to_rfc3339(),
                "formatted": formatted,
            }))
    }
}

#[async_trait]
impl ToolHandler for TimeTool {
    async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
        let params: TimeParams = input.parse()?;
        Ok(Self::execute(&params, Utc::now()))
    }
}
