//! Arithmetic tool.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domains::tools::{
    ContentEnvelope, Schema, ToolDescriptor, ToolError, ToolHandler, ValidatedInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Operation {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operation {
    pub const SYMBOLS: [&'static str; 4] = ["+", "-", "*", "/"];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Apply the operation; results are always finite.
    pub fn apply(self, a: f64, b: f64) -> Result<f64, ToolError> {
        let result = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide if b == 0.0 => {
                return Err(ToolError::domain("Division by zero is not allowed"));
            }
            Self::Divide => a / b,
        };
        if result.is_finite() {
            Ok(result)
        } else {
            Err(ToolError::domain("Result is outside the representable range"))
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateParams {
    pub a: f64,
    pub b: f64,
    pub operation: Operation,
}

pub struct CalculateTool;

impl CalculateTool {
    pub const NAME: &'static str = "calculate";
    pub const DESCRIPTION: &'static str =
        "Perform basic arithmetic (+, -, *, /) on two numbers.";

    pub fn input_schema() -> Schema {
        Schema::object()
            .required("a", Schema::number().describe("First operand"))
            .required("b", Schema::number().describe("Second operand"))
            .required(
                "operation",
                Schema::enumeration(Operation::SYMBOLS).describe("Arithmetic operator"),
            )
            .into()
    }

    pub fn output_schema() -> Schema {
        Schema::object()
            .required("expression", Schema::string())
            .required("result", Schema::number())
            .into()
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::input_schema(),
            Self::output_schema(),
            Self,
        )
    }

    pub fn execute(params: &CalculateParams) -> ContentEnvelope {
        match params.operation.apply(params.a, params.b) {
            Ok(result) => {
                let expression = format!("{} {} {}", params.a, params.operation, params.b);
                ContentEnvelope::text(format!("{} = {}", expression, result))
                    .with_structured(json!({ "expression": expression, "result": result }))
            }
            Err(e) => e.into_envelope(),
        }
    }
}

#[async_trait]
impl ToolHandler for CalculateTool {
    async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
        let params: CalculateParams = input.parse()?;
        Ok(Self::execute(&params))
    }
}
