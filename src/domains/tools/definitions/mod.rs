//! Tool definitions.
//!
//! One file per tool. Each tool exposes `NAME`, `DESCRIPTION`, its input and
//! output schemas, and a `descriptor()` that pairs them with the handler.

mod calculate;
mod geocode;
mod greet;
mod image;
mod time;
mod weather;

pub use calculate::{CalculateParams, CalculateTool, Operation};
pub use geocode::{GeocodeParams, GeocodeTool};
pub use greet::{GreetParams, GreetTool};
pub use image::{GenerateImageParams, ImageTool};
pub use time::{TimeParams, TimeTool};
pub use weather::{WeatherParams, WeatherTool, describe_weather_code};
