//! Configuration management for the MCP server.
//!
//! Values start from defaults, then `.env` is loaded through `dotenvy` and
//! `MCP_*` environment variables override individual fields.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Upstream provider endpoints and HTTP client settings.
    pub providers: ProvidersConfig,

    /// Tool behavior settings.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Short description reported by the server info resource.
    pub description: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Hugging Face access token used by `generate_image`.
    pub hf_token: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("hf_token", &self.hf_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Base URL of the Nominatim-compatible geocoding service.
    pub geocoding_url: String,

    /// Base URL of the Open-Meteo-compatible forecast service.
    pub weather_url: String,

    /// Base URL of the Hugging Face inference API.
    pub image_url: String,

    /// Text-to-image model identifier.
    pub image_model: String,

    /// Inference steps requested from the image model.
    pub inference_steps: u32,

    /// User-Agent sent to every provider. Nominatim rejects anonymous clients.
    pub user_agent: String,

    /// TCP connect timeout for provider requests, in seconds.
    pub connect_timeout_secs: u64,
}

/// Tool behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Timezone used by `get_time` when the caller gives none.
    pub default_timezone: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://nominatim.openstreetmap.org".to_string(),
            weather_url: "https://api.open-meteo.com".to_string(),
            image_url: "https://api-inference.huggingface.co".to_string(),
            image_model: "black-forest-labs/FLUX.1-schnell".to_string(),
            inference_steps: 4,
            user_agent: format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            connect_timeout_secs: 10,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            default_timezone: "UTC".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "toolkit-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: env!("CARGO_PKG_DESCRIPTION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            providers: ProvidersConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` (after loading `.env`).
    ///
    /// Split out so `main` can install the subscriber before
    /// [`Config::from_env`] logs anything.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            level: env_value("MCP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

/// Read a variable, treating blank values as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`. The Hugging Face
    /// token also accepts the conventional `HF_TOKEN`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_value("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.credentials.hf_token = env_value("MCP_HF_TOKEN").or_else(|| env_value("HF_TOKEN"));
        if config.credentials.hf_token.is_some() {
            info!("Hugging Face token loaded from environment");
        } else {
            warn!("No Hugging Face token set (MCP_HF_TOKEN or HF_TOKEN); generate_image will report a configuration error");
        }

        let providers = &mut config.providers;
        if let Some(url) = env_value("MCP_GEOCODING_URL") {
            providers.geocoding_url = url;
        }
        if let Some(url) = env_value("MCP_WEATHER_URL") {
            providers.weather_url = url;
        }
        if let Some(url) = env_value("MCP_IMAGE_URL") {
            providers.image_url = url;
        }
        if let Some(model) = env_value("MCP_IMAGE_MODEL") {
            providers.image_model = model;
        }
        if let Some(steps) = env_value("MCP_IMAGE_STEPS") {
            match steps.parse() {
                Ok(steps) => providers.inference_steps = steps,
                Err(_) => warn!("Ignoring invalid MCP_IMAGE_STEPS value: {}", steps),
            }
        }
        if let Some(agent) = env_value("MCP_USER_AGENT") {
            providers.user_agent = agent;
        }
        if let Some(secs) = env_value("MCP_CONNECT_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => providers.connect_timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid MCP_CONNECT_TIMEOUT_SECS value: {}", secs),
            }
        }

        if let Some(tz) = env_value("MCP_DEFAULT_TIMEZONE") {
            config.tools.default_timezone = tz;
        }

        config
    }
}
