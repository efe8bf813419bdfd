use std::fmt;

use bytes::Bytes;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use super::endpoint;
use crate::core::config::ProvidersConfig;
use crate::domains::tools::ToolError;

const PROVIDER: &str = "Image generation service";
const DEFAULT_MIME: &str = "image/png";

/// The shapes an inference provider may hand back.
pub enum ProviderPayload {
    /// Bytes already buffered in memory.
    Bytes(Bytes),
    /// A live response whose body has not been read yet.
    Response(reqwest::Response),
    /// Any other byte stream.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    /// The provider answered with JSON instead of an image.
    Json(Value),
}

impl fmt::Debug for ProviderPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Response(r) => f.debug_tuple("Response").field(&r.status()).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Json(v) => f.debug_tuple("Json").field(v).finish(),
        }
    }
}

/// Read any payload shape to completion as raw image bytes.
pub async fn to_binary(payload: ProviderPayload) -> Result<Vec<u8>, ToolError> {
    let data = match payload {
        ProviderPayload::Bytes(bytes) => bytes.to_vec(),
        ProviderPayload::Response(resp) => resp
            .bytes()
            .await
            .map_err(|e| ToolError::upstream(PROVIDER, e))?
            .to_vec(),
        ProviderPayload::Reader(mut reader) => {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .await
                .map_err(|e| ToolError::upstream(PROVIDER, e))?;
            buf
        }
        ProviderPayload::Json(value) => {
            return Err(ToolError::unrecognized_payload(format!(
                "expected image bytes, received JSON: {}",
                value
            )));
        }
    };

    if data.is_empty() {
        return Err(ToolError::unrecognized_payload("empty image body"));
    }
    Ok(data)
}

/// An image response that has not been read yet.
#[derive(Debug)]
pub struct GeneratedImage {
    pub payload: ProviderPayload,
    pub mime_type: String,
}

/// Hugging Face text-to-image client.
#[derive(Clone)]
pub struct ImageClient {
    base: String,
    model: String,
    inference_steps: u32,
    http: Client,
}

impl ImageClient {
    pub fn new(http: Client, cfg: &ProvidersConfig) -> Self {
        Self {
            base: cfg.image_url.clone(),
            model: cfg.image_model.clone(),
            inference_steps: cfg.inference_steps,
            http,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request an image for `prompt`.
    ///
    /// A JSON answer with a success status is returned as
    /// [`ProviderPayload::Json`] so the caller can report it.
    pub async fn generate(&self, token: &str, prompt: &str) -> Result<GeneratedImage, ToolError> {
        let url = endpoint(&self.base, &format!("models/{}", self.model));
        debug!(%url, steps = self.inference_steps, "Image generation request");

        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({
                "inputs": prompt,
                "parameters": { "num_inference_steps": self.inference_steps }
            }))
            .send()
            .await
            .map_err(|e| ToolError::upstream(PROVIDER, e))?;
        if !resp.status().is_success() {
            return Err(ToolError::upstream_status(PROVIDER, resp.status().as_u16()));
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let value = resp
                .json()
                .await
                .map_err(|e| ToolError::upstream(PROVIDER, e))?;
            return Ok(GeneratedImage {
                payload: ProviderPayload::Json(value),
                mime_type: DEFAULT_MIME.to_string(),
            });
        }

        let mime_type = if content_type.starts_with("image/") {
            content_type
                .split(';')
                .next()
                .unwrap_or(DEFAULT_MIME)
                .trim()
                .to_string()
        } else {
            DEFAULT_MIME.to_string()
        };
        Ok(GeneratedImage {
            payload: ProviderPayload::Response(resp),
            mime_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::build_http_client;
    use httpmock::prelude::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn client(base: String) -> ImageClient {
        let cfg = ProvidersConfig {
            image_url: base,
            image_model: "test/model".to_string(),
            inference_steps: 4,
            ..ProvidersConfig::default()
        };
        ImageClient::new(build_http_client(&cfg).unwrap(), &cfg)
    }

    #[tokio::test]
    async fn test_to_binary_variants() {
        let bytes = to_binary(ProviderPayload::Bytes(Bytes::from_static(PNG)))
            .await
            .unwrap();
        assert_eq!(bytes, PNG);

        let reader = ProviderPayload::Reader(Box::new(std::io::Cursor::new(PNG.to_vec())));
        assert_eq!(to_binary(reader).await.unwrap(), PNG);
    }

    #[tokio::test]
    async fn test_to_binary_rejects_json_and_empty() {
        let err = to_binary(ProviderPayload::Json(json!({"error": "loading"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnrecognizedPayloadShape(_)));

        let err = to_binary(ProviderPayload::Bytes(Bytes::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnrecognizedPayloadShape(_)));
    }

    #[tokio::test]
    async fn it_posts_prompt_with_bearer_token() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/models/test/model")
                .header("authorization", "Bearer hf_secret")
                .json_body(json!({
                    "inputs": "a red fox",
                    "parameters": {"num_inference_steps": 4}
                }));
            then.status(200)
                .header("content-type", "image/png")
                .body(PNG);
        });

        let image = client(server.base_url())
            .generate("hf_secret", "a red fox")
            .await
            .unwrap();
        m.assert();
        assert_eq!(image.mime_type, "image/png");
        assert!(matches!(image.payload, ProviderPayload::Response(_)));
        assert_eq!(to_binary(image.payload).await.unwrap(), PNG);
    }

    #[tokio::test]
    async fn it_surfaces_json_answers() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/models/test/model");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"estimated_time": 20.0}));
        });

        let image = client(server.base_url())
            .generate("hf_secret", "a red fox")
            .await
            .unwrap();
        assert!(matches!(image.payload, ProviderPayload::Json(_)));
    }

    #[tokio::test]
    async fn it_reports_upstream_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/models/test/model");
            then.status(401);
        });

        let err = client(server.base_url())
            .generate("bad", "a red fox")
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UpstreamStatus { status: 401, .. }));
    }
}
