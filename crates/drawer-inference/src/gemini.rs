//! Gemini generation backend implementation.
//!
//! Speaks the `generateContent` REST API: a prompt part plus an optional
//! inline base64 document part. The call is an opaque capability from
//! the caller's perspective — no retries, no fallback; a failure here is
//! a terminal failure of the current operation.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use drawer_core::{defaults, Error, FilePart, GenerationBackend, Result};

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_URL: &str = defaults::GEMINI_BASE_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = defaults::GEN_TIMEOUT_SECS;

/// Gemini generation backend.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiBackend {
    /// Create a new Gemini backend with custom configuration.
    pub fn with_config(base_url: String, api_key: String, model: String) -> Self {
        let timeout_secs = std::env::var("DRAWER_GEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(GEN_TIMEOUT_SECS);

        info!(
            subsystem = "inference",
            component = "gemini",
            model = %model,
            base_url = %base_url,
            timeout_secs,
            "Initializing Gemini backend"
        );

        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; `GEMINI_BASE_URL` and `GEMINI_MODEL`
    /// fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY is not set".to_string()))?;
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_URL.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string());
        Ok(Self::with_config(base_url, api_key, model))
    }
}

// ---------------------------------------------------------------------------
// Wire types (generateContent)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts; empty when the
    /// model returned nothing usable.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(
        &self,
        prompt: &str,
        file: Option<&FilePart>,
        max_output_tokens: u32,
    ) -> Result<String> {
        let start = Instant::now();

        let mut parts = vec![RequestPart::Text {
            text: prompt.to_string(),
        }];
        if let Some(file) = file {
            parts.push(RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: file.mime_type.clone(),
                    data: base64::engine::general_purpose::STANDARD.encode(&file.data),
                },
            });
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig { max_output_tokens },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Generation API returned {}: {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse generation response: {}", e)))?;

        let text = result.text();
        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            model = %self.model,
            prompt_len = prompt.len(),
            response_len = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "generation complete"
        );
        Ok(text)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);
        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
