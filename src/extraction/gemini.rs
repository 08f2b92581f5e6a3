//! Google Gemini Vision client.
//!
//! Submits one multimodal generateContent request per scan: a fixed text
//! instruction plus the card image as inline base64 data.
//! Requires GEMINI_API_KEY environment variable.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ExtractionError;
use super::VisionModel;
use crate::config::GeminiConfig;

/// Gemini Vision client using Google's Generative AI API.
pub struct GeminiClient {
    config: GeminiConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiClient {
    /// Create a new client, reading the API key from the environment.
    pub fn new(config: GeminiConfig) -> Self {
        let api_key = config.api_key();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            api_key,
            client,
        }
    }

    /// Set the API key explicitly (overrides the environment).
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Check if the client has an API key to work with.
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Human-readable availability status for the `check` command.
    pub fn availability_hint(&self) -> String {
        if self.api_key.is_none() {
            "GEMINI_API_KEY not set. Get an API key from https://ai.google.dev/".to_string()
        } else {
            format!("Gemini Vision is available (model: {})", self.config.model)
        }
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(
        &self,
        mime_type: &str,
        image_base64: &str,
        instruction: &str,
    ) -> Result<String, ExtractionError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ExtractionError::RemoteCallFailed("GEMINI_API_KEY not set".into()))?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: mime_type.to_string(),
                            data: image_base64.to_string(),
                        },
                    },
                    GeminiPart::Text {
                        text: instruction.to_string(),
                    },
                ],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let url = format!("{}?key={}", self.config.generate_url(), api_key);

        debug!("Submitting {} image to {}", mime_type, self.config.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractionError::RemoteCallFailed(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!("Gemini API error ({}): {}", status, body);
            return Err(ExtractionError::RemoteCallFailed(format!(
                "Gemini API error ({})",
                status
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            ExtractionError::RemoteCallFailed(format!("Failed to parse response: {}", e))
        })?;

        if let Some(error) = gemini_response.error {
            return Err(ExtractionError::RemoteCallFailed(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        gemini_response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| ExtractionError::RemoteCallFailed("Gemini returned no candidates".into()))
    }
}
