//! Google Gemini (Generative Language API) client.
//!
//! See: <https://ai.google.dev/api/generate-content>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::{TextProvider, build_turns};
use crate::types::{Message, Role};
use crate::{BifrostError, Result};

/// Default base URL for the Generative Language API
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the Gemini generateContent endpoint.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
        }
    }

    /// Check response status and map to the appropriate error.
    fn handle_response_errors(response: &reqwest::Response, model: &str) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            401 | 403 => Err(BifrostError::AuthenticationFailed),
            404 => Err(BifrostError::ModelNotFound(model.to_string())),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(BifrostError::RateLimited { retry_after })
            }
            code => Err(BifrostError::Api {
                status: code,
                message: format!("Gemini API error: {status}"),
            }),
        }
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn call(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        messages: Option<&[Message]>,
    ) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );

        let contents: Vec<Content> = build_turns(prompt, messages)
            .iter()
            .map(|m| Content {
                // Gemini has no assistant role; model turns are "model".
                role: match m.role {
                    Role::Assistant => "model",
                    _ => "user",
                }
                .to_string(),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();

        let body = GenerateContentRequest {
            contents,
            system_instruction: (!system.is_empty()).then(|| SystemInstruction {
                parts: vec![Part {
                    text: system.to_string(),
                }],
            }),
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        Self::handle_response_errors(&response, model)?;

        let result: GenerateContentResponse = response.json().await?;

        let candidate = result
            .candidates
            .into_iter()
            .next()
            .ok_or(BifrostError::EmptyResponse)?;

        if let Some(reason) = candidate.finish_reason
            && reason == "SAFETY"
        {
            return Err(BifrostError::ContentFiltered { reason });
        }

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();
        if text.is_empty() {
            return Err(BifrostError::EmptyResponse);
        }
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default = "default_role")]
    role: String,
    parts: Vec<Part>,
}

fn default_role() -> String {
    "model".to_string()
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}
