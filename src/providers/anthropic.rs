//! Anthropic Messages API client.
//!
//! See: <https://docs.anthropic.com/en/api/messages>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::{TextProvider, build_turns};
use crate::types::{Message, Role};
use crate::{BifrostError, Result};

/// Default base URL for the Anthropic API
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Client for the Anthropic Messages endpoint.
#[derive(Clone)]
pub struct ClaudeProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl ClaudeProvider {
    /// Create a new Anthropic client with the given API key.
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
            401 => Err(BifrostError::AuthenticationFailed),
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
            // Anthropic uses 529 for overload; keep the marker word in the
            // message so the transient classifier picks it up.
            529 => Err(BifrostError::Api {
                status: 529,
                message: "Anthropic API overloaded".to_string(),
            }),
            code => Err(BifrostError::Api {
                status: code,
                message: format!("Anthropic API error: {status}"),
            }),
        }
    }
}

#[async_trait]
impl TextProvider for ClaudeProvider {
    fn name(&self) -> &str {
        "claude"
    }

    async fn call(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        messages: Option<&[Message]>,
    ) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);

        let turns: Vec<Turn> = build_turns(prompt, messages)
            .iter()
            .map(|m| Turn {
                role: match m.role {
                    Role::Assistant => "assistant",
                    _ => "user",
                },
                content: m.content.clone(),
            })
            .collect();

        let body = MessagesRequest {
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            system: (!system.is_empty()).then_some(system),
            messages: turns,
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        Self::handle_response_errors(&response, model)?;

        let result: MessagesResponse = response.json().await?;

        let text: String = result
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();
        if text.is_empty() {
            return Err(BifrostError::EmptyResponse);
        }
        Ok(text)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Turn>,
}

#[derive(Serialize)]
struct Turn {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// One response content block. Non-text blocks deserialize with
/// `text: None` and are skipped.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}
