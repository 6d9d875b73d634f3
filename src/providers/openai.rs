//! OpenAI Chat Completions API client.
//!
//! See: <https://platform.openai.com/docs/api-reference/chat>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::{TextProvider, build_turns};
use crate::types::{Message, Role};
use crate::{BifrostError, Result};

/// Default base URL for the OpenAI API
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client for the Chat Completions endpoint.
#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI client with the given API key.
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
            code => Err(BifrostError::Api {
                status: code,
                message: format!("OpenAI API error: {status}"),
            }),
        }
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn call(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        messages: Option<&[Message]>,
    ) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut turns: Vec<Turn> = Vec::new();
        if !system.is_empty() {
            turns.push(Turn {
                role: "system",
                content: system.to_string(),
            });
        }
        turns.extend(build_turns(prompt, messages).iter().map(|m| Turn {
            role: match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: m.content.clone(),
        }));

        let body = ChatCompletionRequest {
            model,
            messages: turns,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        Self::handle_response_errors(&response, model)?;

        let result: ChatCompletionResponse = response.json().await?;

        let choice = result
            .choices
            .into_iter()
            .next()
            .ok_or(BifrostError::EmptyResponse)?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(BifrostError::ContentFiltered {
                reason: "content_filter".to_string(),
            });
        }

        match choice.message.content {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(BifrostError::EmptyResponse),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Turn>,
}

#[derive(Serialize)]
struct Turn {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
