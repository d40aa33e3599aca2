// src/llm/openai_compatible.rs

use crate::error::Result;
use crate::llm::{handle_api_response, ChatMessage, CompletionRequest, CompletionService};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

// --- Request Structures ---

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

// --- Response Structures ---

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    // Error structure can vary, sometimes it's top-level
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ResponseMessage,
    finish_reason: Option<String>, // e.g., "stop", "length"
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>, // Content can sometimes be null
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>, // e.g., "invalid_request_error"
    code: Option<serde_json::Value>, // string on OpenAI, sometimes numeric elsewhere
}

/// Any server speaking the `/chat/completions` dialect (Groq, OpenAI, local proxies).
pub struct OpenAiCompatible {
    label: &'static str,
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatible {
    pub fn new(label: &'static str, client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            label,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

fn build_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut auth_value =
        HeaderValue::from_str(&format!("Bearer {}", api_key)).context("Invalid API key format")?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    Ok(headers)
}

fn extract_content(response: ChatCompletionResponse) -> Result<String> {
    if let Some(api_error) = response.error {
        error!(?api_error, "API returned an error in the response body");
        return Err(anyhow!(
            "API Error: {} (Type: {:?}, Code: {:?})",
            api_error.message,
            api_error.error_type,
            api_error.code
        ));
    }

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Response contained no choices"))?;
    if choice.finish_reason.as_deref() == Some("length") {
        debug!("Completion was cut off by the token limit");
    }
    choice
        .message
        .content
        .ok_or_else(|| anyhow!("Failed to extract text content from response choices"))
}

#[async_trait]
impl CompletionService for OpenAiCompatible {
    fn name(&self) -> &str {
        self.label
    }

    #[instrument(skip(self, request), fields(provider = self.label, model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            anyhow!("API key for {} is not set. Set it in the environment or .env file.", self.label)
        })?;
        let url = format!("{}/chat/completions", self.base_url);
        let headers = build_headers(api_key)?;

        let request_payload = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            stream: request.stream,
        };

        debug!(?url, messages = request.messages.len(), "Sending chat completion request"); // Don't log full payload

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(request.timeout)
            .json(&request_payload)
            .send()
            .await
            .context(format!("Failed to send request to {}", url))?;

        let parsed_response: ChatCompletionResponse = handle_api_response(response, "chat completion")
            .await
            .context(format!("{} API generate call failed", self.label))?;
        extract_content(parsed_response)
    }
}
