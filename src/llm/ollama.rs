// src/llm/ollama.rs

use crate::error::Result;
use crate::llm::{handle_api_response, ChatMessage, CompletionRequest, CompletionService};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// --- Request Structs ---

#[derive(Serialize, Debug)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

// --- Response Structs ---

#[derive(Deserialize, Debug)]
struct OllamaChatResponse {
    message: Option<ChatMessage>,
    error: Option<String>,
}

pub struct Ollama {
    client: Client,
    base_url: String,
}

impl Ollama {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn extract_content(response: OllamaChatResponse) -> Result<String> {
    if let Some(err) = response.error {
        return Err(anyhow!("Ollama error: {}", err));
    }
    response
        .message
        .map(|m| m.content)
        .ok_or_else(|| anyhow!("No message in Ollama chat response"))
}

#[async_trait]
impl CompletionService for Ollama {
    fn name(&self) -> &str {
        "Ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request_payload = OllamaChatRequest {
            model: &request.model,
            messages: &request.messages,
            stream: request.stream,
        };

        debug!(?url, messages = request.messages.len(), "Sending chat request to Ollama");

        let response = self
            .client
            .post(&url)
            .timeout(request.timeout)
            .json(&request_payload)
            .send()
            .await
            .context(format!("Failed to send chat request to Ollama at {}", url))?;

        let ollama_response: OllamaChatResponse = handle_api_response(response, "Ollama chat").await?;
        extract_content(ollama_response)
    }
}
