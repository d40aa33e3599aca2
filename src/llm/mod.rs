// src/llm/mod.rs
pub mod ollama;
pub mod openai_compatible;

use crate::config::{Config, LlmProvider};
use crate::error::Result;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// One non-streaming chat completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub timeout: Duration,
}

/// A chat-completion backend: ordered messages in, assistant text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Picks the backend for the configured provider.
pub fn build_service(config: &Config, client: &Client) -> Arc<dyn CompletionService> {
    match config.active_provider {
        LlmProvider::Ollama => Arc::new(ollama::Ollama::new(client.clone(), &config.ollama_base_url)),
        LlmProvider::Groq => Arc::new(openai_compatible::OpenAiCompatible::new(
            "Groq",
            client.clone(),
            &config.groq_api_base_url,
            config.groq_api_key.clone(),
        )),
        LlmProvider::OpenAi => Arc::new(openai_compatible::OpenAiCompatible::new(
            "OpenAI",
            client.clone(),
            &config.openai_api_base_url,
            config.openai_api_key.clone(),
        )),
    }
}

// --- Helper function to handle API responses ---
pub(crate) async fn handle_api_response<T: serde::de::DeserializeOwned + std::fmt::Debug>(
    response: reqwest::Response,
    operation_name: &str,
) -> Result<T> {
    let status = response.status();
    let response_bytes = response
        .bytes()
        .await
        .context(format!("Failed to read {} response body", operation_name))?;
    parse_api_body(status, &response_bytes, operation_name)
}

pub(crate) fn parse_api_body<T: serde::de::DeserializeOwned + std::fmt::Debug>(
    status: reqwest::StatusCode,
    body: &[u8],
    operation_name: &str,
) -> Result<T> {
    match serde_json::from_slice::<T>(body) {
        Ok(parsed_response) => {
            debug!(?parsed_response, "Successfully parsed {} response", operation_name);
            Ok(parsed_response)
        }
        Err(parse_error) => {
            let body_string = String::from_utf8_lossy(body);
            error!(
                status = ?status,
                error = ?parse_error,
                response_body = ?body_string,
                "Failed to parse {} response", operation_name
            );
            let base_msg = if status.is_success() {
                format!("Failed to parse successful {} response", operation_name)
            } else {
                format!("API {} request failed", operation_name)
            };
            Err(anyhow!("{} (Status: {}): {}. Body: {:.200}", base_msg, status, parse_error, body_string))
        }
    }
}
