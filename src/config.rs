// src/config.rs
use crate::error::Result;
use anyhow::{anyhow, Context};
use std::time::Duration;
use std::{env, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Ollama,
    Groq,
    OpenAi,
}

impl LlmProvider {
    pub fn get_provider_name(&self) -> &str {
        match self {
            LlmProvider::Ollama => "Ollama",
            LlmProvider::Groq => "Groq",
            LlmProvider::OpenAi => "OpenAI",
        }
    }

    pub fn get_provider_api_key_name(&self) -> &str {
        match self {
            LlmProvider::Ollama => "",
            LlmProvider::Groq => "GROQ_API_KEY",
            LlmProvider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "groq" => Ok(LlmProvider::Groq),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(anyhow!(
                "Unknown provider: '{}'. Available: ollama, groq, openai",
                other
            )),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_provider_name())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // General
    pub active_provider: LlmProvider,
    pub timeout_secs: u64,
    pub history_turns: usize,

    // Ollama specific
    pub ollama_base_url: String,
    pub ollama_model: String,

    // Groq specific
    pub groq_api_key: Option<String>,
    pub groq_api_base_url: String,
    pub groq_model: String,

    // OpenAI specific
    pub openai_api_key: Option<String>,
    pub openai_api_base_url: String,
    pub openai_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            active_provider: LlmProvider::Ollama,
            timeout_secs: 30,
            history_turns: 3,
            // Ollama
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
            // Groq
            groq_api_key: None,
            groq_api_base_url: "https://api.groq.com/openai/v1".to_string(),
            groq_model: "llama3-8b-8192".to_string(),
            // OpenAI
            openai_api_key: None,
            openai_api_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source; `load` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(name) = lookup("NEWS_CHAT_PROVIDER") {
            config.active_provider = LlmProvider::parse(&name)?;
        }
        if let Some(raw) = lookup("NEWS_CHAT_TIMEOUT_SECS") {
            config.timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("NEWS_CHAT_TIMEOUT_SECS must be a number of seconds, got '{}'", raw))?;
            if config.timeout_secs == 0 {
                return Err(anyhow!("NEWS_CHAT_TIMEOUT_SECS must be greater than 0"));
            }
        }
        if let Some(raw) = lookup("NEWS_CHAT_HISTORY_TURNS") {
            config.history_turns = raw
                .trim()
                .parse()
                .with_context(|| format!("NEWS_CHAT_HISTORY_TURNS must be a whole number, got '{}'", raw))?;
        }

        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            config.ollama_base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            config.ollama_model = model;
        }

        config.groq_api_key = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(url) = lookup("GROQ_API_BASE_URL") {
            config.groq_api_base_url = url;
        }
        if let Some(model) = lookup("GROQ_MODEL") {
            config.groq_model = model;
        }

        config.openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(url) = lookup("OPENAI_API_BASE_URL") {
            config.openai_api_base_url = url;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            config.openai_model = model;
        }

        if config.active_provider != LlmProvider::Ollama && config.get_active_api_key().is_none() {
            eprintln!(
                "Warning: {} environment variable not set.",
                config.active_provider.get_provider_api_key_name()
            );
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    // Helper to get the currently active model name
    pub fn get_active_model_name(&self) -> &str {
        match self.active_provider {
            LlmProvider::Ollama => &self.ollama_model,
            LlmProvider::Groq => &self.groq_model,
            LlmProvider::OpenAi => &self.openai_model,
        }
    }

    // Helper to get the API key for the active provider (if applicable)
    pub fn get_active_api_key(&self) -> Option<&str> {
        match self.active_provider {
            LlmProvider::Ollama => None,
            LlmProvider::Groq => self.groq_api_key.as_deref(),
            LlmProvider::OpenAi => self.openai_api_key.as_deref(),
        }
    }
}
