// src/assistant.rs

use crate::config::Config;
use crate::error::{CompletionError, NewsError};
use crate::filter::filter_advertisements;
use crate::llm::{CompletionRequest, CompletionService};
use crate::news::{LlmNewsSource, NewsSource};
use crate::prompt::{build_messages, BOT_STYLE};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Answers questions through a completion service and fetches news through a news source.
pub struct Assistant {
    service: Arc<dyn CompletionService>,
    news: Box<dyn NewsSource>,
    bot_style: String,
    model: String,
    timeout: Duration,
    history: Vec<(String, String)>,
    history_turns: usize,
}

impl Assistant {
    pub fn new(
        service: Arc<dyn CompletionService>,
        news: Box<dyn NewsSource>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            news,
            bot_style: BOT_STYLE.to_string(),
            model: model.into(),
            timeout,
            history: Vec::new(),
            history_turns: 0,
        }
    }

    /// Wires the news branch to the same completion service.
    pub fn from_config(config: &Config, service: Arc<dyn CompletionService>) -> Self {
        let model = config.get_active_model_name().to_string();
        let news = LlmNewsSource::new(service.clone(), model.clone(), config.timeout());
        Self::new(service, Box::new(news), model, config.timeout()).with_history(config.history_turns)
    }

    pub fn with_history(mut self, turns: usize) -> Self {
        self.history_turns = turns;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.service.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[cfg(test)]
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    #[instrument(skip(self, user_input), fields(provider = self.service.name(), model = %self.model))]
    pub async fn get_interactive_response(&mut self, user_input: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: build_messages(&self.bot_style, &self.history, user_input),
            stream: false,
            timeout: self.timeout,
        };

        let raw = self.service.complete(&request).await.map_err(|e| {
            warn!(error = %e, "Completion request failed");
            CompletionError::new(e)
        })?;
        let answer = filter_advertisements(&raw);
        debug!(raw_chars = raw.len(), kept_chars = answer.len(), "Filtered completion");

        self.remember(user_input, &answer);
        Ok(answer)
    }

    pub async fn get_news_response(&self) -> Result<String, NewsError> {
        self.news.fetch_news().await
    }

    fn remember(&mut self, question: &str, answer: &str) {
        if self.history_turns == 0 {
            return;
        }
        self.history.push((question.to_string(), answer.to_string()));
        if self.history.len() > self.history_turns {
            let excess = self.history.len() - self.history_turns;
            self.history.drain(..excess);
        }
    }
}
