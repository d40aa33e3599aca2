// src/test_support.rs

use crate::error::{NewsError, Result};
use crate::llm::{CompletionRequest, CompletionService};
use crate::news::NewsSource;
use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Completion backend that replays one canned reply and records every request.
pub struct FakeCompletion {
    reply: std::result::Result<String, String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn answering(text: &str) -> Self {
        Self { reply: Ok(text.to_string()), requests: Mutex::new(Vec::new()) }
    }

    pub fn failing(message: &str) -> Self {
        Self { reply: Err(message.to_string()), requests: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

/// Completion backend whose requests never finish.
pub struct HangingCompletion;

#[async_trait]
impl CompletionService for HangingCompletion {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        std::future::pending().await
    }
}

pub struct FakeNews {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl FakeNews {
    pub fn answering(text: &str) -> Self {
        Self { reply: Ok(text.to_string()), calls: AtomicUsize::new(0) }
    }

    pub fn failing(message: &str) -> Self {
        Self { reply: Err(message.to_string()), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsSource for FakeNews {
    async fn fetch_news(&self) -> std::result::Result<String, NewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(|e| NewsError::new(anyhow!(e)))
    }
}

// Lets a test keep a handle on the fake after boxing it into an assistant.
#[async_trait]
impl NewsSource for Arc<FakeNews> {
    async fn fetch_news(&self) -> std::result::Result<String, NewsError> {
        self.as_ref().fetch_news().await
    }
}
