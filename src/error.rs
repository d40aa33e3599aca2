// src/error.rs

use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

/// Marker every completion failure starts with when shown to the user.
pub const ERROR_MARKER: &str = "Ошибка при получении ответа";

/// The completion service could not produce an answer.
#[derive(Debug, Error)]
#[error("{}: {:#}", ERROR_MARKER, .source)]
pub struct CompletionError {
    #[source]
    source: anyhow::Error,
}

impl CompletionError {
    pub fn new(source: anyhow::Error) -> Self {
        Self { source }
    }
}

/// The news digest could not be fetched.
#[derive(Debug, Error)]
#[error("Ошибка при получении новостей: {source:#}")]
pub struct NewsError {
    #[source]
    source: anyhow::Error,
}

impl NewsError {
    pub fn new(source: anyhow::Error) -> Self {
        Self { source }
    }
}
