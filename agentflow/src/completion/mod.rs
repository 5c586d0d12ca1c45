//! Completion client boundary.
//!
//! Stages see only [`CompletionClient`]: a prompt goes in, generated text
//! comes out. Transport, request formatting and response parsing live in
//! the implementations.

mod openai;

pub use openai::OpenAiClient;

use crate::errors::CompletionError;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Trait for language-model completion backends.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generates text for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError>;
}
