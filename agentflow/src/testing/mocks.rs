//! Scripted completion clients for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

use crate::completion::CompletionClient;
use crate::errors::CompletionError;

/// A completion client that records prompts and replays queued responses.
///
/// Calls are numbered from 1. When the queue runs dry the default response is
/// returned; without one the call fails.
#[derive(Debug, Default)]
pub struct ScriptedCompletionClient {
    responses: Mutex<VecDeque<String>>,
    default_response: Option<String>,
    failure: Option<(usize, CompletionError)>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletionClient {
    /// Creates a client with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client that answers each call with the next response.
    #[must_use]
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Sets the response returned once the queue is empty.
    #[must_use]
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(response.into());
        self
    }

    /// Makes call number `call` fail with `message`.
    #[must_use]
    pub fn failing_on_call(mut self, call: usize, message: impl Into<String>) -> Self {
        self.failure = Some((call, CompletionError::new(message)));
        self
    }

    /// Sleeps before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Returns every prompt received, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Forgets recorded prompts.
    pub fn reset(&self) {
        self.prompts.lock().clear();
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let call = {
            let mut prompts = self.prompts.lock();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some((failing_call, err)) = &self.failure {
            if *failing_call == call {
                return Err(err.clone());
            }
        }

        let next = self.responses.lock().pop_front();
        next.or_else(|| self.default_response.clone())
            .ok_or_else(|| CompletionError::new(format!("No scripted response for call {call}")))
    }
}
