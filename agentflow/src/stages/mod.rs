//! Pipeline stages.
//!
//! A [`Stage`] pairs a [`StageKind`] (prompt template, field names, result
//! shaping) with a completion client. Every stage keeps its own log of the
//! results it produced; the orchestrator never reads it.

mod kind;
pub mod prompts;
mod result;

pub use kind::{
    word_count, StageKind, ANALYSIS_CONFIDENCE, INPUT_SUMMARY_CHARS, REVIEW_QUALITY_SCORE,
};
pub use result::StageResult;

use crate::completion::CompletionClient;
use crate::errors::CompletionError;
use crate::events::Telemetry;
use crate::history::HistoryLog;
use crate::observability::SpanTimer;
use serde_json::{json, Map};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

/// Characters of input included in stage log lines.
const LOG_PREVIEW_CHARS: usize = 100;

/// One step of the pipeline.
pub struct Stage {
    kind: StageKind,
    client: Arc<dyn CompletionClient>,
    telemetry: Telemetry,
    history: HistoryLog<StageResult>,
}

impl Stage {
    /// Creates a stage with an unbounded history.
    #[must_use]
    pub fn new(kind: StageKind, client: Arc<dyn CompletionClient>, telemetry: Telemetry) -> Self {
        Self {
            kind,
            client,
            telemetry,
            history: HistoryLog::unbounded(),
        }
    }

    /// Caps the stage's result history.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: Option<usize>) -> Self {
        self.history = HistoryLog::with_capacity(capacity);
        self
    }

    /// Returns the stage kind.
    #[must_use]
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.agent_name()
    }

    /// Returns the agent description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    /// Runs the stage on `input`.
    ///
    /// Completion failures are reported to telemetry and returned unchanged.
    pub async fn execute(&self, input: &str) -> Result<StageResult, CompletionError> {
        let agent = self.name();
        let timer = SpanTimer::start(agent);

        let mut attributes = Map::new();
        attributes.insert("input_len".to_string(), json!(input.chars().count()));
        self.telemetry.agent_start(agent, "execute", attributes);

        info!(
            agent = agent,
            input = %preview(input),
            "Stage {} started", self.kind.position()
        );

        let prompt = self.kind.render_prompt(input);
        let text = match self.client.generate(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                self.telemetry.agent_error(agent, &err.to_string(), "execute");
                return Err(err);
            }
        };

        let result = StageResult::from_completion(self.kind, input, &text);
        self.history.push(result.clone());

        let elapsed_ms = timer.finish();
        self.telemetry.agent_end(agent, "StageResult", elapsed_ms);
        info!(agent = agent, elapsed_ms, "Agent {} completed in {:.2}ms", agent, elapsed_ms);

        Ok(result)
    }

    /// Checks that `output` is an object carrying this stage's primary field.
    #[must_use]
    pub fn validate_output(&self, output: &serde_json::Value) -> bool {
        self.kind.validate(output)
    }

    /// Returns every result this stage produced, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<StageResult> {
        self.history.snapshot()
    }

    /// Returns the number of retained results.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("kind", &self.kind)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

fn preview(input: &str) -> String {
    let mut chars = input.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
