//! Structured result produced by one stage invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StageKind;

/// Typed result returned by a stage.
///
/// The field map's shape depends on the stage kind; it always contains the
/// kind's primary field. Results are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    stage: StageKind,
    completed_at: DateTime<Utc>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl StageResult {
    /// Creates a result stamped with the current time.
    #[must_use]
    pub fn new(stage: StageKind, fields: Map<String, Value>) -> Self {
        Self {
            stage,
            completed_at: Utc::now(),
            fields,
        }
    }

    /// Builds the result a stage would produce for `input` and `text`.
    #[must_use]
    pub fn from_completion(stage: StageKind, input: &str, text: &str) -> Self {
        Self::new(stage, stage.shape(input, text))
    }

    /// Returns the stage kind that produced this result.
    #[must_use]
    pub fn stage(&self) -> StageKind {
        self.stage
    }

    /// Returns when the result was produced.
    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Returns all fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Gets a field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the text forwarded to the next stage, or `""` if absent.
    #[must_use]
    pub fn primary_text(&self) -> &str {
        self.get(self.stage.primary_field())
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns the writer's word count, if present.
    #[must_use]
    pub fn word_count(&self) -> Option<u64> {
        self.get("word_count").and_then(Value::as_u64)
    }

    /// Returns the field map as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
