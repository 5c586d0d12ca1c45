//! Output of one complete pipeline run.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::stages::{StageKind, StageResult};

/// Wall-clock timings of one run, in milliseconds.
///
/// `total_time_ms` is measured around the whole stage sequence on its own
/// and is not the sum of the stage times.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Performance {
    /// Research stage duration.
    pub research_time_ms: f64,
    /// Analysis stage duration.
    pub analysis_time_ms: f64,
    /// Writer stage duration.
    pub writing_time_ms: f64,
    /// Review stage duration.
    pub review_time_ms: f64,
    /// Whole-workflow duration.
    pub total_time_ms: f64,
}

impl Performance {
    /// Returns the recorded duration of one stage.
    #[must_use]
    pub fn stage_time_ms(&self, kind: StageKind) -> f64 {
        match kind {
            StageKind::Research => self.research_time_ms,
            StageKind::Analysis => self.analysis_time_ms,
            StageKind::Writer => self.writing_time_ms,
            StageKind::Review => self.review_time_ms,
        }
    }

    /// Looks a timing up by its stored key (e.g. `writing_time_ms`).
    #[must_use]
    pub fn get(&self, metric_key: &str) -> Option<f64> {
        if metric_key == "total_time_ms" {
            return Some(self.total_time_ms);
        }
        StageKind::ALL
            .iter()
            .find(|kind| kind.metric_key() == metric_key)
            .map(|kind| self.stage_time_ms(*kind))
    }

    /// Converts to the metrics payload emitted for a workflow.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "research_time_ms": self.research_time_ms,
            "analysis_time_ms": self.analysis_time_ms,
            "writing_time_ms": self.writing_time_ms,
            "review_time_ms": self.review_time_ms,
            "total_time_ms": self.total_time_ms,
        })
    }
}

/// Full output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Timestamp-derived run identifier.
    pub workflow_id: String,
    /// The topic the run started from.
    pub topic: String,
    /// Research stage result.
    pub research_output: StageResult,
    /// Analysis stage result.
    pub analysis_output: StageResult,
    /// Writer stage result.
    pub writing_output: StageResult,
    /// Review stage result.
    pub review_output: StageResult,
    /// Stage and total timings.
    pub performance: Performance,
}

impl WorkflowResult {
    /// Returns the result of one stage.
    #[must_use]
    pub fn output(&self, kind: StageKind) -> &StageResult {
        match kind {
            StageKind::Research => &self.research_output,
            StageKind::Analysis => &self.analysis_output,
            StageKind::Writer => &self.writing_output,
            StageKind::Review => &self.review_output,
        }
    }
}
