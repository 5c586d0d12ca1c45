//! Test fixtures for orchestrator testing.

use std::sync::Arc;

use super::ScriptedCompletionClient;
use crate::events::{CollectingEventSink, Telemetry};
use crate::pipeline::{AgentOrchestrator, Performance, WorkflowResult};
use crate::stages::{StageKind, StageResult};

/// Builds a completed run with the given stage timings.
///
/// `stage_times_ms` is ordered research, analysis, writer, review.
#[must_use]
pub fn sample_workflow_result(
    workflow_id: &str,
    stage_times_ms: [f64; 4],
    total_time_ms: f64,
) -> WorkflowResult {
    let [research_time_ms, analysis_time_ms, writing_time_ms, review_time_ms] = stage_times_ms;

    WorkflowResult {
        workflow_id: workflow_id.to_string(),
        topic: "topic".to_string(),
        research_output: StageResult::from_completion(StageKind::Research, "topic", "findings"),
        analysis_output: StageResult::from_completion(StageKind::Analysis, "findings", "insights"),
        writing_output: StageResult::from_completion(StageKind::Writer, "insights", "report"),
        review_output: StageResult::from_completion(StageKind::Review, "report", "assessment"),
        performance: Performance {
            research_time_ms,
            analysis_time_ms,
            writing_time_ms,
            review_time_ms,
            total_time_ms,
        },
    }
}

/// An orchestrator wired to a scripted client and a collecting sink.
#[derive(Debug)]
pub struct OrchestratorFixture {
    /// Orchestrator under test.
    pub orchestrator: AgentOrchestrator,
    /// Client shared by all four stages.
    pub client: Arc<ScriptedCompletionClient>,
    /// Sink receiving every telemetry event.
    pub sink: Arc<CollectingEventSink>,
}

impl OrchestratorFixture {
    /// Wires a fixture around `client`.
    #[must_use]
    pub fn new(client: ScriptedCompletionClient) -> Self {
        Self::with_capacity(client, None)
    }

    /// Wires a fixture whose histories are capped at `capacity`.
    #[must_use]
    pub fn with_capacity(client: ScriptedCompletionClient, capacity: Option<usize>) -> Self {
        let client = Arc::new(client);
        let sink = Arc::new(CollectingEventSink::new());
        let orchestrator = AgentOrchestrator::new(client.clone(), Telemetry::new(sink.clone()))
            .with_history_capacity(capacity);

        Self {
            orchestrator,
            client,
            sink,
        }
    }

    /// Fixture whose client answers every call with `response`.
    #[must_use]
    pub fn answering(response: &str) -> Self {
        Self::new(ScriptedCompletionClient::new().with_default_response(response))
    }
}
