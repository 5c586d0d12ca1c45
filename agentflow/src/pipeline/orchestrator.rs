//! Sequential four-stage orchestrator.

use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

use super::stats::{agent_performance, workflow_statistics, AgentPerformance, WorkflowStatistics};
use super::{Performance, WorkflowResult};
use crate::completion::CompletionClient;
use crate::config::Settings;
use crate::errors::CompletionError;
use crate::events::Telemetry;
use crate::history::HistoryLog;
use crate::observability::SpanTimer;
use crate::stages::{Stage, StageKind, StageResult};

/// Name under which whole-workflow metrics are reported.
pub const ORCHESTRATOR_NAME: &str = "Orchestrator";

/// Runs research, analysis, writer and review in order.
///
/// The orchestrator owns one instance of each stage and an append-only run
/// history. A run either completes all four stages and is recorded, or fails
/// at the first stage error and leaves the history untouched.
///
/// Workflow ids are claimed when a run starts, so overlapping runs on a
/// shared orchestrator never share an id.
#[derive(Debug)]
pub struct AgentOrchestrator {
    research: Stage,
    analysis: Stage,
    writer: Stage,
    review: Stage,
    telemetry: Telemetry,
    history: HistoryLog<WorkflowResult>,
    issued_ids: Mutex<HashMap<String, usize>>,
}

impl AgentOrchestrator {
    /// Creates an orchestrator whose stages share `client` and `telemetry`.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, telemetry: Telemetry) -> Self {
        let stage = |kind| Stage::new(kind, Arc::clone(&client), telemetry.clone());
        Self {
            research: stage(StageKind::Research),
            analysis: stage(StageKind::Analysis),
            writer: stage(StageKind::Writer),
            review: stage(StageKind::Review),
            telemetry: telemetry.clone(),
            history: HistoryLog::unbounded(),
            issued_ids: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an orchestrator honoring the configured history capacity.
    #[must_use]
    pub fn from_settings(
        settings: &Settings,
        client: Arc<dyn CompletionClient>,
        telemetry: Telemetry,
    ) -> Self {
        Self::new(client, telemetry).with_history_capacity(settings.history_capacity)
    }

    /// Caps the run history and every stage history.
    #[must_use]
    pub fn with_history_capacity(self, capacity: Option<usize>) -> Self {
        Self {
            research: self.research.with_history_capacity(capacity),
            analysis: self.analysis.with_history_capacity(capacity),
            writer: self.writer.with_history_capacity(capacity),
            review: self.review.with_history_capacity(capacity),
            telemetry: self.telemetry,
            history: HistoryLog::with_capacity(capacity),
            issued_ids: self.issued_ids,
        }
    }

    /// Returns the stage instance for `kind`.
    #[must_use]
    pub fn stage(&self, kind: StageKind) -> &Stage {
        match kind {
            StageKind::Research => &self.research,
            StageKind::Analysis => &self.analysis,
            StageKind::Writer => &self.writer,
            StageKind::Review => &self.review,
        }
    }

    /// Returns the recorded runs, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<WorkflowResult> {
        self.history.snapshot()
    }

    /// Returns the number of recorded runs.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Runs the full pipeline on `topic`.
    ///
    /// Each stage receives the previous stage's primary text verbatim. The
    /// first stage failure aborts the run and is returned unchanged.
    pub async fn execute_workflow(&self, topic: &str) -> Result<WorkflowResult, CompletionError> {
        let total = SpanTimer::start("workflow");
        let workflow_id = self.next_workflow_id();
        let span = info_span!("workflow", workflow_id = %workflow_id, topic = %topic);

        async move {
            info!("Starting workflow {} for topic: {}", workflow_id, topic);

            let (research_output, research_time_ms) =
                self.run_stage(StageKind::Research, topic).await?;
            let (analysis_output, analysis_time_ms) = self
                .run_stage(StageKind::Analysis, research_output.primary_text())
                .await?;
            let (writing_output, writing_time_ms) = self
                .run_stage(StageKind::Writer, analysis_output.primary_text())
                .await?;
            let (review_output, review_time_ms) = self
                .run_stage(StageKind::Review, writing_output.primary_text())
                .await?;

            let performance = Performance {
                research_time_ms,
                analysis_time_ms,
                writing_time_ms,
                review_time_ms,
                total_time_ms: total.finish(),
            };

            let result = WorkflowResult {
                workflow_id,
                topic: topic.to_string(),
                research_output,
                analysis_output,
                writing_output,
                review_output,
                performance,
            };

            self.history.push(result.clone());
            self.telemetry.metrics(ORCHESTRATOR_NAME, performance.to_value());
            info!(
                total_time_ms = performance.total_time_ms,
                "Workflow {} completed in {:.2}ms",
                result.workflow_id,
                performance.total_time_ms
            );

            Ok::<_, CompletionError>(result)
        }
        .instrument(span)
        .await
    }

    async fn run_stage(
        &self,
        kind: StageKind,
        input: &str,
    ) -> Result<(StageResult, f64), CompletionError> {
        let span = match kind {
            StageKind::Research => info_span!("research_stage"),
            StageKind::Analysis => info_span!("analysis_stage"),
            StageKind::Writer => info_span!("writing_stage"),
            StageKind::Review => info_span!("review_stage"),
        };
        async {
            let timer = SpanTimer::start(kind.span_name());
            let output = self.stage(kind).execute(input).await?;
            let elapsed_ms = timer.finish();
            self.telemetry
                .metrics(kind.agent_name(), json!({ "execution_time_ms": elapsed_ms }));
            Ok::<_, CompletionError>((output, elapsed_ms))
        }
        .instrument(span)
        .await
    }

    fn next_workflow_id(&self) -> String {
        let base = format!("workflow_{}", chrono::Utc::now().timestamp());
        claim_id(&mut self.issued_ids.lock(), base)
    }

    /// Aggregates figures over all recorded runs.
    #[must_use]
    pub fn get_workflow_statistics(&self) -> WorkflowStatistics {
        self.history.read(|runs| workflow_statistics(runs))
    }

    /// Aggregates timing figures for one agent.
    ///
    /// Accepts stage names (`"Writer"`), agent names (`"WriterAgent"`) and
    /// metric prefixes (`"writing"`).
    #[must_use]
    pub fn get_agent_performance(&self, agent_name: &str) -> AgentPerformance {
        self.history.read(|runs| agent_performance(runs, agent_name))
    }
}

/// Claims the next id for `base`: `base` itself, then `base-2`, `base-3`, ...
fn claim_id(issued: &mut HashMap<String, usize>, base: String) -> String {
    let count = issued.entry(base.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        base
    } else {
        format!("{base}-{count}")
    }
}
