//! Workflow orchestration.
//!
//! This module provides:
//! - The sequential [`AgentOrchestrator`]
//! - Per-run results and timings
//! - Statistics over the run history
//! - A demo run over the default topic

mod orchestrator;
mod result;
mod stats;

mod integration_tests;

pub use orchestrator::{AgentOrchestrator, ORCHESTRATOR_NAME};
pub use result::{Performance, WorkflowResult};
pub use stats::{
    agent_performance, workflow_statistics, AgentPerformance, TimingSummary, WorkflowStatistics,
};

use crate::errors::CompletionError;
use tracing::info;

/// Topic used when none is supplied.
pub const DEFAULT_TOPIC: &str = "Artificial Intelligence and Machine Learning in Enterprise";

/// Runs one workflow over [`DEFAULT_TOPIC`] and logs the resulting statistics.
pub async fn demo_workflow(
    orchestrator: &AgentOrchestrator,
) -> Result<WorkflowResult, CompletionError> {
    info!("Running demo workflow");
    let result = orchestrator.execute_workflow(DEFAULT_TOPIC).await?;

    let stats = orchestrator.get_workflow_statistics();
    info!(
        workflow_id = %result.workflow_id,
        statistics = %serde_json::to_string(&stats).unwrap_or_default(),
        "Demo workflow finished"
    );

    Ok(result)
}
