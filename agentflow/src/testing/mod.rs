//! Testing utilities for agentflow pipelines.
//!
//! This module provides:
//! - A scripted completion client
//! - Orchestrator fixtures and sample results
//! - Assertions for stage and workflow results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_chained, assert_non_negative_timings, assert_stage_field, assert_valid_stage_result,
};
pub use fixtures::{sample_workflow_result, OrchestratorFixture};
pub use mocks::ScriptedCompletionClient;
