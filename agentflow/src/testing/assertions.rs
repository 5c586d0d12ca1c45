//! Test assertions for stage and workflow results.

use serde_json::Value;

use crate::pipeline::WorkflowResult;
use crate::stages::{StageKind, StageResult, INPUT_SUMMARY_CHARS};

/// Asserts that the result came from `kind` and carries its primary field.
pub fn assert_valid_stage_result(result: &StageResult, kind: StageKind) {
    assert_eq!(
        result.stage(),
        kind,
        "Expected a {} result, got {}",
        kind,
        result.stage()
    );
    assert!(
        kind.validate(&result.to_value()),
        "Expected field '{}' in {} result. Keys: {:?}",
        kind.primary_field(),
        kind,
        result.fields().keys().collect::<Vec<_>>()
    );
}

/// Asserts that a stage result field has the expected value.
pub fn assert_stage_field(result: &StageResult, key: &str, expected: &Value) {
    let actual = result.get(key);
    assert_eq!(
        actual,
        Some(expected),
        "Expected value {:?} for key '{}', got {:?}",
        expected,
        key,
        actual
    );
}

/// Asserts that each stage is well formed and that the stages which record
/// their input saw the previous stage's primary text.
pub fn assert_chained(result: &WorkflowResult) {
    for kind in StageKind::ALL {
        assert_valid_stage_result(result.output(kind), kind);
    }

    assert_stage_field(
        &result.research_output,
        "topic",
        &Value::String(result.topic.clone()),
    );

    let summary: String = result
        .research_output
        .primary_text()
        .chars()
        .take(INPUT_SUMMARY_CHARS)
        .collect();
    assert_stage_field(&result.analysis_output, "input_summary", &Value::String(summary));
}

/// Asserts that all recorded timings are non-negative.
pub fn assert_non_negative_timings(result: &WorkflowResult) {
    let perf = &result.performance;
    for kind in StageKind::ALL {
        assert!(
            perf.stage_time_ms(kind) >= 0.0,
            "Negative {} time: {}",
            kind,
            perf.stage_time_ms(kind)
        );
    }
    assert!(
        perf.total_time_ms >= 0.0,
        "Negative total time: {}",
        perf.total_time_ms
    );
}
