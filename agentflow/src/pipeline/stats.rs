//! Read-only aggregation over recorded runs.

use serde::{Deserialize, Serialize};

use super::WorkflowResult;
use crate::stages::StageKind;

/// Aggregate figures over all recorded runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkflowStatistics {
    /// At least one run has completed.
    Summary {
        /// Number of recorded runs.
        total_workflows: usize,
        /// Mean of the runs' total durations.
        average_workflow_time_ms: f64,
        /// Run identifiers in completion order.
        workflows: Vec<String>,
    },
    /// Nothing has completed yet.
    NoWorkflows {
        /// Explanatory message.
        message: String,
    },
}

impl WorkflowStatistics {
    /// Returns true for the "no workflows yet" marker.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoWorkflows { .. })
    }
}

/// Timing figures for a single agent across recorded runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentPerformance {
    /// At least one run recorded the agent's timing.
    Summary {
        /// Agent name as requested.
        agent: String,
        /// Number of recorded executions.
        executions: usize,
        /// Mean duration.
        average_time_ms: f64,
        /// Fastest duration.
        min_time_ms: f64,
        /// Slowest duration.
        max_time_ms: f64,
    },
    /// No timing recorded under that name.
    NoData {
        /// Explanatory message.
        message: String,
    },
}

impl AgentPerformance {
    /// Returns true for the "no data" marker.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

/// Count, mean, min and max of a set of durations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSummary {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
}

impl TimingSummary {
    /// Summarizes the samples; `None` when there are none.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sum: f64 = samples.iter().sum();
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        #[allow(clippy::cast_precision_loss)]
        let mean = sum / samples.len() as f64;

        Some(Self {
            count: samples.len(),
            mean,
            min,
            max,
        })
    }
}

/// Builds workflow statistics from recorded runs, oldest first.
pub fn workflow_statistics<'a, I>(runs: I) -> WorkflowStatistics
where
    I: IntoIterator<Item = &'a WorkflowResult>,
{
    let (ids, totals): (Vec<String>, Vec<f64>) = runs
        .into_iter()
        .map(|run| (run.workflow_id.clone(), run.performance.total_time_ms))
        .unzip();

    match TimingSummary::from_samples(&totals) {
        None => WorkflowStatistics::NoWorkflows {
            message: "No workflows completed yet".to_string(),
        },
        Some(summary) => WorkflowStatistics::Summary {
            total_workflows: summary.count,
            average_workflow_time_ms: summary.mean,
            workflows: ids,
        },
    }
}

/// Builds timing figures for one agent from recorded runs.
///
/// `agent_name` is resolved through [`StageKind::from_agent_name`]; names
/// that map to no stage produce the "no data" marker.
pub fn agent_performance<'a, I>(runs: I, agent_name: &str) -> AgentPerformance
where
    I: IntoIterator<Item = &'a WorkflowResult>,
{
    let no_data = || AgentPerformance::NoData {
        message: format!("No data for {agent_name}"),
    };

    let Some(kind) = StageKind::from_agent_name(agent_name) else {
        return no_data();
    };

    let times: Vec<f64> = runs
        .into_iter()
        .filter_map(|run| run.performance.get(kind.metric_key()))
        .collect();

    TimingSummary::from_samples(&times).map_or_else(no_data, |summary| {
        AgentPerformance::Summary {
            agent: agent_name.to_string(),
            executions: summary.count,
            average_time_ms: summary.mean,
            min_time_ms: summary.min,
            max_time_ms: summary.max,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_workflow_result;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_timing_summary() {
        let summary = TimingSummary::from_samples(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean, 20.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 30.0);
        assert!(TimingSummary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_empty_statistics_marker() {
        let stats = workflow_statistics(std::iter::empty());
        assert!(stats.is_empty());
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"message": "No workflows completed yet"})
        );
    }

    #[test]
    fn test_statistics_after_runs() {
        let runs = vec![
            sample_workflow_result("workflow_1", [1.0, 1.0, 1.0, 1.0], 100.0),
            sample_workflow_result("workflow_2", [1.0, 1.0, 1.0, 1.0], 200.0),
        ];

        let stats = workflow_statistics(&runs);
        assert_eq!(
            stats,
            WorkflowStatistics::Summary {
                total_workflows: 2,
                average_workflow_time_ms: 150.0,
                workflows: vec!["workflow_1".to_string(), "workflow_2".to_string()],
            }
        );
    }

    #[test]
    fn test_agent_performance_values() {
        let runs = vec![
            sample_workflow_result("a", [10.0, 0.0, 0.0, 0.0], 10.0),
            sample_workflow_result("b", [20.0, 0.0, 0.0, 0.0], 20.0),
            sample_workflow_result("c", [30.0, 0.0, 0.0, 0.0], 30.0),
        ];

        assert_eq!(
            agent_performance(&runs, "Research"),
            AgentPerformance::Summary {
                agent: "Research".to_string(),
                executions: 3,
                average_time_ms: 20.0,
                min_time_ms: 10.0,
                max_time_ms: 30.0,
            }
        );
    }

    #[test]
    fn test_writer_resolves_to_writing_key() {
        let runs = vec![sample_workflow_result("a", [0.0, 0.0, 7.0, 0.0], 7.0)];

        for name in ["Writer", "WriterAgent", "writing"] {
            match agent_performance(&runs, name) {
                AgentPerformance::Summary { max_time_ms, .. } => assert_eq!(max_time_ms, 7.0),
                other => panic!("expected data for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_agent_performance_no_data() {
        let empty = agent_performance(std::iter::empty(), "Review");
        assert_eq!(
            empty,
            AgentPerformance::NoData {
                message: "No data for Review".to_string()
            }
        );

        let runs = vec![sample_workflow_result("a", [1.0, 1.0, 1.0, 1.0], 4.0)];
        assert!(agent_performance(&runs, "Orchestrator").is_empty());
    }
}
