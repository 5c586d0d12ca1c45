//! End-to-end tests for workflow execution.

#[cfg(test)]
mod tests {
    use crate::errors::CompletionError;
    use crate::events::{AGENT_COMPLETED, AGENT_FAILED, AGENT_STARTED, METRICS_RECORDED};
    use crate::pipeline::{
        demo_workflow, AgentPerformance, WorkflowStatistics, DEFAULT_TOPIC, ORCHESTRATOR_NAME,
    };
    use crate::stages::{StageKind, ANALYSIS_CONFIDENCE, REVIEW_QUALITY_SCORE};
    use crate::testing::{
        assert_chained, assert_non_negative_timings, assert_stage_field, OrchestratorFixture,
        ScriptedCompletionClient,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn four_responses() -> ScriptedCompletionClient {
        ScriptedCompletionClient::with_responses(["R1", "R2", "R3", "R4"])
    }

    #[tokio::test]
    async fn test_workflow_end_to_end() {
        let fixture = OrchestratorFixture::new(four_responses());

        let result = fixture.orchestrator.execute_workflow("X").await.unwrap();

        assert_eq!(result.topic, "X");
        assert!(result.workflow_id.starts_with("workflow_"));
        assert_chained(&result);
        assert_non_negative_timings(&result);

        assert_stage_field(&result.research_output, "findings", &json!("R1"));
        assert_stage_field(&result.analysis_output, "insights", &json!("R2"));
        assert_stage_field(&result.writing_output, "content", &json!("R3"));
        assert_stage_field(&result.review_output, "quality_assessment", &json!("R4"));

        assert_eq!(result.writing_output.word_count(), Some(1));
        assert_stage_field(&result.analysis_output, "confidence_score", &json!(ANALYSIS_CONFIDENCE));
        assert_stage_field(&result.review_output, "quality_score", &json!(REVIEW_QUALITY_SCORE));
        assert_stage_field(&result.review_output, "approved", &json!(true));

        assert_eq!(fixture.orchestrator.history_len(), 1);
        assert_eq!(fixture.orchestrator.history()[0], result);
    }

    #[tokio::test]
    async fn test_each_stage_receives_previous_output_verbatim() {
        let fixture = OrchestratorFixture::new(four_responses());

        fixture.orchestrator.execute_workflow("X").await.unwrap();

        let expected: Vec<String> = StageKind::ALL
            .iter()
            .zip(["X", "R1", "R2", "R3"])
            .map(|(kind, input)| kind.render_prompt(input))
            .collect();
        assert_eq!(fixture.client.prompts(), expected);
    }

    #[tokio::test]
    async fn test_long_output_is_forwarded_whole_and_summarized() {
        let findings = format!("line one\n  {}\n", "x".repeat(300));
        let client = ScriptedCompletionClient::with_responses([findings.as_str(), "I", "W", "V"]);
        let fixture = OrchestratorFixture::new(client);

        let result = fixture.orchestrator.execute_workflow("topic").await.unwrap();

        assert!(fixture.client.prompts()[1].contains(&findings));
        let summary = result.analysis_output.get("input_summary").unwrap();
        assert_eq!(summary.as_str().unwrap().chars().count(), 200);
        assert_chained(&result);
    }

    #[tokio::test]
    async fn test_empty_topic_runs() {
        let fixture = OrchestratorFixture::answering("text");

        let result = fixture.orchestrator.execute_workflow("").await.unwrap();

        assert_stage_field(&result.research_output, "topic", &json!(""));
        assert_eq!(fixture.client.call_count(), 4);
    }

    #[tokio::test]
    async fn test_failure_at_each_position_aborts_without_recording() {
        for (index, failing_kind) in StageKind::ALL.into_iter().enumerate() {
            let call = index + 1;
            let client = ScriptedCompletionClient::new()
                .with_default_response("ok")
                .failing_on_call(call, "rate limited");
            let fixture = OrchestratorFixture::new(client);

            let err = fixture.orchestrator.execute_workflow("X").await.unwrap_err();

            assert_eq!(err, CompletionError::new("rate limited"), "failing {failing_kind}");
            assert_eq!(fixture.orchestrator.history_len(), 0);
            assert_eq!(fixture.client.call_count(), call, "later stages must not run");

            for kind in StageKind::ALL {
                let expected = usize::from(kind.position() < call);
                assert_eq!(
                    fixture.orchestrator.stage(kind).history_len(),
                    expected,
                    "{kind} history when {failing_kind} fails"
                );
            }

            let failed = fixture.sink.events_of_type(AGENT_FAILED);
            assert_eq!(failed.len(), 1);
            assert_eq!(
                failed[0].1.as_ref().unwrap()["agent_name"],
                json!(failing_kind.agent_name())
            );
        }
    }

    #[tokio::test]
    async fn test_failure_emits_no_workflow_metrics() {
        let client = ScriptedCompletionClient::new()
            .with_default_response("ok")
            .failing_on_call(3, "boom");
        let fixture = OrchestratorFixture::new(client);

        let _ = fixture.orchestrator.execute_workflow("X").await;

        let orchestrator_metrics = fixture
            .sink
            .events_of_type(METRICS_RECORDED)
            .into_iter()
            .filter(|(_, data)| {
                data.as_ref()
                    .is_some_and(|d| d["agent_name"] == json!(ORCHESTRATOR_NAME))
            })
            .count();
        assert_eq!(orchestrator_metrics, 0);
        assert!(fixture.orchestrator.get_workflow_statistics().is_empty());
    }

    #[tokio::test]
    async fn test_telemetry_event_order() {
        let fixture = OrchestratorFixture::new(four_responses());

        fixture.orchestrator.execute_workflow("X").await.unwrap();

        let mut expected = Vec::new();
        for _ in StageKind::ALL {
            expected.extend([AGENT_STARTED, AGENT_COMPLETED, METRICS_RECORDED]);
        }
        expected.push(METRICS_RECORDED);
        assert_eq!(fixture.sink.event_types(), expected);

        let agents: Vec<_> = fixture
            .sink
            .events_of_type(METRICS_RECORDED)
            .into_iter()
            .map(|(_, data)| data.unwrap()["agent_name"].clone())
            .collect();
        assert_eq!(
            agents,
            vec![
                json!("ResearchAgent"),
                json!("AnalysisAgent"),
                json!("WriterAgent"),
                json!("ReviewAgent"),
                json!(ORCHESTRATOR_NAME),
            ]
        );

        let events = fixture.sink.events();
        let workflow_metrics = events.last().unwrap().1.as_ref().unwrap();
        assert!(workflow_metrics["metrics"]["total_time_ms"].as_f64().unwrap() >= 0.0);
        assert!(workflow_metrics["metrics"]["writing_time_ms"].is_number());
    }

    #[tokio::test]
    async fn test_statistics_after_runs() {
        let fixture = OrchestratorFixture::answering("text");

        assert_eq!(
            fixture.orchestrator.get_workflow_statistics(),
            WorkflowStatistics::NoWorkflows {
                message: "No workflows completed yet".to_string()
            }
        );

        for topic in ["a", "b", "c"] {
            fixture.orchestrator.execute_workflow(topic).await.unwrap();
        }

        let history = fixture.orchestrator.history();
        match fixture.orchestrator.get_workflow_statistics() {
            WorkflowStatistics::Summary {
                total_workflows,
                average_workflow_time_ms,
                workflows,
            } => {
                assert_eq!(total_workflows, 3);
                assert!(average_workflow_time_ms >= 0.0);
                let ids: Vec<_> = history.iter().map(|r| r.workflow_id.clone()).collect();
                assert_eq!(workflows, ids);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_workflow_ids_are_unique_within_a_second() {
        let fixture = OrchestratorFixture::answering("text");

        for _ in 0..3 {
            fixture.orchestrator.execute_workflow("t").await.unwrap();
        }

        let mut ids: Vec<_> = fixture
            .orchestrator
            .history()
            .into_iter()
            .map(|r| r.workflow_id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_overlapping_runs_get_distinct_ids() {
        let client = ScriptedCompletionClient::new()
            .with_default_response("text")
            .with_delay(Duration::from_millis(20));
        let fixture = OrchestratorFixture::new(client);
        let orchestrator = &fixture.orchestrator;

        let (first, second) = tokio::join!(
            orchestrator.execute_workflow("a"),
            orchestrator.execute_workflow("b")
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_ne!(first.workflow_id, second.workflow_id);
        assert_eq!(orchestrator.history_len(), 2);
    }

    #[tokio::test]
    async fn test_agent_performance_after_runs() {
        let fixture = OrchestratorFixture::answering("text");

        assert!(fixture.orchestrator.get_agent_performance("Research").is_empty());

        fixture.orchestrator.execute_workflow("a").await.unwrap();
        fixture.orchestrator.execute_workflow("b").await.unwrap();

        for name in ["Research", "AnalysisAgent", "Writer", "writing", "review"] {
            match fixture.orchestrator.get_agent_performance(name) {
                AgentPerformance::Summary {
                    agent,
                    executions,
                    average_time_ms,
                    min_time_ms,
                    max_time_ms,
                } => {
                    assert_eq!(agent, name);
                    assert_eq!(executions, 2);
                    assert!(min_time_ms <= average_time_ms && average_time_ms <= max_time_ms);
                }
                other => panic!("expected data for {name}, got {other:?}"),
            }
        }

        assert_eq!(
            fixture.orchestrator.get_agent_performance("Summarizer"),
            AgentPerformance::NoData {
                message: "No data for Summarizer".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_history_capacity_evicts_oldest() {
        let client = ScriptedCompletionClient::new().with_default_response("t");
        let fixture = OrchestratorFixture::with_capacity(client, Some(2));

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(fixture.orchestrator.execute_workflow("t").await.unwrap().workflow_id);
        }

        let kept: Vec<_> = fixture
            .orchestrator
            .history()
            .into_iter()
            .map(|r| r.workflow_id)
            .collect();
        assert_eq!(kept, ids[1..].to_vec());
        assert_eq!(fixture.orchestrator.stage(StageKind::Review).history_len(), 2);
    }

    #[tokio::test]
    async fn test_stage_histories_grow_with_runs() {
        let fixture = OrchestratorFixture::answering("text");

        fixture.orchestrator.execute_workflow("a").await.unwrap();
        fixture.orchestrator.execute_workflow("b").await.unwrap();

        for kind in StageKind::ALL {
            assert_eq!(fixture.orchestrator.stage(kind).history_len(), 2);
        }
    }

    #[tokio::test]
    async fn test_demo_workflow_uses_default_topic() {
        let fixture = OrchestratorFixture::answering("text");

        let result = demo_workflow(&fixture.orchestrator).await.unwrap();

        assert_eq!(result.topic, DEFAULT_TOPIC);
        assert_eq!(fixture.orchestrator.history_len(), 1);
    }
}
