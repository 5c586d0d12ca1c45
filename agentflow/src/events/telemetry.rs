//! Typed front-end over an [`EventSink`].

use serde_json::{json, Map, Value};
use std::sync::Arc;

use super::{EventSink, NoOpEventSink, AGENT_COMPLETED, AGENT_FAILED, AGENT_STARTED, METRICS_RECORDED};

/// Agent name used for failures of the application as a whole.
pub const APP_AGENT_NAME: &str = "MainApp";

/// Cloneable handle used to emit the pipeline's telemetry events.
#[derive(Debug, Clone)]
pub struct Telemetry {
    sink: Arc<dyn EventSink>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::noop()
    }
}

impl Telemetry {
    /// Creates a handle over the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Creates a handle that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Arc::new(NoOpEventSink))
    }

    /// Reports that an agent started a task.
    pub fn agent_start(&self, agent_name: &str, task: &str, attributes: Map<String, Value>) {
        let mut payload = attributes;
        payload.insert("agent_name".to_string(), json!(agent_name));
        payload.insert("task".to_string(), json!(task));
        self.sink.emit(AGENT_STARTED, Some(Value::Object(payload)));
    }

    /// Reports that an agent finished a task.
    pub fn agent_end(&self, agent_name: &str, result_type: &str, execution_time_ms: f64) {
        self.sink.emit(
            AGENT_COMPLETED,
            Some(json!({
                "agent_name": agent_name,
                "result_type": result_type,
                "execution_time_ms": execution_time_ms,
            })),
        );
    }

    /// Reports an agent failure.
    pub fn agent_error(&self, agent_name: &str, error: &str, context: &str) {
        self.sink.emit(
            AGENT_FAILED,
            Some(json!({
                "agent_name": agent_name,
                "error": error,
                "context": context,
            })),
        );
    }

    /// Reports that the application run failed outright.
    pub fn app_failed(&self, error: &str) {
        self.agent_error(APP_AGENT_NAME, error, "main");
    }

    /// Reports a set of named metric values.
    pub fn metrics(&self, agent_name: &str, metrics: Value) {
        self.sink.emit(
            METRICS_RECORDED,
            Some(json!({
                "agent_name": agent_name,
                "metrics": metrics,
            })),
        );
    }
}
