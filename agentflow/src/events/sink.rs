//! Event sink trait and implementations.

use std::fmt::Debug;
use tracing::{debug, error, info, Level};

use super::{AGENT_FAILED, METRICS_RECORDED};

/// Trait for event sinks that can receive telemetry events.
///
/// Emission never fails from the caller's point of view: sinks swallow
/// their own errors.
pub trait EventSink: Send + Sync + Debug {
    /// Emits an event.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The type of event (e.g., "agent.started")
    /// * `data` - Optional event data
    fn emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// A no-op event sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}
}

/// An event sink that logs events using the tracing framework.
///
/// Failure events are always logged at error level. Metrics events are
/// dropped when metrics are disabled.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
    metrics_enabled: bool,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            metrics_enabled: true,
        }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Enables or disables forwarding of metrics events.
    #[must_use]
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Returns true if metrics events are forwarded.
    #[must_use]
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }

    fn log_event(&self, event_type: &str, data: &Option<serde_json::Value>) {
        if event_type == AGENT_FAILED {
            error!(event_type = %event_type, event_data = ?data, "Event: {}", event_type);
            return;
        }

        match self.level {
            Level::DEBUG | Level::TRACE => {
                debug!(event_type = %event_type, event_data = ?data, "Event: {}", event_type);
            }
            _ => {
                info!(event_type = %event_type, event_data = ?data, "Event: {}", event_type);
            }
        }
    }
}

impl EventSink for LoggingEventSink {
    fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        if event_type == METRICS_RECORDED && !self.metrics_enabled {
            return;
        }
        self.log_event(event_type, &data);
    }
}

/// A collecting event sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<(String, Option<serde_json::Value>)>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.events.read().clone()
    }

    /// Returns the collected event types, in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.read().iter().map(|(t, _)| t.clone()).collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns events matching a type prefix.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<(String, Option<serde_json::Value>)> {
        self.events
            .read()
            .iter()
            .filter(|(t, _)| t.starts_with(type_prefix))
            .cloned()
            .collect()
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink() {
        let sink = NoOpEventSink;
        sink.emit("agent.started", Some(serde_json::json!({"x": 1})));
    }

    #[test]
    fn test_logging_sink() {
        let sink = LoggingEventSink::default();
        sink.emit("agent.started", Some(serde_json::json!({"agent_name": "ResearchAgent"})));
        sink.emit(AGENT_FAILED, None);
        assert!(sink.metrics_enabled());
    }

    #[test]
    fn test_logging_sink_metrics_toggle() {
        let sink = LoggingEventSink::debug().with_metrics(false);
        assert!(!sink.metrics_enabled());
        sink.emit(METRICS_RECORDED, Some(serde_json::json!({"total_time_ms": 1.0})));
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit("event1", None);
        sink.emit("event2", Some(serde_json::json!({"data": true})));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.event_types(), vec!["event1", "event2"]);
    }

    #[test]
    fn test_collecting_sink_filter_and_clear() {
        let sink = CollectingEventSink::new();
        sink.emit("agent.started", None);
        sink.emit("agent.completed", None);
        sink.emit("metrics.recorded", None);

        assert_eq!(sink.events_of_type("agent.").len(), 2);
        assert_eq!(sink.events_of_type("metrics.").len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }
}
