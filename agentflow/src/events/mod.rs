//! Telemetry event system.
//!
//! Stages and the orchestrator report through a [`Telemetry`] handle, which
//! turns typed calls into `(event_type, payload)` pairs for an [`EventSink`].

mod sink;
mod telemetry;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
pub use telemetry::{Telemetry, APP_AGENT_NAME};

/// Emitted when an agent starts executing.
pub const AGENT_STARTED: &str = "agent.started";
/// Emitted when an agent finishes successfully.
pub const AGENT_COMPLETED: &str = "agent.completed";
/// Emitted when an agent fails.
pub const AGENT_FAILED: &str = "agent.failed";
/// Emitted for per-stage and per-workflow metrics.
pub const METRICS_RECORDED: &str = "metrics.recorded";
