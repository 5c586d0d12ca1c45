//! # Agentflow
//!
//! A four-stage agent pipeline: research, analysis, writing and review.
//!
//! Agentflow turns a topic into a reviewed report by chaining four
//! language-model calls:
//!
//! - **Stages**: each stage renders a prompt from the previous stage's text
//!   and shapes the completion into a structured result
//! - **Orchestration**: strictly sequential, fail-fast execution with an
//!   append-only run history
//! - **Statistics**: workflow and per-agent timing aggregates
//! - **Telemetry**: start, completion, failure and metrics events routed to
//!   a pluggable sink
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use agentflow::prelude::*;
//!
//! let settings = Settings::from_env()?;
//! let client = Arc::new(OpenAiClient::from_settings(&settings)?);
//! let orchestrator = AgentOrchestrator::from_settings(&settings, client, Telemetry::noop());
//!
//! let result = orchestrator.execute_workflow("Edge computing").await?;
//! println!("{}", result.review_output.primary_text());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod completion;
pub mod config;
pub mod errors;
pub mod events;
pub mod history;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::completion::{CompletionClient, OpenAiClient};
    pub use crate::config::{LogFormat, Settings};
    pub use crate::errors::{AgentflowError, CompletionError, ConfigError};
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, Telemetry,
    };
    pub use crate::history::HistoryLog;
    pub use crate::pipeline::{
        demo_workflow, AgentOrchestrator, AgentPerformance, Performance, WorkflowResult,
        WorkflowStatistics, DEFAULT_TOPIC,
    };
    pub use crate::stages::{Stage, StageKind, StageResult};
}
