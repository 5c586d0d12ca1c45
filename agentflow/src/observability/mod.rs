//! Observability utilities: wall-clock timing and subscriber set-up.

mod subscriber;
mod timer;

pub use subscriber::{build_env_filter, init_tracing};
pub use timer::SpanTimer;
