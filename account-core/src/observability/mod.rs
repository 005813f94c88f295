pub mod logging;
pub mod metrics;
pub mod trace_context;

pub use logging::{init_tracing, shutdown_tracing, TelemetryError};
pub use metrics::install_prometheus_recorder;
pub use trace_context::{inject_trace_context, TracedRequestExt, TRACEPARENT_HEADER, TRACESTATE_HEADER};
