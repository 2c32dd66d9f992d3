//! Lead Engine HTTP server.
//!
//! Thin axum boundary over the scoring core: routing, CORS, request
//! tracing, Prometheus metrics, and the app state wiring the config store,
//! caches, feedback store and (optional) LLM backend together.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, metrics_handler, record_error, record_llm_latency, record_request};
pub use state::AppState;
