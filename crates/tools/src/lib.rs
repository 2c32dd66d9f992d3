//! Data accessor tools for the recommendation agent.
//!
//! The model grounds its recommendations in real data through three
//! read-only tools: `get_lead_details`, `get_recent_interactions`, and
//! `get_intent_signals`. Tools execute synchronously against a
//! request-scoped [`LeadDataView`] and always answer with a JSON value —
//! lookup failures become error-shaped tool results the model can read, not
//! Rust errors.

pub mod registry;
pub mod tools;
pub mod view;

pub use registry::{create_default_registry, AgentTool, ToolRegistry};
pub use tools::{IntentSignalsTool, LeadDetailsTool, RecentInteractionsTool};
pub use view::LeadDataView;
