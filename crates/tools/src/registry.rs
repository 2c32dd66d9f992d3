//! Tool trait and registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use lead_engine_llm::ToolSpec;

use crate::tools::{IntentSignalsTool, LeadDetailsTool, RecentInteractionsTool};
use crate::view::LeadDataView;

/// A read-only tool the model may call during a recommendation run.
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &'static str;

    /// OpenAI function spec advertised to the model.
    fn spec(&self) -> ToolSpec;

    /// Execute against the request's data view. Always returns a JSON value;
    /// failures are reported inside the value so the model can react.
    fn execute(&self, view: &LeadDataView, args: &Value) -> Value;
}

/// Registry dispatching tool calls by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn AgentTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn AgentTool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Specs for every registered tool, in stable name order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut names: Vec<&&'static str> = self.tools.keys().collect();
        names.sort();
        names.iter().map(|name| self.tools[**name].spec()).collect()
    }

    pub fn execute(&self, view: &LeadDataView, name: &str, args: &Value) -> Value {
        match self.tools.get(name) {
            Some(tool) => {
                tracing::debug!(tool = name, "executing agent tool");
                tool.execute(view, args)
            }
            None => {
                tracing::warn!(tool = name, "model requested unknown tool");
                json!({ "error": "Unknown tool", "name": name })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Registry with the three standard lead-data tools.
pub fn create_default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(LeadDetailsTool));
    registry.register(Arc::new(RecentInteractionsTool));
    registry.register(Arc::new(IntentSignalsTool));
    registry
}
