//! The [`Tool`] trait and the [`ToolSet`] that dispatches to it.

use crate::ToolDef;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Maximum size (in bytes) for tool output before truncation.
pub const DEFAULT_MAX_RESULT_BYTES: usize = 30_000;

/// Boxed future returned by [`Tool::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

// ── Tool trait ─────────────────────────────────────────────────────

/// A tool that an agent's model can invoke via function-calling.
///
/// Errors are returned as `"Error: ..."` strings rather than `Err`: the
/// result goes back to the model either way, and the model can react to it.
pub trait Tool: Send + Sync {
    /// The tool definition sent to the LLM API.
    fn definition(&self) -> ToolDef;

    /// Execute the tool with the given raw JSON arguments string.
    fn execute(&self, arguments: &str) -> ToolFuture<'_>;

    /// The tool's name (delegates to the definition).
    fn name(&self) -> String {
        self.definition().function.name.clone()
    }
}

// ── ToolSet ────────────────────────────────────────────────────────

/// A collection of tools that can be dispatched by name.
///
/// Cloning is cheap; tools are shared behind `Arc`s so one set can back
/// several agent configs.
#[derive(Clone)]
pub struct ToolSet {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    max_result_bytes: usize,
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("max_result_bytes", &self.max_result_bytes)
            .finish()
    }
}

impl ToolSet {
    /// Create an empty tool set.
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            max_result_bytes: DEFAULT_MAX_RESULT_BYTES,
        }
    }

    /// Set the maximum result size in bytes before truncation.
    pub fn with_max_result_bytes(mut self, max: usize) -> Self {
        self.max_result_bytes = max;
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name(), Arc::new(tool));
    }

    /// Register a tool (builder pattern).
    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.register(tool);
        self
    }

    /// Return all tool definitions for the LLM API, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDef> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Names of the registered tools, ordered.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call by name and return the (possibly truncated) result.
    ///
    /// Unknown tool names produce an error string for the model.
    pub async fn execute(&self, name: &str, arguments: &str) -> String {
        let Some(tool) = self.tools.get(name) else {
            return format!("Error: unknown tool '{name}'");
        };

        log_tool_call(name, arguments);
        let start = std::time::Instant::now();
        let result = tool.execute(arguments).await;

        debug!(
            "Tool {name} completed in {:.0}ms ({} bytes)",
            start.elapsed().as_secs_f64() * 1000.0,
            result.len()
        );
        trace!(
            "Tool {name} result preview: {}",
            result.chars().take(300).collect::<String>()
        );

        truncate_result(result, self.max_result_bytes)
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn log_tool_call(name: &str, arguments: &str) {
    let args_preview: String = arguments.chars().take(120).collect();
    info!(
        "[tool] {}({args_preview}{})",
        name,
        if arguments.chars().count() > 120 { "..." } else { "" }
    );
    trace!("[tool] {name} arguments: {arguments}");
}

/// Truncate a string to at most `max` bytes (on a char boundary), appending
/// a notice if trimmed.
pub fn truncate_result(s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    let total = s.len();
    let mut out = s;
    out.truncate(cut);
    format!("{out}...\n[truncated: {total} bytes total]")
}

/// Parse raw JSON arguments into a typed struct.
///
/// The error is already formatted for returning from [`Tool::execute`].
pub fn parse_tool_args<T: DeserializeOwned>(arguments: &str) -> Result<T, String> {
    serde_json::from_str(arguments).map_err(|e| format!("Error: invalid arguments: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Tool for Echo {
        fn definition(&self) -> ToolDef {
            ToolDef::new("echo", "Echo the input", serde_json::json!({"type": "object"}))
        }

        fn execute(&self, arguments: &str) -> ToolFuture<'_> {
            let arguments = arguments.to_string();
            Box::pin(async move { arguments })
        }
    }

    #[tokio::test]
    async fn execute_dispatches_by_name() {
        let tools = ToolSet::new().with(Echo);
        assert_eq!(tools.execute("echo", "{\"a\":1}").await, "{\"a\":1}");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_string() {
        let tools = ToolSet::new();
        assert_eq!(
            tools.execute("missing", "{}").await,
            "Error: unknown tool 'missing'"
        );
    }

    #[tokio::test]
    async fn results_are_truncated() {
        let tools = ToolSet::new().with_max_result_bytes(4).with(Echo);
        let out = tools.execute("echo", "abcdefgh").await;
        assert!(out.starts_with("abcd..."));
        assert!(out.contains("[truncated: 8 bytes total]"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let out = truncate_result("héllo".to_string(), 2);
        assert!(out.starts_with("h..."));
    }

    #[test]
    fn parse_tool_args_reports_errors() {
        #[derive(serde::Deserialize)]
        struct Args {
            #[allow(dead_code)]
            url: String,
        }
        let err = parse_tool_args::<Args>("{}").err().unwrap();
        assert!(err.starts_with("Error: invalid arguments"));
    }
}
