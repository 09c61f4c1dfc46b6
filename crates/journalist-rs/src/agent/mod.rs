//! Agents: configured roles bound to a chat backend.
//!
//! An [`AgentConfig`] is plain, immutable data (name, role, description,
//! instructions, tools, model settings). An [`Agent`] is anything that can
//! turn an input string into text; [`LlmAgent`] is the implementation that
//! sends the config and the input to a [`ChatBackend`].
//!
//! # Submodules
//!
//! - [`presets`] builds the planner, writer, editor and publisher configs.
//! - [`request`] holds [`ArticleRequest`](request::ArticleRequest) and the
//!   word-limit rules.
//! - [`newsroom`] chains planner, writer and editor into one article.

pub mod newsroom;
pub mod presets;
pub mod request;

use crate::tools::ToolSet;
use crate::{ChatBackend, ChatCompletion, ChatRequest, DEFAULT_MODEL, Error, Message, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info};

/// Default cap on tool-call round trips in one [`Agent::run`].
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

// ── AgentConfig ────────────────────────────────────────────────────

/// Immutable description of one agent role.
///
/// Construct with [`AgentConfig::new`], then adjust with the `with_*`
/// methods before handing it to an [`LlmAgent`].
#[derive(Debug, Clone)]
pub struct AgentConfig {
    name: String,
    role: String,
    description: String,
    instructions: Vec<String>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    markdown: bool,
    add_datetime: bool,
    max_rounds: u32,
    tools: ToolSet,
}

impl AgentConfig {
    /// Create a config, failing when the description or instructions are empty.
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        description: impl Into<String>,
        instructions: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        let description = description.into();
        if description.trim().is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{name}: description cannot be empty"
            )));
        }
        if instructions.is_empty() || instructions.iter().all(|i| i.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "{name}: instructions cannot be empty"
            )));
        }
        Ok(Self {
            name,
            role: role.into(),
            description,
            instructions,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: None,
            markdown: false,
            add_datetime: true,
            max_rounds: DEFAULT_MAX_ROUNDS,
            tools: ToolSet::new(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Ask the model to format its answer as markdown.
    pub fn with_markdown(mut self, enabled: bool) -> Self {
        self.markdown = enabled;
        self
    }

    /// Append the current UTC time to the system prompt.
    pub fn with_datetime(mut self, enabled: bool) -> Self {
        self.add_datetime = enabled;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn markdown(&self) -> bool {
        self.markdown
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// System prompt stamped with the current time.
    pub fn system_prompt(&self) -> String {
        self.system_prompt_at(Utc::now())
    }

    /// System prompt as it would read at `now`.
    pub fn system_prompt_at(&self, now: DateTime<Utc>) -> String {
        let mut prompt = self.description.clone();

        prompt.push_str("\n\nInstructions:\n");
        let numbered: Vec<String> = self
            .instructions
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{}. {line}", i + 1))
            .collect();
        prompt.push_str(&numbered.join("\n"));

        if self.markdown {
            prompt.push_str("\n\nUse markdown to format your answers.");
        }
        if self.add_datetime {
            prompt.push_str(&format!(
                "\n\nThe current time is {}.",
                now.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        prompt
    }
}

impl fmt::Display for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Assistant name:{}\n\nAssistant role:{}\n\nLLM model:{}",
            self.name, self.role, self.model
        )
    }
}

// ── Agent capability ───────────────────────────────────────────────

/// Boxed future returned by [`Agent::run`].
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Something that turns an instruction string into text.
pub trait Agent: Send + Sync {
    /// Short display name, used in logs.
    fn name(&self) -> &str;

    /// Produce text for `input`. Errors from the backend propagate unchanged.
    fn run<'a>(&'a self, input: &'a str) -> RunFuture<'a>;
}

// ── LlmAgent ───────────────────────────────────────────────────────

/// An [`AgentConfig`] bound to a [`ChatBackend`].
pub struct LlmAgent {
    config: AgentConfig,
    backend: Arc<dyn ChatBackend>,
}

impl LlmAgent {
    pub fn new(config: AgentConfig, backend: Arc<dyn ChatBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn request(&self, messages: &[Message]) -> ChatRequest {
        let tools = &self.config.tools;
        ChatRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            tools: (!tools.is_empty()).then(|| tools.definitions()),
        }
    }

    async fn run_inner(&self, input: &str) -> Result<String> {
        let name = &self.config.name;
        info!("[{name}] run started ({} chars of input)", input.len());

        let mut messages = vec![
            Message::system(self.config.system_prompt()),
            Message::user(input),
        ];

        for round in 1..=self.config.max_rounds {
            let body = self.request(&messages);
            let ChatCompletion {
                content,
                tool_calls,
                finish_reason,
                ..
            } = self.backend.chat(&body).await?;

            if tool_calls.is_empty() {
                debug!("[{name}] round {round} finished: {finish_reason:?}");
                return match content {
                    Some(text) if !text.trim().is_empty() => {
                        info!("[{name}] run finished ({} chars)", text.len());
                        Ok(text)
                    }
                    _ => Err(Error::EmptyResponse {
                        agent: name.clone(),
                    }),
                };
            }

            debug!(
                "[{name}] round {round}: {} tool call(s) requested",
                tool_calls.len()
            );
            messages.push(Message::assistant_tool_calls(content, tool_calls.clone()));
            for call in &tool_calls {
                let result = self
                    .config
                    .tools
                    .execute(&call.function.name, &call.function.arguments)
                    .await;
                messages.push(Message::tool_result(&call.id, result));
            }
        }

        Err(Error::RoundLimit {
            agent: name.clone(),
            rounds: self.config.max_rounds,
        })
    }
}

impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn run<'a>(&'a self, input: &'a str) -> RunFuture<'a> {
        Box::pin(self.run_inner(input))
    }
}
