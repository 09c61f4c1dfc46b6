//! Error types shared by the client, agents and the newsroom pipeline.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure while talking to the chat-completion service or running an agent.
///
/// None of these are retried. They propagate to whoever invoked
/// [`Agent::run`](crate::agent::Agent::run).
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP request never produced a response (DNS, TLS, connection reset).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("chat API HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The service answered 2xx but the body carried an `error` object.
    #[error("chat API error: {0}")]
    Provider(String),

    /// The response body was not the JSON shape we expect.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The model returned neither text nor tool calls.
    #[error("{agent} returned an empty response")]
    EmptyResponse { agent: String },

    /// The model kept calling tools past the agent's round budget.
    #[error("{agent} exceeded {rounds} tool rounds without a final answer")]
    RoundLimit { agent: String, rounds: u32 },

    /// A preset or hand-built agent is missing required fields.
    #[error("invalid agent config: {0}")]
    InvalidConfig(String),

    /// Fetching or decoding a reference link failed.
    #[error("link extraction failed for {url}: {reason}")]
    Extraction { url: String, reason: String },
}

/// Why an article request was rejected before any agent ran.
///
/// The `Display` strings are shown to end users verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Please provide a topic to write an article on.")]
    EmptyTopic,

    #[error("Please fill in every reference link (link {index} is empty).")]
    EmptyLink { index: usize },

    #[error("At most {max} reference links can be provided.")]
    TooManyLinks { max: usize },
}
