//! Convenience re-exports for building and running the newsroom.
//!
//! ```ignore
//! use journalist_rs::prelude::*;
//! ```

pub use crate::agent::newsroom::{Drafts, Newsroom};
pub use crate::agent::request::{ArticleRequest, WordLimit};
pub use crate::agent::{Agent, AgentConfig, LlmAgent, presets};
pub use crate::tools::{ExtractLinkTool, HttpLinkExtractor, LinkExtractor, Tool, ToolSet};
pub use crate::{ChatBackend, ChatClient, Error, Message, RequestError};
