//! Tool abstractions for agents that call back into this process.
//!
//! A [`Tool`] is anything the model may invoke by name during an agent run.
//! Tools are collected into a [`ToolSet`] which handles dispatch, logging,
//! and truncation.
//!
//! - [`core`] holds the [`Tool`] trait and [`ToolSet`].
//! - [`link`] holds the [`LinkExtractor`](link::LinkExtractor) capability and
//!   the [`ExtractLinkTool`](link::ExtractLinkTool) that exposes it to the
//!   model.

pub mod core;
pub mod link;

pub use core::{
    DEFAULT_MAX_RESULT_BYTES, Tool, ToolFuture, ToolSet, parse_tool_args, truncate_result,
};
pub use link::{Extract, ExtractLinkTool, HttpLinkExtractor, LinkExtractor};
