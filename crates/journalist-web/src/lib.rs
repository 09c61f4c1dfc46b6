//! Login-gated browser UI for the journalist-rs newsroom.
//!
//! `journalist-web` serves a single page: a login form, then a generator
//! form (topic, word limit, optional reference links) next to the finished
//! article and each agent's draft. Pages are rendered on the server; a small
//! script only handles the slider label, link field visibility, the spinner
//! and the copy button.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use journalist_rs::prelude::*;
//! use journalist_web::{Credentials, WebConfig, spawn_web};
//!
//! let extractor: Arc<dyn LinkExtractor> = Arc::new(HttpLinkExtractor::new()?);
//! let client = Arc::new(ChatClient::from_env()?);
//! let newsroom = Newsroom::from_presets(client, extractor.clone(), "gpt-4o")?;
//! let roster = presets::roster(extractor)?;
//!
//! let addr = spawn_web(newsroom, roster, Credentials::from_env(), WebConfig::default()).await?;
//! println!("Web UI: http://{addr}");
//! ```
//!
//! # Session flow
//!
//! ```text
//! GET /  ──▶ login page ──POST /login──▶ 303 / ──▶ generator page
//!                                           │
//!              POST /generate ──▶ planner ──▶ writer ──▶ editor ──▶ 303 /
//! ```
//!
//! Each browser gets its own session (cookie `journalist_session`) once it
//! logs in.

pub mod auth;
mod error;
pub mod form;
mod handlers;
pub mod pages;
mod server;
pub mod session;

pub use auth::Credentials;
pub use error::AppError;
pub use handlers::{AppState, LOGIN_FAILED, LOGIN_OK};
pub use server::build_router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use journalist_rs::agent::AgentConfig;
use journalist_rs::agent::newsroom::Newsroom;

use crate::session::SessionStore;

/// Default idle lifetime of a session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:8501`.
    pub bind_addr: SocketAddr,
    /// Directory served under `/assets`. Default: this crate's `assets/`.
    pub static_dir: PathBuf,
    /// Sessions idle longer than this are dropped. Default: 12 hours.
    pub session_ttl: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// `roster` is what `GET /api/agents` lists; it does not affect generation.
/// The server and the idle-session sweeper run until the Tokio runtime shuts
/// down.
pub async fn spawn_web(
    newsroom: Newsroom,
    roster: Vec<AgentConfig>,
    credentials: Credentials,
    config: WebConfig,
) -> std::io::Result<SocketAddr> {
    let sessions = SessionStore::new(config.session_ttl);
    sessions.spawn_sweeper();
    let state = AppState {
        newsroom,
        roster: Arc::new(roster),
        credentials: Arc::new(credentials),
        sessions,
    };
    let router = server::build_router(state, config.static_dir);
    server::start_server(router, config.bind_addr).await
}
