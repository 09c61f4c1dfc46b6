//! AI Journalist web app.
//!
//! Serves the login-gated article generator in the browser.
//!
//! # Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-... APP_USERNAME=editor PASSWORD=secret cargo run -p journalist-web
//! cargo run -p journalist-web -- --port 8080 --model gpt-4o-mini
//! cargo run -p journalist-web -- --timeout-secs 300
//! ```
//!
//! Variables may also come from a `.env` file in the working directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use journalist_rs::prelude::*;
use journalist_rs::DEFAULT_MODEL;
use journalist_web::{Credentials, WebConfig, spawn_web};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Article generator with a browser UI.
#[derive(Parser)]
#[command(about = "AI Journalist: plan, write and edit news articles in the browser")]
struct Args {
    /// Model used by every role.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Port for the web UI server.
    #[arg(long, default_value_t = 8501)]
    port: u16,

    /// Listen on all interfaces instead of localhost only.
    #[arg(long)]
    public: bool,

    /// Directory with the logo, placeholder image, CSS and JS.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Give up on the chat API after this many seconds (default: wait forever).
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Drop sessions idle for longer than this many hours.
    #[arg(long, default_value_t = 12)]
    session_ttl_hours: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // 1. Chat client shared by every role.
    let timeout = args.timeout_secs.map(Duration::from_secs);
    let client = Arc::new(ChatClient::from_env_with_timeout(timeout)?);

    // 2. Planner, writer and editor; the full roster is listed at /api/agents.
    let extractor: Arc<dyn LinkExtractor> = Arc::new(HttpLinkExtractor::new()?);
    let newsroom = Newsroom::from_presets(client, extractor.clone(), &args.model)?;
    let roster = presets::roster(extractor)?
        .into_iter()
        .map(|config| config.with_model(&args.model))
        .collect();

    // 3. Serve.
    let ip = if args.public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
    let mut config = WebConfig {
        bind_addr: (ip, args.port).into(),
        session_ttl: Duration::from_secs(args.session_ttl_hours * 60 * 60),
        ..Default::default()
    };
    if let Some(dir) = args.assets {
        config.static_dir = dir;
    }
    let addr = spawn_web(newsroom, roster, Credentials::from_env(), config).await?;
    info!("Web UI: http://{addr}");
    println!("Web UI: http://{addr}");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}
