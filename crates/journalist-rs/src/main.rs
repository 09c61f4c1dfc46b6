//! Generate a news article from the terminal.
//!
//! Reads `OPENAI_API_KEY` (and optionally `OPENAI_BASE_URL`) from the
//! environment or a `.env` file.
//!
//! # Examples
//!
//! ```sh
//! # No reference links, 500 words
//! journalist --topic "Emergence of AI and LLMs" --word-limit 500
//!
//! # With reference links, printing every stage's draft
//! journalist --topic "Chip export rules" \
//!   --link https://example.com/a --link https://example.com/b --drafts
//!
//! # Show the configured roles
//! journalist --roster
//! ```

use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use journalist_rs::prelude::*;
use journalist_rs::DEFAULT_MODEL;
use tracing_subscriber::EnvFilter;

/// Generate a news article with a planner, writer and editor agent.
#[derive(Parser)]
#[command(name = "journalist")]
struct Cli {
    /// What the article is about
    #[arg(long, required_unless_present = "roster")]
    topic: Option<String>,

    /// Target length in words (snapped to 250..=1500, step 50)
    #[arg(long, default_value_t = WordLimit::MIN)]
    word_limit: u32,

    /// Reference link (repeat up to five times)
    #[arg(long = "link")]
    links: Vec<String>,

    /// Model used by every role
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Give up on the chat API after this many seconds (default: wait forever)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Also print the planner and writer drafts
    #[arg(long)]
    drafts: bool,

    /// Print every configured role and exit
    #[arg(long)]
    roster: bool,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let extractor: Arc<dyn LinkExtractor> = Arc::new(HttpLinkExtractor::new()?);

    if cli.roster {
        for config in presets::roster(extractor)? {
            println!("{}\n", config.with_model(&cli.model));
        }
        return Ok(());
    }

    let topic = cli.topic.unwrap_or_default();
    let request = ArticleRequest::new(topic, cli.word_limit, cli.links)?;

    let timeout = cli.timeout_secs.map(Duration::from_secs);
    let client = ChatClient::from_env_with_timeout(timeout)?;

    let newsroom = Newsroom::from_presets(Arc::new(client), extractor, &cli.model)?;
    let drafts = newsroom.generate(&request).await?;

    if cli.drafts {
        println!("--- Planner draft ---\n{}\n", drafts.planner);
        println!("--- Writer draft ---\n{}\n", drafts.writer);
        println!("--- Editor draft ---");
    }
    println!("{}", drafts.article());
    Ok(())
}
