//! Reading reference links.
//!
//! [`LinkExtractor`] is the capability: given a URL, return the page's
//! readable text plus a short summary. [`HttpLinkExtractor`] is the real
//! implementation; [`ExtractLinkTool`] exposes any extractor to a model as
//! the `read_article` tool.

use crate::tools::core::{Tool, ToolFuture, parse_tool_args, truncate_result};
use crate::{Error, Result, ToolDef, json_schema_for};
use schemars::JsonSchema;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Largest page body we are willing to download.
pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Summary length budget in characters.
pub const SUMMARY_CHARS: usize = 600;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const TEXT_WIDTH: usize = 100;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// The readable content of one reference link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extract {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
    pub summary: String,
}

impl Extract {
    /// Build an extract from raw HTML.
    pub fn from_html(url: impl Into<String>, html: &[u8]) -> Result<Self> {
        let url = url.into();
        let text = html2text::from_read(html, TEXT_WIDTH).map_err(|e| Error::Extraction {
            url: url.clone(),
            reason: format!("html2text error: {e}"),
        })?;
        let title = extract_title(&String::from_utf8_lossy(html));
        let summary = summarize(&text, SUMMARY_CHARS);
        Ok(Self {
            url,
            title,
            text,
            summary,
        })
    }

    /// Format the extract as the tool result the model reads.
    pub fn to_tool_output(&self) -> String {
        format!(
            "Title: {}\nURL: {}\nSummary: {}\n\nText:\n{}",
            self.title.as_deref().unwrap_or("(untitled)"),
            self.url,
            self.summary,
            self.text
        )
    }
}

/// Boxed future returned by [`LinkExtractor::extract`].
pub type ExtractFuture<'a> = Pin<Box<dyn Future<Output = Result<Extract>> + Send + 'a>>;

/// Fetch a URL and return its readable text.
pub trait LinkExtractor: Send + Sync {
    fn extract<'a>(&'a self, url: &'a str) -> ExtractFuture<'a>;
}

// ── HTTP implementation ────────────────────────────────────────────

/// Downloads pages over HTTP and converts them to text with `html2text`.
pub struct HttpLinkExtractor {
    client: reqwest::Client,
}

impl HttpLinkExtractor {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<Extract> {
        let fail = |reason: String| Error::Extraction {
            url: url.to_string(),
            reason,
        };

        let mut resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(fail(format!("HTTP {status}")));
        }

        let too_large = || fail(format!("response too large (max {MAX_PAGE_BYTES} bytes)"));
        if let Some(len) = resp.content_length()
            && len > MAX_PAGE_BYTES as u64
        {
            return Err(too_large());
        }
        // Content-Length may be absent or wrong; count what actually arrives.
        let mut bytes = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if bytes.len() + chunk.len() > MAX_PAGE_BYTES {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        debug!("Fetched {url}: {} bytes", bytes.len());

        Extract::from_html(url, &bytes)
    }
}

impl LinkExtractor for HttpLinkExtractor {
    fn extract<'a>(&'a self, url: &'a str) -> ExtractFuture<'a> {
        Box::pin(self.fetch(url))
    }
}

// ── Tool adapter ───────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
pub struct ReadArticleArgs {
    /// Absolute http(s) URL of the article to read.
    pub url: String,
}

/// Exposes a [`LinkExtractor`] to the model as `read_article`.
pub struct ExtractLinkTool {
    extractor: Arc<dyn LinkExtractor>,
    max_result_bytes: usize,
}

impl ExtractLinkTool {
    pub const NAME: &'static str = "read_article";

    pub fn new(extractor: Arc<dyn LinkExtractor>) -> Self {
        Self {
            extractor,
            max_result_bytes: 20_000,
        }
    }

    pub fn max_result_bytes(mut self, max: usize) -> Self {
        self.max_result_bytes = max;
        self
    }
}

impl Tool for ExtractLinkTool {
    fn definition(&self) -> ToolDef {
        ToolDef::new(
            Self::NAME,
            "Read a news article or web page and return its title, a short summary, \
             and the full text. Use it once for every reference link you were given.",
            json_schema_for::<ReadArticleArgs>(),
        )
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let arguments = arguments.to_string();
        Box::pin(async move {
            let args: ReadArticleArgs = match parse_tool_args(&arguments) {
                Ok(a) => a,
                Err(e) => return e,
            };
            if !(args.url.starts_with("http://") || args.url.starts_with("https://")) {
                return format!("Error: '{}' is not an http(s) URL", args.url);
            }
            match self.extractor.extract(&args.url).await {
                Ok(extract) => truncate_result(extract.to_tool_output(), self.max_result_bytes),
                Err(e) => format!("Error: {e}"),
            }
        })
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let start = open + lower.get(open..)?.find('>')? + 1;
    let end = start + lower.get(start..)?.find("</title>")?;
    let title = html.get(start..end)?.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

/// Take whole leading paragraphs of `text` until roughly `budget` chars.
fn summarize(text: &str, budget: usize) -> String {
    let mut summary = String::new();
    for para in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let para = para.split_whitespace().collect::<Vec<_>>().join(" ");
        if !summary.is_empty() && summary.chars().count() + para.chars().count() > budget {
            break;
        }
        if !summary.is_empty() {
            summary.push(' ');
        }
        summary.push_str(&para);
        if summary.chars().count() >= budget {
            break;
        }
    }
    if summary.chars().count() > budget {
        let mut cut: String = summary.chars().take(budget).collect();
        cut.push_str("...");
        cut
    } else {
        summary
    }
}
