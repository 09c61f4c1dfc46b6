//! Planner → writer → editor, as an explicit sequence of calls.

use super::request::ArticleRequest;
use super::{Agent, LlmAgent, presets};
use crate::tools::LinkExtractor;
use crate::{ChatBackend, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Every stage's output for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Drafts {
    pub planner: String,
    pub writer: String,
    pub editor: String,
}

impl Drafts {
    /// The published article: the editor's text, unmodified.
    pub fn article(&self) -> &str {
        &self.editor
    }
}

/// The three roles that produce an article.
#[derive(Clone)]
pub struct Newsroom {
    planner: Arc<dyn Agent>,
    writer: Arc<dyn Agent>,
    editor: Arc<dyn Agent>,
}

impl Newsroom {
    pub fn new(planner: Arc<dyn Agent>, writer: Arc<dyn Agent>, editor: Arc<dyn Agent>) -> Self {
        Self {
            planner,
            writer,
            editor,
        }
    }

    /// Build the preset planner, writer and editor on one backend.
    pub fn from_presets(
        backend: Arc<dyn ChatBackend>,
        extractor: Arc<dyn LinkExtractor>,
        model: &str,
    ) -> Result<Self> {
        let planner = presets::planner(extractor)?.with_model(model);
        let writer = presets::writer()?.with_model(model);
        let editor = presets::editor()?.with_model(model);
        Ok(Self::new(
            Arc::new(LlmAgent::new(planner, backend.clone())),
            Arc::new(LlmAgent::new(writer, backend.clone())),
            Arc::new(LlmAgent::new(editor, backend)),
        ))
    }

    /// Run all three stages for `request`.
    ///
    /// The planner receives exactly [`ArticleRequest::instructions`]. Any
    /// stage failure aborts the run; nothing is retried.
    pub async fn generate(&self, request: &ArticleRequest) -> Result<Drafts> {
        let start = Instant::now();
        let instructions = request.instructions();
        info!(
            "Generating article: topic={:?}, word_limit={}, links={}",
            request.topic(),
            request.word_limit(),
            request.links().len()
        );

        let planner = self.planner.run(&instructions).await?;

        let writer_input = format!("{instructions}\n\nPlanner notes:\n{planner}");
        let writer = self.writer.run(&writer_input).await?;

        let editor_input = format!("{instructions}\n\nArticle draft from the Writer:\n{writer}");
        let editor = self.editor.run(&editor_input).await?;

        info!(
            "Article ready in {:.1}s ({} chars)",
            start.elapsed().as_secs_f64(),
            editor.len()
        );
        Ok(Drafts {
            planner,
            writer,
            editor,
        })
    }
}
