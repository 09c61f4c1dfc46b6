//! The newsroom's fixed roles.
//!
//! Each function returns a ready [`AgentConfig`]. They only fail if the
//! hardcoded text below is edited into an empty description or instruction
//! list, so callers build them once at startup and propagate the error.

use super::AgentConfig;
use crate::Result;
use crate::guidelines::render_guidelines;
use crate::tools::{ExtractLinkTool, LinkExtractor, ToolSet};
use std::sync::Arc;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Supervises the other roles. Not part of the generation pipeline.
pub fn publisher() -> Result<AgentConfig> {
    let description = [
        "You are a superviser/advisor of writer and editor.",
        "You are responsible for publishing the article to the user.",
        "You play an important role in the development and dissemination of content.",
        "You are the key decision-maker in the production process, overseeing all stages \
         from concept selection to final publication.",
    ];
    let instructions = [
        "Given a topic and a list of URLs,your goal is to publish a high-quality NYT-worthy \
         article on the topic using the information from the provided links.",
        "You have to delegate the planning, writing and editing of the article to the \
         planner, writer and editor respectively.",
        "Ensure that every assisstant completes their assigned tasks.",
        "Get the final article from the editor and publish it to the user.",
    ];
    AgentConfig::new(
        "Publisher",
        "Publishing the articles",
        description.join(" "),
        lines(&instructions),
    )
}

/// Outlines the article and reads the reference links via `read_article`.
pub fn planner(extractor: Arc<dyn LinkExtractor>) -> Result<AgentConfig> {
    let description = [
        "You are a professional news article planner.",
        "Given a topic you need to formulate an article outline.",
        "Based on the formulated outline, you need to get the content from the given links.",
    ];
    let instructions = [
        "Get the topic and the list of URLs from the user.",
        "Extract text from the given URLs using the read_article tool, once per URL.",
        "Based on the content of the extracted text, create a highly comprehensive and well \
         formulated outline for the article.",
        "Include the key facts, names, dates, figures and quotes from each source together \
         with its title, author and link, so the writer can cite them.",
        "If no links are provided, build the outline from your own knowledge of the topic.",
    ];
    let tools = ToolSet::new().with(ExtractLinkTool::new(extractor));
    Ok(AgentConfig::new(
        "Planner",
        "Plan the article outline and get the content from the given links.",
        description.join(" "),
        lines(&instructions),
    )?
    .with_tools(tools))
}

/// Drafts the article from the planner's outline.
pub fn writer() -> Result<AgentConfig> {
    let description = [
        "You are a senior writer at New York Times.",
        "Given a topic and text content from Planner, your goal is to write a high-quaity \
         NYT-worthy article on the topic.",
        "Finally send the article draft to the Editor.",
    ];
    let instructions = vec![
        "Get the topic, text and word limit from the Planner.".to_string(),
        "Write an article using the content and follow the outline for the article curated \
         by the Planner."
            .to_string(),
        format!(
            "The article should be written based on the guidelines as follows:\n{}",
            render_guidelines()
        ),
        "Always retain the entities involved in the news, such as, people names, places, \
         dates, numbers, amounts, quotes, etc."
            .to_string(),
        "Ensure that the article is well-written and well-structured.".to_string(),
        "Always provide a nuanced and balanced opinion, quoting facts where possible."
            .to_string(),
        "Focus on clarity, coherence and overall quality.".to_string(),
        "Never make up facts or plagiarize. Always provide proper attribution.".to_string(),
        "Do not exceed the given word limit.".to_string(),
        "At the end of each article, Create a sources list of each result you cited, with \
         the article name, author, and link."
            .to_string(),
    ];
    AgentConfig::new(
        "Writer",
        "Write high quality New York Times-worthy news articles.",
        description.join(" "),
        instructions,
    )
}

/// Proofreads the writer's draft into the published article.
pub fn editor() -> Result<AgentConfig> {
    let description = [
        "You are a senior editor at New York Times.",
        "Your goal is to edit the article draft from the Writer.",
    ];
    let instructions = [
        "Get the article draft from the Writer.",
        "Proofread the article to ensure it meets the high standards of the New York Times.",
        "Check for facts and citations in the article.",
        "Ensure the original entites are retained in the article and the overall essence of \
         the article is well curated.",
        "The article should be extremely articulate and well-written.",
        "Ensure the article is engaing and informative.",
        "Make sure the article is within the given word limit.",
        "Remember: you are the final gatekeeper before the article is published. Do not add \
         extra comments from your side at the end of the article.",
    ];
    Ok(AgentConfig::new(
        "Editor",
        "Get article draft from writer, proofread and edit it as per NYT standards.",
        description.join(" "),
        lines(&instructions),
    )?
    .with_markdown(true))
}

/// Every preset, in pipeline order followed by the publisher.
pub fn roster(extractor: Arc<dyn LinkExtractor>) -> Result<Vec<AgentConfig>> {
    Ok(vec![planner(extractor)?, writer()?, editor()?, publisher()?])
}
