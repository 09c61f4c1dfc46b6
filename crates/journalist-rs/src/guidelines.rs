//! Newsroom style rules injected into agent instructions.

/// Style rules every article follows, in the order they are presented to
/// the model.
pub const ARTICLE_GUIDELINES: &[&str] = &[
    "Inverted Pyramid: This is how you should organize your story. That means the most \
     fundamental, important information (the \u{201c}base\u{201d} of the pyramid) goes up at \
     the top, and information that is less crucial goes further down in the story.",
    "Lead: The start of a news story should present the most compelling information.",
    "Fact (Not Opinion) and Attribution: State the actual facts, figures, dates and numbers \
     and always provide proper attribution.",
    "Identification: A person\u{2019}s full first name or both initials should be used on \
     first reference\u{2014}not just a single initial. It shouldn\u{2019}t be assumed that \
     every reader knows who the person is; he or she should be identified in a way \
     that\u{2019}s relevant to the article.",
    "Short Paragraphs: In newswriting, paragraphs are kept short for punchiness and \
     appearance.",
    "Headlines: Headlines should be short and preferably snappy. They should come out of \
     information in the body of the text and not present new information.",
    "Conclusion: Always end the article with a proper conclusion heading restating the \
     premise.",
];

/// Render the guidelines as a bulleted block for embedding in a prompt.
pub fn render_guidelines() -> String {
    ARTICLE_GUIDELINES
        .iter()
        .map(|g| format!("- {g}"))
        .collect::<Vec<_>>()
        .join("\n")
}
