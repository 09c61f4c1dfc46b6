//! Generation form fields: parsing, remembering, and validating.

use journalist_rs::RequestError;
use journalist_rs::agent::request::{ArticleRequest, MAX_LINKS, WordLimit};
use serde::Deserialize;

/// Raw `POST /generate` body. Everything is optional text so a malformed
/// field never rejects the whole form.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub topic: String,
    pub word_limit: Option<String>,
    pub use_links: Option<String>,
    pub num_links: Option<String>,
    pub link_1: Option<String>,
    pub link_2: Option<String>,
    pub link_3: Option<String>,
    pub link_4: Option<String>,
    pub link_5: Option<String>,
}

/// Raw `POST /login` body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// What the user last entered, kept in the session so the page re-renders
/// with the same values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub topic: String,
    pub word_limit: WordLimit,
    pub use_links: bool,
    pub num_links: usize,
    pub links: [String; MAX_LINKS],
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            topic: String::new(),
            word_limit: WordLimit::DEFAULT,
            use_links: false,
            num_links: 1,
            links: Default::default(),
        }
    }
}

impl From<GenerateForm> for FormState {
    fn from(form: GenerateForm) -> Self {
        let word_limit = form
            .word_limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map_or(WordLimit::DEFAULT, WordLimit::snap);
        let num_links = form
            .num_links
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_LINKS);
        let use_links = form
            .use_links
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("yes"));
        Self {
            topic: form.topic,
            word_limit,
            use_links,
            num_links,
            links: [
                form.link_1.unwrap_or_default(),
                form.link_2.unwrap_or_default(),
                form.link_3.unwrap_or_default(),
                form.link_4.unwrap_or_default(),
                form.link_5.unwrap_or_default(),
            ],
        }
    }
}

impl FormState {
    /// Links that will be sent: the first `num_links` fields, or none.
    pub fn active_links(&self) -> &[String] {
        if self.use_links {
            &self.links[..self.num_links]
        } else {
            &[]
        }
    }

    /// Validate into an [`ArticleRequest`].
    pub fn to_request(&self) -> Result<ArticleRequest, RequestError> {
        ArticleRequest::new(
            self.topic.clone(),
            self.word_limit,
            self.active_links().to_vec(),
        )
    }
}
