//! What the user asked for: topic, length and reference links.

use crate::RequestError;
use serde::Serialize;
use std::fmt;

/// Maximum number of reference links per request.
pub const MAX_LINKS: usize = 5;

/// Placeholder used in the instructions when no links are given.
pub const NO_LINKS_TEXT: &str = "No reference links provided.";

/// Target article length, always in `{250, 300, ..., 1500}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct WordLimit(u32);

impl WordLimit {
    pub const MIN: u32 = 250;
    pub const MAX: u32 = 1500;
    pub const STEP: u32 = 50;
    pub const DEFAULT: WordLimit = WordLimit(Self::MIN);

    /// Clamp into range and round to the nearest step.
    pub fn snap(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        let step = i64::from(Self::STEP);
        let snapped = ((clamped + step / 2) / step) * step;
        // MIN and MAX are multiples of STEP, so rounding cannot leave the range.
        WordLimit(snapped as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Every reachable value, ascending.
    pub fn choices() -> impl Iterator<Item = WordLimit> {
        (Self::MIN..=Self::MAX)
            .step_by(Self::STEP as usize)
            .map(WordLimit)
    }
}

impl Default for WordLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for WordLimit {
    fn from(value: u32) -> Self {
        Self::snap(i64::from(value))
    }
}

impl From<i32> for WordLimit {
    fn from(value: i32) -> Self {
        Self::snap(i64::from(value))
    }
}

impl From<i64> for WordLimit {
    fn from(value: i64) -> Self {
        Self::snap(value)
    }
}

impl fmt::Display for WordLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated article request. Built fresh for every generate action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRequest {
    topic: String,
    word_limit: WordLimit,
    links: Vec<String>,
}

impl ArticleRequest {
    /// Validate user input.
    ///
    /// The topic and each link are trimmed. An empty topic, an empty link,
    /// or more than [`MAX_LINKS`] links are rejected.
    pub fn new(
        topic: impl Into<String>,
        word_limit: impl Into<WordLimit>,
        links: Vec<String>,
    ) -> Result<Self, RequestError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(RequestError::EmptyTopic);
        }
        if links.len() > MAX_LINKS {
            return Err(RequestError::TooManyLinks { max: MAX_LINKS });
        }
        let links = links
            .into_iter()
            .enumerate()
            .map(|(i, link)| {
                let link = link.trim().to_string();
                if link.is_empty() {
                    Err(RequestError::EmptyLink { index: i + 1 })
                } else {
                    Ok(link)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            topic,
            word_limit: word_limit.into(),
            links,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn word_limit(&self) -> WordLimit {
        self.word_limit
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// The single instruction string handed to the first agent.
    ///
    /// The topic and links appear as stored, i.e. trimmed of surrounding
    /// whitespace, not exactly as typed.
    pub fn instructions(&self) -> String {
        let links = if self.links.is_empty() {
            NO_LINKS_TEXT.to_string()
        } else {
            self.links.join("\n")
        };
        format!(
            "Topic: {}\nReference Links:\n{}\nWord Limit:{}",
            self.topic, links, self.word_limit
        )
    }
}
