//! Value types exchanged with the checking service and the host integration.

use serde::{Deserialize, Serialize};

use crate::span::{self, Span};

/// Markup awareness of a text surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputFormat {
    /// Literal text, compared byte for byte.
    #[default]
    Text,
    /// Markup; tags and entities are normalized before comparison.
    Html,
}

/// Anything that flags a span of a snapshot and remembers what it saw there.
pub trait Flagged: Clone {
    /// Literal text the checker believed occupied [`Flagged::range`].
    fn content(&self) -> &str;

    fn range(&self) -> Span;

    /// Same flag, moved to another coordinate space.
    fn with_range(&self, range: Span) -> Self;
}

/// A flagged span plus the text expected inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub content: String,
    #[serde(with = "span::pair")]
    pub range: Span,
}

impl Match {
    pub fn new(content: impl Into<String>, range: Span) -> Self {
        Self {
            content: content.into(),
            range,
        }
    }
}

impl Flagged for Match {
    fn content(&self) -> &str {
        &self.content
    }

    fn range(&self) -> Span {
        self.range
    }

    fn with_range(&self, range: Span) -> Self {
        Self {
            content: self.content.clone(),
            range,
        }
    }
}

/// A [`Match`] carrying the text that should occupy the span after a commit.
///
/// An empty `content` anchors an insertion without deleting anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchWithReplacement {
    pub content: String,
    #[serde(with = "span::pair")]
    pub range: Span,
    pub replacement: String,
}

impl MatchWithReplacement {
    pub fn new(content: impl Into<String>, range: Span, replacement: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            range,
            replacement: replacement.into(),
        }
    }

    /// Drops the replacement, e.g. to select what would be replaced.
    pub fn to_match(&self) -> Match {
        Match {
            content: self.content.clone(),
            range: self.range,
        }
    }
}

impl Flagged for MatchWithReplacement {
    fn content(&self) -> &str {
        &self.content
    }

    fn range(&self) -> Span {
        self.range
    }

    fn with_range(&self, range: Span) -> Self {
        Self {
            content: self.content.clone(),
            range,
            replacement: self.replacement.clone(),
        }
    }
}

/// An original flag resolved against the current buffer.
///
/// Built fresh for every alignment call; never cache these, the live buffer
/// may change again before the next call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedMatch<T> {
    pub original_match: T,
    /// Resolved span in the current buffer.
    pub range: Span,
}

impl<T> AlignedMatch<T> {
    pub fn found_offset(&self) -> usize {
        self.range.start
    }

    pub fn flag_length(&self) -> usize {
        self.range.len()
    }
}

/// Smallest span covering every aligned match, in whatever order they come.
pub fn covering_span<T>(matches: &[AlignedMatch<T>]) -> Option<Span> {
    let start = matches.iter().map(|m| m.range.start).min()?;
    let end = matches.iter().map(|m| m.range.end).max()?;
    Some(Span::new(start, end))
}

/// Distance from the leftmost aligned start to the rightmost aligned end.
pub fn complete_flag_length<T>(matches: &[AlignedMatch<T>]) -> usize {
    covering_span(matches).map_or(0, Span::len)
}

/// Sub-range of a snapshot that was submitted under a check id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedPart {
    pub check_id: String,
    #[serde(with = "span::pair")]
    pub range: Span,
}

/// Result envelope delivered by the checking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub checked_part: CheckedPart,
}

impl CheckResult {
    pub fn new(check_id: impl Into<String>, range: Span) -> Self {
        Self {
            checked_part: CheckedPart {
                check_id: check_id.into(),
                range,
            },
        }
    }
}

/// Content handed to the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentExtraction {
    pub content: String,
}
