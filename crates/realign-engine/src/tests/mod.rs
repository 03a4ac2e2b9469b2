//! Shared fixtures for unit tests.

use crate::model::{AlignedMatch, Match, MatchWithReplacement};
use crate::span::Span;

/// Every occurrence of `word` in `text`, flagged in place.
pub fn matches_of(text: &str, word: &str) -> Vec<Match> {
    text.match_indices(word)
        .map(|(idx, found)| Match::new(found, Span::new(idx, idx + found.len())))
        .collect()
}

pub fn matches_with_replacement(text: &str, word: &str, replacement: &str) -> Vec<MatchWithReplacement> {
    matches_of(text, word)
        .into_iter()
        .map(|m| MatchWithReplacement::new(m.content, m.range, replacement))
        .collect()
}

/// Replacement matches already resolved against `text` itself.
pub fn aligned_in_place(text: &str, pairs: &[(&str, &str)]) -> Vec<AlignedMatch<MatchWithReplacement>> {
    pairs
        .iter()
        .flat_map(|(word, replacement)| matches_with_replacement(text, word, replacement))
        .map(|m| AlignedMatch {
            range: m.range,
            original_match: m,
        })
        .collect()
}
