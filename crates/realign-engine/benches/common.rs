// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use realign_engine::{Match, MatchWithReplacement, Span};

#[allow(dead_code)]
pub fn generate_text(paragraphs: usize) -> String {
    let base = "The quick brown fox jumps over the lazy dog. Their are several mistakes in this sentense, \
                and the checker flags them.\n\n";
    base.repeat(paragraphs)
}

/// Same text with a short edit at the start of every `every`-th paragraph.
#[allow(dead_code)]
pub fn edit_paragraphs(text: &str, every: usize) -> String {
    text.split_inclusive("\n\n")
        .enumerate()
        .map(|(i, paragraph)| {
            if i % every == 0 {
                format!("Edited: {paragraph}")
            } else {
                paragraph.to_string()
            }
        })
        .collect()
}

#[allow(dead_code)]
pub fn flag_all(text: &str, word: &str) -> Vec<Match> {
    text.match_indices(word)
        .map(|(idx, found)| Match::new(found, Span::new(idx, idx + found.len())))
        .collect()
}

#[allow(dead_code)]
pub fn replace_all(text: &str, word: &str, replacement: &str) -> Vec<MatchWithReplacement> {
    flag_all(text, word)
        .into_iter()
        .map(|m| MatchWithReplacement::new(m.content, m.range, replacement))
        .collect()
}
