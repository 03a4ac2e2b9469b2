use std::iter;
use std::time::Duration;

use similar::{Algorithm, DiffTag, TextDiff};

use crate::span::Span;

/// Tuning for the character diff behind an [`OffsetMapping`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Upper bound on diff time. When it trips, the diff falls back to a
    /// coarser edit script that is still correct, only less minimal.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Equal,
    Changed,
}

/// One contiguous piece of the edit script, in byte offsets of both texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    kind: RunKind,
    old: Span,
    new: Span,
}

/// Monotonic translation of offsets in an old text to offsets in a new text.
///
/// Built from the equal runs of a character diff. Offsets inside an equal run
/// move linearly; offsets inside a deleted or substituted run snap to the
/// nearest boundary of that run in the new text.
#[derive(Debug, Clone)]
pub struct OffsetMapping {
    runs: Vec<Run>,
    old_len: usize,
    new_len: usize,
}

impl OffsetMapping {
    pub fn new(old: &str, new: &str, options: &DiffOptions) -> Self {
        let mut config = TextDiff::configure();
        config.algorithm(Algorithm::Myers);
        if let Some(timeout) = options.timeout {
            config.timeout(timeout);
        }
        let diff = config.diff_chars(old, new);

        let old_bounds = char_bounds(old);
        let new_bounds = char_bounds(new);

        let runs = diff
            .ops()
            .iter()
            .map(|op| {
                let (tag, old_range, new_range) = op.as_tag_tuple();
                let kind = match tag {
                    DiffTag::Equal => RunKind::Equal,
                    DiffTag::Delete | DiffTag::Insert | DiffTag::Replace => RunKind::Changed,
                };
                Run {
                    kind,
                    old: Span::new(old_bounds[old_range.start], old_bounds[old_range.end]),
                    new: Span::new(new_bounds[new_range.start], new_bounds[new_range.end]),
                }
            })
            .collect();

        Self {
            runs,
            old_len: old.len(),
            new_len: new.len(),
        }
    }

    /// Mapping for a text that did not change.
    pub fn identity(len: usize) -> Self {
        let whole = Span::new(0, len);
        Self {
            runs: vec![Run {
                kind: RunKind::Equal,
                old: whole,
                new: whole,
            }],
            old_len: len,
            new_len: len,
        }
    }

    /// Maps the first byte of a span. Text inserted exactly at `offset` is
    /// skipped, so the result points past it.
    pub fn map_start(&self, offset: usize) -> usize {
        if offset >= self.old_len {
            return self.new_len;
        }
        // first run still covering `offset`; empty insert runs at `offset` end there and are passed
        let idx = self.runs.partition_point(|run| run.old.end <= offset);
        match self.runs.get(idx) {
            Some(run) if run.kind == RunKind::Equal => run.new.start + (offset - run.old.start),
            Some(run) => run.new.start,
            None => self.new_len,
        }
    }

    /// Maps the exclusive end of a span. Text inserted exactly at `offset` is
    /// not absorbed into the span.
    pub fn map_end(&self, offset: usize) -> usize {
        if offset == 0 {
            return 0;
        }
        let offset = offset.min(self.old_len);
        // first run reaching `offset`; it is the non-empty run holding byte `offset - 1`
        let idx = self.runs.partition_point(|run| run.old.end < offset);
        match self.runs.get(idx) {
            Some(run) if run.kind == RunKind::Equal => run.new.start + (offset - run.old.start),
            Some(run) => run.new.end,
            None => self.new_len,
        }
    }

    /// Maps a whole span. Empty spans stay empty and keep their anchor.
    pub fn map_span(&self, span: Span) -> Span {
        let start = self.map_start(span.start);
        if span.is_empty() {
            return Span::at(start);
        }
        let end = self.map_end(span.end).max(start);
        Span::new(start, end)
    }
}

/// Byte offset of every char boundary, including the end of the text.
fn char_bounds(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(iter::once(text.len()))
        .collect()
}
