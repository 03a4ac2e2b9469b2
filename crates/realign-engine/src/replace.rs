//! Batch replacement of aligned spans.
//!
//! Edits are sorted by position and applied right to left, so applying one
//! never moves the offsets of the edits still pending. The caller's order of
//! the batch has no influence on the result.

use crate::error::{AlignError, Result, SurfaceError};
use crate::model::{AlignedMatch, MatchWithReplacement};
use crate::span::Span;

/// One localized substitution in the buffer the plan was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Span,
    pub text: String,
}

/// Edits in application order (descending offsets) plus their combined effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementPlan {
    pub edits: Vec<Edit>,
    pub outcome: ReplacementOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementOutcome {
    /// Buffer after every edit.
    pub text: String,
    /// From the first replaced offset to the end of the last replacement text.
    pub selection: Span,
}

/// Works out the edits for `aligned` against `current_text` without touching
/// any collaborator.
///
/// Spans must be disjoint; adjacent spans and insertion points are fine.
pub fn plan_replacements(
    current_text: &str,
    aligned: &[AlignedMatch<MatchWithReplacement>],
) -> Result<ReplacementPlan> {
    let mut ordered: Vec<Edit> = aligned
        .iter()
        .map(|m| Edit {
            range: m.range,
            text: m.original_match.replacement.clone(),
        })
        .collect();
    // stable: ties at one offset keep the caller's order in the result
    ordered.sort_by_key(|edit| (edit.range.start, edit.range.end));

    for edit in &ordered {
        if edit.range.slice(current_text).is_none() {
            return Err(SurfaceError::OutOfBounds {
                start: edit.range.start,
                end: edit.range.end,
                len: current_text.len(),
            }
            .into());
        }
    }
    // compare each span with the furthest-reaching one before it, not just its neighbour
    let mut furthest: Option<Span> = None;
    for edit in &ordered {
        if let Some(prev) = furthest {
            if prev.overlaps(edit.range) {
                return Err(AlignError::OverlappingReplacements {
                    first: prev,
                    second: edit.range,
                });
            }
        }
        if furthest.is_none_or(|prev| edit.range.end > prev.end) {
            furthest = Some(edit.range);
        }
    }

    let selection = selection_after(&ordered);

    let mut text = current_text.to_string();
    for edit in ordered.iter().rev() {
        text.replace_range(edit.range.start..edit.range.end, &edit.text);
    }

    ordered.reverse();
    Ok(ReplacementPlan {
        edits: ordered,
        outcome: ReplacementOutcome { text, selection },
    })
}

/// Applies `aligned` to `current_text` in one pass.
pub fn apply_replacements(
    current_text: &str,
    aligned: &[AlignedMatch<MatchWithReplacement>],
) -> Result<ReplacementOutcome> {
    plan_replacements(current_text, aligned).map(|plan| plan.outcome)
}

/// Selection covering the replaced text, for edits sorted ascending.
fn selection_after(ascending: &[Edit]) -> Span {
    let (Some(first), Some(last)) = (ascending.first(), ascending.last()) else {
        return Span::default();
    };
    let growth: isize = ascending[..ascending.len() - 1]
        .iter()
        .map(|edit| edit.text.len() as isize - edit.range.len() as isize)
        .sum();
    let last_start = last.range.start.saturating_add_signed(growth);
    Span::new(first.range.start, last_start + last.text.len())
}
