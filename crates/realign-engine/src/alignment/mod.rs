/*!
 * # Alignment
 *
 * Relocates spans reported against a checked snapshot onto the current,
 * possibly edited, text.
 *
 * 1. Diff the snapshot against the current text character by character.
 * 2. Turn the diff into an [`OffsetMapping`] and move both ends of every span.
 * 3. Re-slice the current text and keep the span only if the slice still
 *    holds the flagged content, as judged by the format's [`Normalizer`].
 *
 * Alignment is a pure function of its inputs. Callers re-run it for every
 * selection or replacement request instead of caching results.
 */

pub mod mapping;
pub mod normalize;

pub use mapping::{DiffOptions, OffsetMapping};
pub use normalize::{Equivalence, NormalizationPolicy, Normalizer};

use crate::error::{AlignError, Result};
use crate::model::{AlignedMatch, Flagged, InputFormat};
use crate::span::Span;

/// Alignment settings shared by every call from one host.
#[derive(Debug, Clone, Default)]
pub struct Aligner {
    pub policy: NormalizationPolicy,
    pub diff: DiffOptions,
}

impl Aligner {
    pub fn new(policy: NormalizationPolicy, diff: DiffOptions) -> Self {
        Self { policy, diff }
    }

    /// Aligns `matches` from `old_text` onto `new_text`.
    ///
    /// Returns the matches that could be located, in input order. Fails with
    /// [`AlignError::ContentModified`] when matches were requested and none of
    /// them could be located.
    pub fn align<T: Flagged>(
        &self,
        old_text: &str,
        new_text: &str,
        matches: &[T],
        format: InputFormat,
    ) -> Result<Vec<AlignedMatch<T>>> {
        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let mapping = if old_text == new_text {
            OffsetMapping::identity(new_text.len())
        } else {
            OffsetMapping::new(old_text, new_text, &self.diff)
        };
        let normalizer = self.policy.normalizer(format);

        let aligned: Vec<_> = matches
            .iter()
            .filter_map(|m| {
                align_one(old_text, new_text, &mapping, normalizer.as_ref(), m).map(|range| {
                    AlignedMatch {
                        original_match: m.clone(),
                        range,
                    }
                })
            })
            .collect();

        if aligned.is_empty() {
            log::debug!("none of {} matches could be aligned", matches.len());
            return Err(AlignError::ContentModified);
        }
        if aligned.len() < matches.len() {
            log::debug!("aligned {} of {} matches", aligned.len(), matches.len());
        }
        Ok(aligned)
    }
}

/// Aligns with the default policy and diff settings.
pub fn align<T: Flagged>(
    old_text: &str,
    new_text: &str,
    matches: &[T],
    format: InputFormat,
) -> Result<Vec<AlignedMatch<T>>> {
    Aligner::default().align(old_text, new_text, matches, format)
}

fn align_one<T: Flagged>(
    old_text: &str,
    new_text: &str,
    mapping: &OffsetMapping,
    normalizer: &dyn Normalizer,
    flagged: &T,
) -> Option<Span> {
    let old_range = flagged.range();
    if old_range.start > old_range.end || old_range.end > old_text.len() {
        log::warn!(
            "match {}..{} lies outside the checked text (length {})",
            old_range.start,
            old_range.end,
            old_text.len()
        );
        return None;
    }

    let new_range = mapping.map_span(old_range);
    let Some(found) = new_range.slice(new_text) else {
        log::debug!(
            "match {}..{} mapped to {}..{}, not a valid slice",
            old_range.start,
            old_range.end,
            new_range.start,
            new_range.end
        );
        return None;
    };

    if normalizer.equivalent(found, flagged.content()) {
        Some(new_range)
    } else {
        log::debug!(
            "match {}..{} expected {:?} but found {:?}",
            old_range.start,
            old_range.end,
            flagged.content(),
            found
        );
        None
    }
}
