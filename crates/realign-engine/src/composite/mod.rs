/*!
 * # Composite documents
 *
 * Several independent regions are checked as one virtual document. Each
 * region's text is wrapped in a synthetic element carrying its id:
 *
 * ```text
 * <div id="realign_region0">a b</div><div id="realign_region1">c d</div>
 * ```
 *
 * The [`RegionTable`] records where each region's inner text sits in the
 * composed document, so spans the checker reports against the whole can be
 * routed back to exactly one region in local coordinates.
 */

pub mod adapter;

pub use adapter::{CompositeAdapter, RegionOutcome};

use crate::error::AlignError;
use crate::model::Flagged;
use crate::span::Span;

/// Default wrapper element name.
pub const DEFAULT_WRAPPER: &str = "div";
/// Default prefix of generated region ids.
pub const DEFAULT_REGION_ID_PREFIX: &str = "realign_region";

/// One region's text and how to wrap it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSource {
    pub id: String,
    /// Opening tag body, e.g. `div` or `div class="note"`.
    pub wrapper: String,
    pub text: String,
}

/// Placement of a region's inner text inside the composed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub wrapper_start_len: usize,
    pub global_start: usize,
    pub global_end: usize,
}

impl Region {
    pub fn global_range(&self) -> Span {
        Span::new(self.global_start, self.global_end)
    }

    pub fn len(&self) -> usize {
        self.global_end - self.global_start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Regions in composition order. Ranges are disjoint and increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Index of the region whose inner text fully contains `span`.
    pub fn locate(&self, span: Span) -> Option<usize> {
        let idx = self.regions.partition_point(|r| r.global_end < span.start);
        self.regions
            .get(idx)
            .filter(|r| r.global_range().contains_span(span))
            .map(|_| idx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument {
    pub global_text: String,
    pub regions: RegionTable,
}

/// Concatenates `parts` into one wrapped document.
pub fn compose(parts: &[RegionSource]) -> ComposedDocument {
    let mut global_text = String::new();
    let mut regions = Vec::with_capacity(parts.len());

    for part in parts {
        let tag = part.wrapper.split_whitespace().next().unwrap_or(DEFAULT_WRAPPER);
        let id = html_escape::encode_double_quoted_attribute(&part.id);
        let open = format!("<{} id=\"{}\">", part.wrapper, id);

        let global_start = global_text.len() + open.len();
        global_text.push_str(&open);
        global_text.push_str(&part.text);
        let global_end = global_text.len();
        global_text.push_str("</");
        global_text.push_str(tag);
        global_text.push('>');

        regions.push(Region {
            id: part.id.clone(),
            wrapper_start_len: open.len(),
            global_start,
            global_end,
        });
    }

    ComposedDocument {
        global_text,
        regions: RegionTable { regions },
    }
}

/// Matches routed to regions, plus the ones that could not be.
#[derive(Debug)]
pub struct Remapped<M> {
    /// One entry per region, in table order, in region-local coordinates.
    pub by_region: Vec<Vec<M>>,
    /// [`AlignError::CrossRegionMatch`] for every match that was dropped.
    pub dropped: Vec<AlignError>,
}

impl<M> Remapped<M> {
    pub fn routed_count(&self) -> usize {
        self.by_region.iter().map(Vec::len).sum()
    }
}

/// Routes global `matches` to the region containing each of them.
pub fn remap<M: Flagged>(matches: &[M], table: &RegionTable) -> Remapped<M> {
    let mut by_region: Vec<Vec<M>> = (0..table.len()).map(|_| Vec::new()).collect();
    let mut dropped = Vec::new();

    for m in matches {
        let range = m.range();
        match table.locate(range) {
            Some(idx) => {
                let start = table.regions[idx].global_start;
                by_region[idx].push(m.with_range(range.shift_left(start)));
            }
            None => {
                log::warn!(
                    "dropping match {}..{}: not inside exactly one region",
                    range.start,
                    range.end
                );
                dropped.push(AlignError::CrossRegionMatch { range });
            }
        }
    }

    Remapped { by_region, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Match;
    use crate::tests::matches_of;
    use pretty_assertions::assert_eq;

    fn source(id: &str, text: &str) -> RegionSource {
        RegionSource {
            id: id.to_string(),
            wrapper: DEFAULT_WRAPPER.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn compose_wraps_each_region() {
        let doc = compose(&[source("r0", "a b"), source("r1", "c d")]);

        assert_eq!(doc.global_text, r#"<div id="r0">a b</div><div id="r1">c d</div>"#);
        let r1 = doc.regions.get(1).unwrap();
        assert_eq!(r1.wrapper_start_len, 13);
        assert_eq!(Span::new(r1.global_start, r1.global_end).slice(&doc.global_text), Some("c d"));
    }

    #[test]
    fn wrapper_attributes_stay_out_of_closing_tag() {
        let doc = compose(&[RegionSource {
            id: "a\"b".to_string(),
            wrapper: "p class=\"x\"".to_string(),
            text: "t".to_string(),
        }]);
        assert_eq!(doc.global_text, r#"<p class="x" id="a&quot;b">t</p>"#);
        assert_eq!(doc.regions.get(0).unwrap().id, "a\"b");
    }

    #[test]
    fn remap_routes_to_region_in_local_coordinates() {
        let doc = compose(&[source("r0", "a b"), source("r1", "c d")]);
        let matches = matches_of(&doc.global_text, "c d");

        let remapped = remap(&matches, &doc.regions);

        assert!(remapped.by_region[0].is_empty());
        assert_eq!(remapped.by_region[1], vec![Match::new("c d", Span::new(0, 3))]);
        assert!(remapped.dropped.is_empty());
    }

    #[test]
    fn straddling_match_is_dropped() {
        let doc = compose(&[source("r0", "a b"), source("r1", "c d")]);
        let straddle = vec![Match::new("b</div><div id=\"r1\">c", Span::new(15, 36))];

        let remapped = remap(&straddle, &doc.regions);

        assert_eq!(remapped.routed_count(), 0);
        assert!(matches!(
            remapped.dropped.as_slice(),
            [AlignError::CrossRegionMatch { range }] if *range == Span::new(15, 36)
        ));
    }

    #[test]
    fn match_inside_wrapper_markup_is_dropped() {
        let doc = compose(&[source("r0", "a b")]);
        let remapped = remap(&[Match::new("div", Span::new(1, 4))], &doc.regions);
        assert_eq!(remapped.dropped.len(), 1);
    }

    #[test]
    fn insertion_at_region_end_belongs_to_that_region() {
        let doc = compose(&[source("r0", "a b"), source("r1", "c d")]);
        let end = doc.regions.get(0).unwrap().global_end;
        assert_eq!(doc.regions.locate(Span::at(end)), Some(0));
    }
}
