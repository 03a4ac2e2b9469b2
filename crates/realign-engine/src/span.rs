use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A byte range `[start, end)` into a text buffer.
///
/// Spans are the unit of matching and replacement: a checker reports them
/// against a snapshot, alignment moves them onto the live text, and the
/// replacement applier splices text into them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty span anchoring an insertion point.
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when `other` lies entirely inside this span.
    #[must_use]
    pub fn contains_span(self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// True when the spans share at least one byte. Adjacent spans do not overlap.
    #[must_use]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The shared part of both spans, `None` when they are disjoint.
    ///
    /// Touching spans intersect in an empty span at the shared offset.
    #[must_use]
    pub fn intersection(self, other: Span) -> Option<Span> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Span { start, end })
    }

    /// Moves the span towards zero, e.g. from global to region-local coordinates.
    #[must_use]
    pub fn shift_left(self, by: usize) -> Span {
        Span {
            start: self.start.saturating_sub(by),
            end: self.end.saturating_sub(by),
        }
    }

    #[must_use]
    pub fn shift_right(self, by: usize) -> Span {
        Span {
            start: self.start + by,
            end: self.end + by,
        }
    }

    /// Slices `text` with this span, or `None` if the span is out of bounds or
    /// splits a UTF-8 character.
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(self.start..self.end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Serde adapter for the `[start, end]` pair form checkers put on the wire.
pub mod pair {
    use super::*;

    pub fn serialize<S: Serializer>(span: &Span, serializer: S) -> Result<S::Ok, S::Error> {
        (span.start, span.end).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Span, D::Error> {
        let (start, end) = <(usize, usize)>::deserialize(deserializer)?;
        Ok(Span { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_empty() {
        assert_eq!(Span::new(3, 8).len(), 5);
        assert!(Span::at(4).is_empty());
        assert!(Span::new(5, 2).is_empty());
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        let a = Span::new(0, 4);
        let b = Span::new(4, 9);
        assert!(!a.overlaps(b));
        assert!(!b.overlaps(a));
        assert!(a.overlaps(Span::new(3, 5)));
    }

    #[test]
    fn empty_span_inside_another_does_not_overlap() {
        assert!(!Span::new(2, 6).overlaps(Span::at(6)));
        assert!(!Span::new(2, 6).overlaps(Span::at(2)));
    }

    #[test]
    fn contains_span_is_inclusive_of_bounds() {
        let outer = Span::new(10, 20);
        assert!(outer.contains_span(Span::new(10, 20)));
        assert!(outer.contains_span(Span::at(20)));
        assert!(!outer.contains_span(Span::new(9, 12)));
        assert!(!outer.contains_span(Span::new(18, 21)));
    }

    #[test]
    fn intersection_clips_to_the_shared_part() {
        let checked = Span::new(5, 20);
        assert_eq!(checked.intersection(Span::new(0, 10)), Some(Span::new(5, 10)));
        assert_eq!(checked.intersection(Span::new(8, 12)), Some(Span::new(8, 12)));
        assert_eq!(checked.intersection(Span::new(20, 30)), Some(Span::at(20)));
        assert_eq!(checked.intersection(Span::new(21, 30)), None);
    }

    #[test]
    fn shifting_round_trips() {
        let span = Span::new(12, 15);
        assert_eq!(span.shift_left(10), Span::new(2, 5));
        assert_eq!(span.shift_left(10).shift_right(10), span);
    }

    #[test]
    fn slice_rejects_split_characters() {
        let text = "aüb";
        assert_eq!(Span::new(1, 3).slice(text), Some("ü"));
        assert_eq!(Span::new(1, 2).slice(text), None);
        assert_eq!(Span::new(2, 9).slice(text), None);
    }
}
