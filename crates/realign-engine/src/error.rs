use crate::span::Span;

/// Reasons a collaborator refused a selection or commit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("editor surface is no longer attached")]
    Detached,
    #[error("editor surface is hidden")]
    Hidden,
    #[error("span {start}..{end} is outside the current text (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("editor surface failed: {0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// None of the requested spans could be located in the current text.
    #[error("flagged content was changed and can no longer be located")]
    ContentModified,

    /// A composite match does not sit inside exactly one region.
    #[error("match {}..{} does not belong to exactly one region", range.start, range.end)]
    CrossRegionMatch { range: Span },

    #[error("content extraction failed for region {region_id}: {source}")]
    Extraction {
        region_id: String,
        source: SurfaceError,
    },

    #[error("no check session recorded for check id {0}")]
    UnknownCheck(String),

    #[error(
        "replacement spans overlap: {}..{} and {}..{}",
        first.start, first.end, second.start, second.end
    )]
    OverlappingReplacements { first: Span, second: Span },

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

pub type Result<T, E = AlignError> = std::result::Result<T, E>;
