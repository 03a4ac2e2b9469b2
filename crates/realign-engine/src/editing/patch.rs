use crate::span::Span;

/// Result of committing an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub changed: Vec<Span>,
    pub new_selection: Span,
    pub version: u64,
}
