pub mod adapter;
pub mod alignment;
pub mod composite;
pub mod editing;
pub mod error;
pub mod io;
pub mod model;
pub mod replace;
pub mod session;
pub mod span;
pub mod surface;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use adapter::{Adapter, CheckAdapter};
pub use alignment::{Aligner, DiffOptions, Equivalence, NormalizationPolicy, OffsetMapping, align};
pub use composite::{
    ComposedDocument, CompositeAdapter, Region, RegionOutcome, RegionSource, RegionTable, Remapped,
    compose, remap,
};
pub use editing::{Document, Patch};
pub use error::{AlignError, Result, SurfaceError};
pub use io::*;
pub use model::*;
pub use replace::{Edit, ReplacementOutcome, ReplacementPlan, apply_replacements, plan_replacements};
pub use session::{CheckSession, CheckSessions};
pub use span::Span;
pub use surface::{EditorSurface, Selectable};
