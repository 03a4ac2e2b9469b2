use futures::FutureExt;
use futures::future::{self, BoxFuture};
use xi_rope::delta::{Builder, DeltaElement};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Patch;
use crate::error::SurfaceError;
use crate::model::InputFormat;
use crate::span::Span;
use crate::surface::{EditorSurface, Selectable};

/// Rope-backed text surface
///
/// Document stands in for a host editor. It maintains:
///
/// ## 1. Single Source of Truth (xi-rope buffer)
/// - **Lossless storage**: entire text in one `xi_rope::Rope` buffer
/// - **Exact round-trip**: `to_bytes()` returns identical content to what was loaded
/// - **Delta edits**: every commit is compiled to a Delta before it touches the rope
///
/// ## 2. Host State
/// - **Selection**: byte span, updated by selection requests and commits
/// - **Focus / scroll**: recorded so callers can see what a request did
/// - **Attachment / visibility**: a detached or hidden document refuses
///   selection and commits with a [`SurfaceError`]
///
/// ## Usage Pattern
///
/// ```rust
/// # use realign_engine::editing::Document;
/// # use realign_engine::{Selectable, Span};
/// let mut doc = Document::from_bytes(b"wordOne wordTwo").unwrap();
///
/// doc.set_selection(Span::new(8, 15)).unwrap();
/// assert_eq!(doc.selected_text(), "wordTwo");
///
/// doc.hide();
/// assert!(doc.set_selection(Span::new(0, 7)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// xi-rope buffer containing the entire text as UTF-8 bytes
    pub(crate) buffer: Rope,
    /// Current selection/cursor position as byte offsets in buffer
    pub(crate) selection: Span,
    /// Version counter incremented on each edit (enables change detection)
    pub(crate) version: u64,
    format: InputFormat,
    focused: bool,
    scrolled_to: Option<Span>,
    attached: bool,
    visible: bool,
}

impl Document {
    /// Create a new plain-text document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text, InputFormat::Text))
    }

    pub fn new(text: &str, format: InputFormat) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selection: Span::at(len), // Start with cursor at end
            version: 0,
            format,
            focused: false,
            scrolled_to: None,
            attached: true,
            visible: true,
        }
    }

    /// Markup document; flagged content is compared after normalization
    pub fn html(text: &str) -> Self {
        Self::new(text, InputFormat::Html)
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current selection range
    pub fn selection(&self) -> Span {
        self.selection
    }

    /// Text under the current selection
    pub fn selected_text(&self) -> String {
        self.buffer
            .slice_to_cow(self.selection.start..self.selection.end)
            .into_owned()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The selection that was last scrolled into view, if any
    pub fn scrolled_to(&self) -> Option<Span> {
        self.scrolled_to
    }

    /// Simulates the host removing the editor from the page.
    pub fn detach(&mut self) {
        self.attached = false;
        self.focused = false;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.focused = false;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Replace `span` with `text` as a single Delta
    ///
    /// ## Edit Pipeline Steps
    ///
    /// 1. **Validation**: the document must be attached and visible, and the
    ///    span must lie on character boundaries inside the buffer
    /// 2. **Delta Compilation**: one `replace` on an xi-rope `Builder`
    /// 3. **Buffer Application**: apply the Delta to the rope
    /// 4. **Selection Update**: caret after the inserted text
    /// 5. **Version Increment**
    ///
    /// Returns a `Patch` with the inserted ranges, new selection and version.
    pub fn replace(&mut self, span: Span, text: &str) -> Result<Patch, SurfaceError> {
        self.ensure_interactive()?;
        self.ensure_in_bounds(span)?;

        let delta = self.compile_replace(span, text);

        // Track changed ranges for the patch
        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in delta.els.iter() {
            match op {
                DeltaElement::Copy(_from, to) => {
                    cursor = *to;
                }
                DeltaElement::Insert(inserted) => {
                    let start = cursor;
                    let end = cursor + inserted.len();
                    changed.push(Span::new(start, end));
                    cursor = end;
                }
            }
        }

        self.buffer = delta.apply(&self.buffer);

        let new_selection = Span::at(span.start + text.len());
        self.selection = new_selection;
        self.version += 1;

        log::debug!(
            "document v{} replaced {}..{} with {} bytes",
            self.version,
            span.start,
            span.end,
            text.len()
        );

        Ok(Patch {
            changed,
            new_selection,
            version: self.version,
        })
    }

    fn compile_replace(&self, span: Span, text: &str) -> Delta<RopeInfo> {
        let mut builder = Builder::new(self.buffer.len());
        builder.replace(span.start..span.end, Rope::from(text));
        builder.build()
    }

    fn ensure_attached(&self) -> Result<(), SurfaceError> {
        if self.attached {
            Ok(())
        } else {
            Err(SurfaceError::Detached)
        }
    }

    fn ensure_interactive(&self) -> Result<(), SurfaceError> {
        self.ensure_attached()?;
        if self.visible {
            Ok(())
        } else {
            Err(SurfaceError::Hidden)
        }
    }

    fn ensure_in_bounds(&self, span: Span) -> Result<(), SurfaceError> {
        let len = self.buffer.len();
        let on_boundary = |offset: usize| {
            offset == 0 || offset == len || self.buffer.is_codepoint_boundary(offset)
        };
        if span.start <= span.end && span.end <= len && on_boundary(span.start) && on_boundary(span.end) {
            Ok(())
        } else {
            Err(SurfaceError::OutOfBounds {
                start: span.start,
                end: span.end,
                len,
            })
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // Compare buffer content as strings; ropes with equal text may differ in shape
        self.buffer.to_string() == other.buffer.to_string()
            && self.selection == other.selection
            && self.version == other.version
            && self.format == other.format
    }
}

impl Selectable for Document {
    fn set_selection(&mut self, span: Span) -> Result<(), SurfaceError> {
        self.ensure_interactive()?;
        self.ensure_in_bounds(span)?;
        self.selection = span;
        Ok(())
    }

    fn focus(&mut self) -> Result<(), SurfaceError> {
        self.ensure_interactive()?;
        self.focused = true;
        Ok(())
    }

    fn scroll_into_view(&mut self) -> Result<(), SurfaceError> {
        self.ensure_interactive()?;
        self.scrolled_to = Some(self.selection);
        Ok(())
    }
}

impl EditorSurface for Document {
    fn input_format(&self) -> InputFormat {
        self.format
    }

    fn extract_current_text(&self) -> BoxFuture<'_, Result<String, SurfaceError>> {
        future::ready(self.current_text()).boxed()
    }

    fn current_text(&self) -> Result<String, SurfaceError> {
        self.ensure_attached()?;
        Ok(self.text())
    }

    fn commit(&mut self, span: Span, text: &str) -> Result<(), SurfaceError> {
        self.replace(span, text).map(|_| ())
    }
}
