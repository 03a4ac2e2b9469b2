use futures::FutureExt;
use futures::future::{self, BoxFuture};
use realign_engine::{Document, EditorSurface, InputFormat, Selectable, Span, SurfaceError};

/// A file known in two versions: the text that was sent for checking and the
/// text on disk now.
///
/// Extraction always yields the checked text; reads, selections and commits
/// act on the current one.
#[derive(Debug)]
pub struct RecordedFile {
    checked: String,
    live: Document,
}

impl RecordedFile {
    pub fn new(checked: impl Into<String>, current: &str, format: InputFormat) -> Self {
        Self {
            checked: checked.into(),
            live: Document::new(current, format),
        }
    }

    pub fn live(&self) -> &Document {
        &self.live
    }
}

impl Selectable for RecordedFile {
    fn set_selection(&mut self, span: Span) -> Result<(), SurfaceError> {
        self.live.set_selection(span)
    }

    fn focus(&mut self) -> Result<(), SurfaceError> {
        self.live.focus()
    }

    fn scroll_into_view(&mut self) -> Result<(), SurfaceError> {
        self.live.scroll_into_view()
    }
}

impl EditorSurface for RecordedFile {
    fn input_format(&self) -> InputFormat {
        self.live.input_format()
    }

    fn extract_current_text(&self) -> BoxFuture<'_, Result<String, SurfaceError>> {
        future::ready(Ok(self.checked.clone())).boxed()
    }

    fn current_text(&self) -> Result<String, SurfaceError> {
        self.live.current_text()
    }

    fn commit(&mut self, span: Span, text: &str) -> Result<(), SurfaceError> {
        self.live.commit(span, text)
    }
}
