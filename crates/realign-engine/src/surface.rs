//! Seams to the host's text surfaces.
//!
//! The engine never owns an editor. It reads text through these traits and
//! hands back spans to select and substitutions to commit.

use futures::future::BoxFuture;

use crate::error::SurfaceError;
use crate::model::InputFormat;
use crate::span::Span;

/// Something that can show a span to the user.
pub trait Selectable {
    fn set_selection(&mut self, span: Span) -> Result<(), SurfaceError>;

    fn focus(&mut self) -> Result<(), SurfaceError>;

    fn scroll_into_view(&mut self) -> Result<(), SurfaceError>;
}

/// A live, editable text buffer.
pub trait EditorSurface: Selectable + Send {
    /// How the buffer's text should be compared against flagged content.
    fn input_format(&self) -> InputFormat;

    /// Reads the text to submit for checking. Hosts may need to wait on
    /// their UI to produce it, hence the future.
    fn extract_current_text(&self) -> BoxFuture<'_, Result<String, SurfaceError>>;

    /// Reads the live text synchronously, for alignment.
    fn current_text(&self) -> Result<String, SurfaceError>;

    /// Replaces `span` of the live text with `text` as one localized edit.
    fn commit(&mut self, span: Span, text: &str) -> Result<(), SurfaceError>;
}

impl<T: Selectable + ?Sized> Selectable for Box<T> {
    fn set_selection(&mut self, span: Span) -> Result<(), SurfaceError> {
        (**self).set_selection(span)
    }

    fn focus(&mut self) -> Result<(), SurfaceError> {
        (**self).focus()
    }

    fn scroll_into_view(&mut self) -> Result<(), SurfaceError> {
        (**self).scroll_into_view()
    }
}

impl<T: EditorSurface + ?Sized> EditorSurface for Box<T> {
    fn input_format(&self) -> InputFormat {
        (**self).input_format()
    }

    fn extract_current_text(&self) -> BoxFuture<'_, Result<String, SurfaceError>> {
        (**self).extract_current_text()
    }

    fn current_text(&self) -> Result<String, SurfaceError> {
        (**self).current_text()
    }

    fn commit(&mut self, span: Span, text: &str) -> Result<(), SurfaceError> {
        (**self).commit(span, text)
    }
}
