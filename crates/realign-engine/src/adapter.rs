//! Glue between a checking service and one editor surface.
//!
//! The adapter snapshots the surface when content is extracted, binds that
//! snapshot to a check id once the checker acknowledges it, and later
//! realigns the checker's spans against whatever the surface holds by then.

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::alignment::Aligner;
use crate::error::{AlignError, Result};
use crate::model::{
    AlignedMatch, CheckResult, ContentExtraction, Flagged, Match, MatchWithReplacement,
    covering_span,
};
use crate::replace::{ReplacementOutcome, plan_replacements};
use crate::session::CheckSessions;
use crate::span::Span;
use crate::surface::EditorSurface;

/// Operations a host integration offers to the checking workflow.
pub trait Adapter: Send {
    /// Reads the text to check and remembers it as the pending snapshot.
    fn extract_content_for_check(&mut self) -> BoxFuture<'_, Result<ContentExtraction>>;

    /// Binds the pending snapshot to `check_id` as soon as the check starts.
    fn register_check_call(&mut self, check_id: &str);

    /// Binds a snapshot to the checked part the service reports back.
    ///
    /// A pending snapshot wins over one already recorded for the id, and is
    /// consumed by the binding.
    fn register_check_result(&mut self, result: &CheckResult) -> Result<()>;

    /// Forgets an extraction that will never be checked.
    fn discard_pending(&mut self);

    /// Realigns `matches` and selects them in the surface.
    fn select_ranges(&mut self, check_id: &str, matches: &[Match]) -> Result<Vec<AlignedMatch<Match>>>;

    /// Realigns `matches` and commits their replacements.
    fn replace_ranges(
        &mut self,
        check_id: &str,
        matches: Vec<MatchWithReplacement>,
    ) -> Result<ReplacementOutcome>;
}

/// [`Adapter`] over a single [`EditorSurface`].
pub struct CheckAdapter<S> {
    surface: S,
    aligner: Aligner,
    sessions: CheckSessions,
    pending: Option<String>,
}

impl<S: EditorSurface> CheckAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self::with_aligner(surface, Aligner::default())
    }

    pub fn with_aligner(surface: S, aligner: Aligner) -> Self {
        Self {
            surface,
            aligner,
            sessions: CheckSessions::new(),
            pending: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn sessions(&self) -> &CheckSessions {
        &self.sessions
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Aligns the in-range part of `matches` against the live text.
    fn align_live<T: Flagged>(&self, check_id: &str, matches: &[T]) -> Result<(String, Vec<AlignedMatch<T>>)> {
        let session = self.sessions.session(check_id)?;
        let checked = session.checked_part.range;

        let in_range: Vec<T> = matches
            .iter()
            .filter(|m| checked.contains_span(m.range()))
            .cloned()
            .collect();
        if in_range.len() < matches.len() {
            log::debug!(
                "check {check_id}: dropped {} matches outside checked range {}..{}",
                matches.len() - in_range.len(),
                checked.start,
                checked.end
            );
        }
        if in_range.is_empty() && !matches.is_empty() {
            return Err(AlignError::ContentModified);
        }

        let current = self.surface.current_text()?;
        let aligned = self.aligner.align(
            &session.snapshot,
            &current,
            &in_range,
            self.surface.input_format(),
        )?;
        Ok((current, aligned))
    }

    fn reveal(&mut self, selection: Span) -> Result<()> {
        self.surface.set_selection(selection)?;
        self.surface.focus()?;
        self.surface.scroll_into_view()?;
        Ok(())
    }
}

impl<S: EditorSurface> Adapter for CheckAdapter<S> {
    fn extract_content_for_check(&mut self) -> BoxFuture<'_, Result<ContentExtraction>> {
        async move {
            let content = self.surface.extract_current_text().await?;
            self.pending = Some(content.clone());
            Ok::<_, AlignError>(ContentExtraction { content })
        }
        .boxed()
    }

    fn register_check_call(&mut self, check_id: &str) {
        // the content may also be extracted after the call is registered
        match &self.pending {
            Some(snapshot) => {
                let range = Span::new(0, snapshot.len());
                self.sessions.record(check_id, snapshot.clone(), range);
            }
            None => log::debug!("check {check_id} started before extraction"),
        }
    }

    fn register_check_result(&mut self, result: &CheckResult) -> Result<()> {
        let part = &result.checked_part;
        let snapshot = match self.pending.take() {
            Some(snapshot) => snapshot,
            None => self.sessions.lookup(&part.check_id)?.to_string(),
        };
        self.sessions.record(part.check_id.clone(), snapshot, part.range);
        Ok(())
    }

    fn discard_pending(&mut self) {
        self.pending = None;
    }

    fn select_ranges(&mut self, check_id: &str, matches: &[Match]) -> Result<Vec<AlignedMatch<Match>>> {
        let (_, aligned) = self.align_live(check_id, matches)?;
        if let Some(selection) = covering_span(&aligned) {
            self.reveal(selection)?;
        }
        Ok(aligned)
    }

    fn replace_ranges(
        &mut self,
        check_id: &str,
        matches: Vec<MatchWithReplacement>,
    ) -> Result<ReplacementOutcome> {
        let (current, aligned) = self.align_live(check_id, &matches)?;
        let plan = plan_replacements(&current, &aligned)?;
        if plan.edits.is_empty() {
            return Ok(plan.outcome);
        }

        // descending order keeps the remaining spans valid after each commit
        for edit in &plan.edits {
            self.surface.commit(edit.range, &edit.text)?;
        }
        log::debug!("check {check_id}: committed {} edits", plan.edits.len());

        self.reveal(plan.outcome.selection)?;
        Ok(plan.outcome)
    }
}
