use std::collections::HashMap;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};

use crate::adapter::Adapter;
use crate::composite::{
    DEFAULT_REGION_ID_PREFIX, DEFAULT_WRAPPER, RegionSource, RegionTable, compose, remap,
};
use crate::error::{AlignError, Result, SurfaceError};
use crate::model::{AlignedMatch, CheckResult, ContentExtraction, Flagged, Match, MatchWithReplacement};
use crate::replace::ReplacementOutcome;
use crate::span::Span;

/// Per-region result of a composite selection or replacement.
#[derive(Debug)]
pub struct RegionOutcome<T> {
    pub region_id: String,
    pub result: Result<T>,
}

struct RegionEntry {
    id: String,
    wrapper: String,
    adapter: Box<dyn Adapter>,
}

/// Checks several [`Adapter`]s as one document.
pub struct CompositeAdapter {
    entries: Vec<RegionEntry>,
    default_wrapper: String,
    region_id_prefix: String,
    /// Table of the most recent extraction, until a check result consumes it.
    latest: Option<RegionTable>,
    tables: HashMap<String, RegionTable>,
}

impl Default for CompositeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeAdapter {
    pub fn new() -> Self {
        Self::with_defaults(DEFAULT_WRAPPER, DEFAULT_REGION_ID_PREFIX)
    }

    pub fn with_defaults(default_wrapper: impl Into<String>, region_id_prefix: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            default_wrapper: default_wrapper.into(),
            region_id_prefix: region_id_prefix.into(),
            latest: None,
            tables: HashMap::new(),
        }
    }

    /// Adds a region and returns its id.
    pub fn add_region(
        &mut self,
        adapter: impl Adapter + 'static,
        wrapper: Option<&str>,
        id: Option<&str>,
    ) -> String {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}", self.region_id_prefix, self.entries.len()));
        let wrapper = wrapper.unwrap_or(&self.default_wrapper).to_string();
        self.entries.push(RegionEntry {
            id: id.clone(),
            wrapper,
            adapter: Box::new(adapter),
        });
        id
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Region table bound to `check_id`.
    pub fn regions(&self, check_id: &str) -> Result<&RegionTable> {
        self.tables
            .get(check_id)
            .ok_or_else(|| AlignError::UnknownCheck(check_id.to_string()))
    }

    /// Extracts every region concurrently and composes the results.
    ///
    /// All extractions run to completion; if any of them failed the whole
    /// extraction fails and every region forgets its new snapshot. Tables
    /// already bound to check ids are kept.
    pub fn extract_content_for_check(&mut self) -> BoxFuture<'_, Result<ContentExtraction>> {
        async move {
            let results = join_all(
                self.entries
                    .iter_mut()
                    .map(|entry| entry.adapter.extract_content_for_check()),
            )
            .await;

            let mut sources = Vec::with_capacity(self.entries.len());
            let mut failure = None;
            for (entry, result) in self.entries.iter().zip(results) {
                match result {
                    Ok(extraction) => sources.push(RegionSource {
                        id: entry.id.clone(),
                        wrapper: entry.wrapper.clone(),
                        text: extraction.content,
                    }),
                    Err(err) => {
                        failure = Some(AlignError::Extraction {
                            region_id: entry.id.clone(),
                            source: into_surface_error(err),
                        });
                        break;
                    }
                }
            }

            if let Some(err) = failure {
                for entry in &mut self.entries {
                    entry.adapter.discard_pending();
                }
                self.latest = None;
                return Err(err);
            }

            let composed = compose(&sources);
            log::debug!(
                "composed {} regions into {} bytes",
                composed.regions.len(),
                composed.global_text.len()
            );
            self.latest = Some(composed.regions);
            Ok(ContentExtraction {
                content: composed.global_text,
            })
        }
        .boxed()
    }

    pub fn register_check_call(&mut self, check_id: &str) {
        self.bind_latest(check_id);
        for entry in &mut self.entries {
            entry.adapter.register_check_call(check_id);
        }
    }

    /// Binds the region table and hands every region the part of the
    /// checked range that falls inside it, in local coordinates.
    ///
    /// Regions outside the checked range get an empty range, so none of
    /// their matches can be resolved.
    pub fn register_check_result(&mut self, result: &CheckResult) -> Result<()> {
        let part = &result.checked_part;
        let check_id = part.check_id.as_str();
        if let Some(table) = self.latest.take() {
            self.tables.insert(check_id.to_string(), table);
        }
        let table = self.regions(check_id)?.clone();

        for (entry, region) in self.entries.iter_mut().zip(table.iter()) {
            let local = local_checked_range(region.global_range(), part.range);
            entry.adapter.register_check_result(&CheckResult::new(check_id, local))?;
        }
        Ok(())
    }

    pub fn select_ranges(
        &mut self,
        check_id: &str,
        matches: &[Match],
    ) -> Result<Vec<RegionOutcome<Vec<AlignedMatch<Match>>>>> {
        self.forward(check_id, matches, |adapter, local| {
            adapter.select_ranges(check_id, &local)
        })
    }

    pub fn replace_ranges(
        &mut self,
        check_id: &str,
        matches: Vec<MatchWithReplacement>,
    ) -> Result<Vec<RegionOutcome<ReplacementOutcome>>> {
        self.forward(check_id, &matches, |adapter, local| {
            adapter.replace_ranges(check_id, local)
        })
    }

    fn bind_latest(&mut self, check_id: &str) {
        match &self.latest {
            Some(table) => {
                self.tables.insert(check_id.to_string(), table.clone());
            }
            None => log::debug!("check {check_id} started before composite extraction"),
        }
    }

    fn forward<M, T>(
        &mut self,
        check_id: &str,
        matches: &[M],
        mut call: impl FnMut(&mut dyn Adapter, Vec<M>) -> Result<T>,
    ) -> Result<Vec<RegionOutcome<T>>>
    where
        M: Flagged,
    {
        let remapped = remap(matches, self.regions(check_id)?);
        if remapped.routed_count() == 0 {
            return Err(AlignError::ContentModified);
        }

        let outcomes = self
            .entries
            .iter_mut()
            .zip(remapped.by_region)
            .filter(|(_, local)| !local.is_empty())
            .map(|(entry, local)| RegionOutcome {
                region_id: entry.id.clone(),
                result: call(entry.adapter.as_mut(), local),
            })
            .collect();
        Ok(outcomes)
    }
}

fn local_checked_range(region: Span, checked: Span) -> Span {
    region
        .intersection(checked)
        .map_or(Span::at(0), |span| span.shift_left(region.start))
}

fn into_surface_error(err: AlignError) -> SurfaceError {
    match err {
        AlignError::Surface(source) | AlignError::Extraction { source, .. } => source,
        other => SurfaceError::Other(other.to_string()),
    }
}
