use std::collections::HashMap;

use crate::error::{AlignError, Result};
use crate::model::CheckedPart;
use crate::span::Span;

/// Snapshot of the text a check ran against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSession {
    pub checked_part: CheckedPart,
    pub snapshot: String,
}

/// Per check-id bookkeeping of checked snapshots.
///
/// At most one snapshot per id is kept; recording the same id again replaces
/// the previous one. Records are never mutated in place.
#[derive(Debug, Default)]
pub struct CheckSessions {
    sessions: HashMap<String, CheckSession>,
}

impl CheckSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, check_id: impl Into<String>, snapshot: impl Into<String>, range: Span) {
        let check_id = check_id.into();
        let snapshot = snapshot.into();
        log::debug!(
            "recording check {check_id} over {}..{} of {} bytes",
            range.start,
            range.end,
            snapshot.len()
        );
        let session = CheckSession {
            checked_part: CheckedPart {
                check_id: check_id.clone(),
                range,
            },
            snapshot,
        };
        self.sessions.insert(check_id, session);
    }

    /// The snapshot recorded for `check_id`.
    pub fn lookup(&self, check_id: &str) -> Result<&str> {
        self.session(check_id).map(|s| s.snapshot.as_str())
    }

    /// Sub-range of the snapshot that was actually submitted.
    pub fn checked_range(&self, check_id: &str) -> Result<Span> {
        self.session(check_id).map(|s| s.checked_part.range)
    }

    pub fn session(&self, check_id: &str) -> Result<&CheckSession> {
        self.sessions
            .get(check_id)
            .ok_or_else(|| AlignError::UnknownCheck(check_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
