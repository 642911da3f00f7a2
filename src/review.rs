//! Human-in-the-loop review between parsing and commit.
//!
//! [`ReviewSession`] is an explicit state machine:
//!
//! ```text
//! Idle → Reviewing → Committing → Idle        (confirm succeeded)
//!              ↑__________|                   (commit failed, set kept)
//! ```
//!
//! Each candidate additionally toggles between `Viewing` and `Editing`.
//! Candidates live only in session memory; cancel discards them with no
//! side effects on persisted state.

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::schedule::{ParsedClass, Weekday};
use crate::sync::{CalendarSync, CommitError};

/// Workflow-level session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewState {
    #[default]
    Idle,
    Reviewing,
    Committing,
}

/// Per-candidate presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateMode {
    #[default]
    Viewing,
    Editing,
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("no review in progress")]
    NotReviewing,

    #[error("unknown candidate {0}")]
    UnknownCandidate(Uuid),

    /// Field edits require the candidate to be in `Editing` mode first.
    #[error("candidate {0} is not open for editing")]
    NotEditing(Uuid),

    /// Confirm is refused while the working set is empty.
    #[error("nothing to commit; the candidate set is empty")]
    EmptySet,

    #[error(transparent)]
    Commit(#[from] CommitError),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// A candidate plus its presentation mode.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub class: ParsedClass,
    pub mode: CandidateMode,
}

/// The review working set and its state machine.
#[derive(Debug, Default)]
pub struct ReviewSession {
    state: ReviewState,
    candidates: Vec<Candidate>,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Load a parsed candidate batch, replacing any previous working set
    /// and entering `Reviewing`.
    pub fn load(&mut self, classes: Vec<ParsedClass>) {
        info!(count = classes.len(), "review session loaded");
        self.candidates = classes
            .into_iter()
            .map(|class| Candidate { class, mode: CandidateMode::Viewing })
            .collect();
        self.state = ReviewState::Reviewing;
    }

    fn candidate_mut(&mut self, id: Uuid) -> Result<&mut Candidate> {
        if self.state != ReviewState::Reviewing {
            return Err(WorkflowError::NotReviewing);
        }
        self.candidates
            .iter_mut()
            .find(|c| c.class.id == id)
            .ok_or(WorkflowError::UnknownCandidate(id))
    }

    /// Flip a candidate between `Viewing` and `Editing`. Returns the new
    /// mode.
    pub fn toggle_edit(&mut self, id: Uuid) -> Result<CandidateMode> {
        let candidate = self.candidate_mut(id)?;
        candidate.mode = match candidate.mode {
            CandidateMode::Viewing => CandidateMode::Editing,
            CandidateMode::Editing => CandidateMode::Viewing,
        };
        Ok(candidate.mode)
    }

    /// Apply a field edit to a candidate that is open for editing.
    pub fn edit<F>(&mut self, id: Uuid, f: F) -> Result<()>
    where
        F: FnOnce(&mut ParsedClass),
    {
        let candidate = self.candidate_mut(id)?;
        if candidate.mode != CandidateMode::Editing {
            return Err(WorkflowError::NotEditing(id));
        }
        f(&mut candidate.class);
        Ok(())
    }

    /// Add or remove a single day. The ordered set keeps canonical
    /// M, T, W, Th, F order regardless of toggle order. Returns whether the
    /// day is present after the toggle.
    pub fn toggle_day(&mut self, id: Uuid, day: Weekday) -> Result<bool> {
        let candidate = self.candidate_mut(id)?;
        if candidate.mode != CandidateMode::Editing {
            return Err(WorkflowError::NotEditing(id));
        }
        let days = &mut candidate.class.days;
        if days.remove(&day) {
            Ok(false)
        } else {
            days.insert(day);
            Ok(true)
        }
    }

    /// Remove one candidate from the working set, leaving the others
    /// untouched. The session stays in `Reviewing` even when the set
    /// becomes empty.
    pub fn delete(&mut self, id: Uuid) -> Result<ParsedClass> {
        if self.state != ReviewState::Reviewing {
            return Err(WorkflowError::NotReviewing);
        }
        let idx = self
            .candidates
            .iter()
            .position(|c| c.class.id == id)
            .ok_or(WorkflowError::UnknownCandidate(id))?;
        Ok(self.candidates.remove(idx).class)
    }

    /// Whether confirm is currently allowed.
    pub fn can_confirm(&self) -> bool {
        self.state == ReviewState::Reviewing && !self.candidates.is_empty()
    }

    /// Commit the surviving candidates through the calendar-sync
    /// collaborator. On success the session returns to `Idle` empty; on
    /// failure the set is preserved in `Reviewing` so the user can retry
    /// without re-parsing. Returns the number of committed classes.
    pub async fn confirm<S>(&mut self, sync: &S) -> Result<usize>
    where
        S: CalendarSync + ?Sized,
    {
        if self.state != ReviewState::Reviewing {
            return Err(WorkflowError::NotReviewing);
        }
        if self.candidates.is_empty() {
            return Err(WorkflowError::EmptySet);
        }

        self.state = ReviewState::Committing;
        let batch: Vec<ParsedClass> =
            self.candidates.iter().map(|c| c.class.clone()).collect();

        match sync.commit(&batch).await {
            Ok(()) => {
                info!(count = batch.len(), "commit succeeded");
                self.candidates.clear();
                self.state = ReviewState::Idle;
                Ok(batch.len())
            }
            Err(e) => {
                warn!(error = %e, "commit failed, keeping candidate set for retry");
                self.state = ReviewState::Reviewing;
                Err(e.into())
            }
        }
    }

    /// Discard all candidates and return to `Idle`. No side effects on
    /// persisted state.
    pub fn cancel(&mut self) {
        info!(discarded = self.candidates.len(), "review cancelled");
        self.candidates.clear();
        self.state = ReviewState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records committed batches; fails on demand.
    #[derive(Default)]
    struct RecordingSync {
        batches: Mutex<Vec<Vec<ParsedClass>>>,
        fail: bool,
    }

    #[async_trait]
    impl CalendarSync for RecordingSync {
        async fn commit(&self, classes: &[ParsedClass]) -> std::result::Result<(), CommitError> {
            if self.fail {
                return Err(CommitError::Rejected("backend down".into()));
            }
            self.batches.lock().unwrap().push(classes.to_vec());
            Ok(())
        }
    }

    fn loaded_session(codes: &[&str]) -> ReviewSession {
        let mut session = ReviewSession::new();
        session.load(codes.iter().map(|c| ParsedClass::new(c)).collect());
        session
    }

    #[test]
    fn load_enters_reviewing() {
        let session = loaded_session(&["BUAD 123"]);
        assert_eq!(session.state(), ReviewState::Reviewing);
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn confirm_refused_when_empty() {
        let mut session = loaded_session(&[]);
        assert!(!session.can_confirm());
        let err = session.confirm(&RecordingSync::default()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::EmptySet));
    }

    #[tokio::test]
    async fn confirm_refused_when_idle() {
        let mut session = ReviewSession::new();
        let err = session.confirm(&RecordingSync::default()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotReviewing));
    }

    #[tokio::test]
    async fn delete_then_confirm_commits_only_survivors() {
        let mut session = loaded_session(&["BUAD 123", "MATH201", "CHEM 110"]);
        let deleted_id = session.candidates()[1].class.id;
        session.delete(deleted_id).unwrap();

        let sync = RecordingSync::default();
        let committed = session.confirm(&sync).await.unwrap();
        assert_eq!(committed, 2);
        assert_eq!(session.state(), ReviewState::Idle);
        assert!(session.is_empty());

        let batches = sync.batches.lock().unwrap();
        let codes: Vec<_> = batches[0].iter().map(|c| c.course_code.as_str()).collect();
        assert_eq!(codes, vec!["BUAD 123", "CHEM 110"]);
    }

    #[tokio::test]
    async fn failed_commit_preserves_set_for_retry() {
        let mut session = loaded_session(&["BUAD 123", "MATH201"]);
        let failing = RecordingSync { fail: true, ..Default::default() };

        let err = session.confirm(&failing).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Commit(_)));
        assert_eq!(session.state(), ReviewState::Reviewing);
        assert_eq!(session.len(), 2);

        // Retry against a working collaborator without re-parsing.
        let sync = RecordingSync::default();
        assert_eq!(session.confirm(&sync).await.unwrap(), 2);
    }

    #[test]
    fn cancel_discards_everything() {
        let mut session = loaded_session(&["BUAD 123"]);
        session.cancel();
        assert_eq!(session.state(), ReviewState::Idle);
        assert!(session.is_empty());
    }

    #[test]
    fn edit_requires_editing_mode() {
        let mut session = loaded_session(&["BUAD 123"]);
        let id = session.candidates()[0].class.id;

        let err = session.edit(id, |c| c.course_name = "X".into()).unwrap_err();
        assert!(matches!(err, WorkflowError::NotEditing(_)));

        assert_eq!(session.toggle_edit(id).unwrap(), CandidateMode::Editing);
        session.edit(id, |c| c.course_name = "Business Fundamentals".into()).unwrap();
        assert_eq!(session.candidates()[0].class.course_name, "Business Fundamentals");

        assert_eq!(session.toggle_edit(id).unwrap(), CandidateMode::Viewing);
    }

    #[test]
    fn day_toggle_adds_removes_and_keeps_canonical_order() {
        let mut session = loaded_session(&["BUAD 123"]);
        let id = session.candidates()[0].class.id;
        session.toggle_edit(id).unwrap();

        assert!(session.toggle_day(id, Weekday::Friday).unwrap());
        assert!(session.toggle_day(id, Weekday::Monday).unwrap());
        assert!(session.toggle_day(id, Weekday::Wednesday).unwrap());
        assert_eq!(session.candidates()[0].class.day_code(), "MWF");

        assert!(!session.toggle_day(id, Weekday::Wednesday).unwrap());
        assert_eq!(session.candidates()[0].class.day_code(), "MF");
    }

    #[test]
    fn delete_keeps_session_reviewing_when_empty() {
        let mut session = loaded_session(&["BUAD 123"]);
        let id = session.candidates()[0].class.id;
        session.delete(id).unwrap();
        assert_eq!(session.state(), ReviewState::Reviewing);
        assert!(!session.can_confirm());
    }

    #[test]
    fn unknown_candidate_is_reported() {
        let mut session = loaded_session(&["BUAD 123"]);
        let err = session.delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownCandidate(_)));
    }
}
