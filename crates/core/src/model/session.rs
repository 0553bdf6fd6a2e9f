use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::catalog::{LessonCatalog, Step, Unit};
use crate::model::ids::{LearnerId, SessionId, StepId};
use crate::model::learner::{LearnerProfile, ProfileError, Roster};
use crate::time::Clock;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("unknown step: {0}")]
    UnknownStep(StepId),

    #[error("step {0} was submitted and is read-only")]
    StepLocked(StepId),

    #[error("step {0} has not been submitted yet")]
    NotSubmitted(StepId),
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    Student,
    Tutor,
}

impl ChatRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Tutor => "tutor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    #[must_use]
    pub fn student(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Student,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn tutor(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tutor,
            text: text.into(),
        }
    }
}

/// Per-learner lesson state: where they are and what they have entered.
///
/// All fields start from the defaults set in [`SessionState::new`]; nothing is
/// initialised lazily elsewhere. Every mutating method validates first, so a
/// failed call leaves the state untouched.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: SessionId,
    clock: Clock,
    catalog: Arc<LessonCatalog>,
    current: usize,
    completed: Vec<bool>,
    answers: BTreeMap<(StepId, String), String>,
    submitted: HashSet<StepId>,
    transcripts: HashMap<StepId, Vec<ChatTurn>>,
    profile: Option<LearnerProfile>,
    roster: Roster,
}

impl SessionState {
    /// Fresh session positioned on the first catalog step, nothing completed.
    #[must_use]
    pub fn new(catalog: Arc<LessonCatalog>, clock: Clock) -> Self {
        let completed = vec![false; catalog.len()];
        Self {
            id: SessionId::random(),
            clock,
            catalog,
            current: 0,
            completed,
            answers: BTreeMap::new(),
            submitted: HashSet::new(),
            transcripts: HashMap::new(),
            profile: None,
            roster: Roster::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> &LessonCatalog {
        &self.catalog
    }

    // ─── Navigation ────────────────────────────────────────────────────────

    #[must_use]
    pub fn current_step(&self) -> &Step {
        // `current` only ever holds a position validated against the catalog.
        &self.catalog.steps()[self.current]
    }

    /// Make `step` current and mark it complete.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownStep` if `step` is not in the catalog.
    pub fn navigate(&mut self, step: &StepId) -> Result<(), SessionError> {
        let position = self.position(step)?;
        self.current = position;
        self.completed[position] = true;
        Ok(())
    }

    #[must_use]
    pub fn is_completed(&self, step: &StepId) -> bool {
        self.catalog
            .position(step)
            .is_some_and(|i| self.completed[i])
    }

    /// Fraction of `unit`'s steps visited, in `[0, 1]`; 0 for an empty unit.
    #[must_use]
    pub fn progress(&self, unit: Unit) -> f64 {
        let range = self.catalog.unit_range(unit);
        if range.is_empty() {
            return 0.0;
        }
        let total = range.len();
        let done = self.completed[range].iter().filter(|&&c| c).count();
        #[allow(clippy::cast_precision_loss)]
        let fraction = done as f64 / total as f64;
        fraction
    }

    /// Whole-percent progress as shown beside each unit heading.
    #[must_use]
    pub fn progress_percent(&self, unit: Unit) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.progress(unit) * 100.0).floor() as u8;
        percent
    }

    // ─── Answers ───────────────────────────────────────────────────────────

    /// Store `value` under `(step, field)`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownStep` for steps outside the catalog and
    /// `SessionError::StepLocked` once the step has been submitted.
    pub fn record_answer(
        &mut self,
        step: &StepId,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.position(step)?;
        if self.submitted.contains(step) {
            return Err(SessionError::StepLocked(step.clone()));
        }
        self.answers
            .insert((step.clone(), field.to_owned()), value.into());
        Ok(())
    }

    #[must_use]
    pub fn answer(&self, step: &StepId, field: &str) -> Option<&str> {
        self.answers
            .get(&(step.clone(), field.to_owned()))
            .map(String::as_str)
    }

    /// Stored answer or an empty string.
    #[must_use]
    pub fn answer_or_empty(&self, step: &StepId, field: &str) -> &str {
        self.answer(step, field).unwrap_or("")
    }

    /// All `(field, value)` pairs stored for `step`, ordered by field name.
    pub fn answers_for<'a>(&'a self, step: &'a StepId) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.answers
            .iter()
            .filter(move |((s, _), _)| s == step)
            .map(|((_, field), value)| (field.as_str(), value.as_str()))
    }

    // ─── Final submission ──────────────────────────────────────────────────

    /// Lock `step` against further answer writes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownStep` if `step` is not in the catalog.
    pub fn submit_final(&mut self, step: &StepId) -> Result<(), SessionError> {
        self.position(step)?;
        self.submitted.insert(step.clone());
        Ok(())
    }

    /// Explicitly unlock a submitted step for editing. Returns whether it was locked.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownStep` if `step` is not in the catalog.
    pub fn reopen(&mut self, step: &StepId) -> Result<bool, SessionError> {
        self.position(step)?;
        Ok(self.submitted.remove(step))
    }

    #[must_use]
    pub fn is_submitted(&self, step: &StepId) -> bool {
        self.submitted.contains(step)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitted` unless `step` has been submitted.
    pub fn require_submitted(&self, step: &StepId) -> Result<(), SessionError> {
        if self.is_submitted(step) {
            Ok(())
        } else {
            Err(SessionError::NotSubmitted(step.clone()))
        }
    }

    // ─── Chat transcripts ──────────────────────────────────────────────────

    /// Append a chat turn to `step`'s transcript.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownStep` if `step` is not in the catalog.
    pub fn append_chat(&mut self, step: &StepId, turn: ChatTurn) -> Result<(), SessionError> {
        self.position(step)?;
        self.transcripts.entry(step.clone()).or_default().push(turn);
        Ok(())
    }

    #[must_use]
    pub fn transcript(&self, step: &StepId) -> &[ChatTurn] {
        self.transcripts.get(step).map_or(&[], Vec::as_slice)
    }

    // ─── Learner ───────────────────────────────────────────────────────────

    /// Add `(id, name, now)` to the roster unless the id is already there.
    ///
    /// Returns whether a roster line was appended.
    pub fn register_learner(&mut self, id: LearnerId, display_name: impl Into<String>) -> bool {
        let now = self.clock.now();
        self.roster.register(id, display_name, now)
    }

    /// Validate and store the learner profile, then register it on the roster.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` when the student id or name is blank.
    pub fn register_profile(&mut self, profile: LearnerProfile) -> Result<bool, ProfileError> {
        let profile = profile.validate()?;
        let appended = self.register_learner(profile.learner_id(), profile.name.clone());
        self.profile = Some(profile);
        Ok(appended)
    }

    /// Replace stored profile fields without touching the roster.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` when the student id or name is blank.
    pub fn update_profile(&mut self, profile: LearnerProfile) -> Result<(), ProfileError> {
        self.profile = Some(profile.validate()?);
        Ok(())
    }

    #[must_use]
    pub fn profile(&self) -> Option<&LearnerProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    fn position(&self, step: &StepId) -> Result<usize, SessionError> {
        self.catalog
            .position(step)
            .ok_or_else(|| SessionError::UnknownStep(step.clone()))
    }
}
