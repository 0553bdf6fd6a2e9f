use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::LearnerId;
use crate::time::short_stamp;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("student id is required")]
    MissingStudentId,

    #[error("name is required")]
    MissingName,
}

/// Student identity fields typed into the sidebar form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub student_id: String,
    pub name: String,
    pub class_group: String,
}

impl LearnerProfile {
    #[must_use]
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        class_group: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            class_group: class_group.into(),
        }
    }

    /// Trim fields and require a student id and name.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` when the student id or name is blank.
    pub fn validate(self) -> Result<Self, ProfileError> {
        let profile = Self {
            student_id: self.student_id.trim().to_owned(),
            name: self.name.trim().to_owned(),
            class_group: self.class_group.trim().to_owned(),
        };
        if profile.student_id.is_empty() {
            return Err(ProfileError::MissingStudentId);
        }
        if profile.name.is_empty() {
            return Err(ProfileError::MissingName);
        }
        Ok(profile)
    }

    #[must_use]
    pub fn learner_id(&self) -> LearnerId {
        LearnerId::new(&self.student_id)
    }
}

/// One roster line: who registered, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub learner_id: LearnerId,
    pub display_name: String,
    pub registered_at: DateTime<Utc>,
}

impl RosterEntry {
    /// `"{id} {name} ({yy-mm-dd HH:MM})"` in local time.
    #[must_use]
    pub fn tag(&self) -> String {
        format!(
            "{} {} ({})",
            self.learner_id,
            self.display_name,
            short_stamp(self.registered_at)
        )
    }
}

/// Append-only list of learners registered in this process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless the id is already present; returns whether it was appended.
    pub fn register(
        &mut self,
        learner_id: LearnerId,
        display_name: impl Into<String>,
        at: DateTime<Utc>,
    ) -> bool {
        if self.contains(&learner_id) {
            return false;
        }
        self.entries.push(RosterEntry {
            learner_id,
            display_name: display_name.into(),
            registered_at: at,
        });
        true
    }

    #[must_use]
    pub fn contains(&self, learner_id: &LearnerId) -> bool {
        self.entries.iter().any(|e| &e.learner_id == learner_id)
    }

    #[must_use]
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn first_registration_wins() {
        let mut roster = Roster::new();
        assert!(roster.register(LearnerId::from("20301"), "Kim", fixed_now()));
        assert!(!roster.register(
            LearnerId::from("20301"),
            "Kim Minsu",
            fixed_now() + chrono::Duration::hours(1)
        ));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.entries()[0].display_name, "Kim");
        assert_eq!(roster.entries()[0].registered_at, fixed_now());
    }

    #[test]
    fn keeps_registration_order() {
        let mut roster = Roster::new();
        roster.register(LearnerId::from("2"), "B", fixed_now());
        roster.register(LearnerId::from("1"), "A", fixed_now());
        let ids: Vec<&str> = roster.entries().iter().map(|e| e.learner_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn profile_requires_id_and_name() {
        assert_eq!(
            LearnerProfile::new(" ", "Kim", "").validate(),
            Err(ProfileError::MissingStudentId)
        );
        assert_eq!(
            LearnerProfile::new("20301", "", "3").validate(),
            Err(ProfileError::MissingName)
        );
        let ok = LearnerProfile::new(" 20301", "Kim ", " 3").validate().unwrap();
        assert_eq!(ok, LearnerProfile::new("20301", "Kim", "3"));
    }

    #[test]
    fn tag_starts_with_id_and_name() {
        let entry = RosterEntry {
            learner_id: LearnerId::from("20301"),
            display_name: "Kim".into(),
            registered_at: fixed_now(),
        };
        assert!(entry.tag().starts_with("20301 Kim ("));
    }
}
