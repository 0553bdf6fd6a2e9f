use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::StepId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("a lesson catalog needs at least one step")]
    Empty,

    #[error("step id cannot be empty")]
    EmptyId,

    #[error("duplicate step id: {0}")]
    DuplicateId(StepId),

    #[error("steps of {0:?} are not contiguous")]
    NonContiguousUnit(Unit),
}

//
// ─── STEPS ─────────────────────────────────────────────────────────────────────
//

/// A class period; each unit tracks its own progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    One,
    Two,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::One, Unit::Two];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Unit::One => "Period 1",
            Unit::Two => "Period 2",
        }
    }
}

/// One addressable unit of lesson content.
///
/// Steps without a unit (the home page) count toward no progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    id: StepId,
    display_name: String,
    unit: Option<Unit>,
}

impl Step {
    #[must_use]
    pub fn new(id: impl Into<StepId>, display_name: impl Into<String>, unit: Option<Unit>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            unit,
        }
    }

    #[must_use]
    pub fn id(&self) -> &StepId {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn unit(&self) -> Option<Unit> {
        self.unit
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered, immutable list of lesson steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCatalog {
    steps: Vec<Step>,
    index: HashMap<StepId, usize>,
}

impl LessonCatalog {
    /// Build a catalog, checking ids are unique and units contiguous.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the list is empty, an id is empty or repeated,
    /// or a unit's steps are interleaved with other steps.
    pub fn new(steps: Vec<Step>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            if step.id.as_str().trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if index.insert(step.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(step.id.clone()));
            }
        }

        for unit in Unit::ALL {
            let positions: Vec<usize> = steps
                .iter()
                .enumerate()
                .filter(|(_, s)| s.unit == Some(unit))
                .map(|(i, _)| i)
                .collect();
            if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
                if last - first + 1 != positions.len() {
                    return Err(CatalogError::NonContiguousUnit(unit));
                }
            }
        }

        Ok(Self { steps, index })
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> &Step {
        // `new` rejects empty catalogs.
        &self.steps[0]
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    #[must_use]
    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.index.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &StepId) -> bool {
        self.index.contains_key(id)
    }

    /// Positions belonging to `unit`; empty when the unit has no steps.
    #[must_use]
    pub fn unit_range(&self, unit: Unit) -> Range<usize> {
        let start = self.steps.iter().position(|s| s.unit == Some(unit));
        match start {
            Some(start) => {
                let len = self.steps[start..]
                    .iter()
                    .take_while(|s| s.unit == Some(unit))
                    .count();
                start..start + len
            }
            None => 0..0,
        }
    }

    pub fn unit_steps(&self, unit: Unit) -> impl Iterator<Item = &Step> {
        self.steps[self.unit_range(unit)].iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_steps() -> Vec<Step> {
        vec![
            Step::new("intro", "Intro", None),
            Step::new("quiz", "Quiz", Some(Unit::One)),
            Step::new("report", "Report", Some(Unit::Two)),
        ]
    }

    #[test]
    fn indexes_steps_in_order() {
        let catalog = LessonCatalog::new(three_steps()).unwrap();
        assert_eq!(catalog.first().id().as_str(), "intro");
        assert_eq!(catalog.position(&StepId::from("report")), Some(2));
        assert!(!catalog.contains(&StepId::from("missing")));
        assert_eq!(catalog.unit_range(Unit::One), 1..2);
        assert_eq!(catalog.unit_range(Unit::Two), 2..3);
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        assert_eq!(LessonCatalog::new(Vec::new()), Err(CatalogError::Empty));

        let mut steps = three_steps();
        steps.push(Step::new("quiz", "Again", Some(Unit::Two)));
        assert_eq!(
            LessonCatalog::new(steps),
            Err(CatalogError::DuplicateId(StepId::from("quiz")))
        );

        assert_eq!(
            LessonCatalog::new(vec![Step::new(" ", "Blank", None)]),
            Err(CatalogError::EmptyId)
        );
    }

    #[test]
    fn rejects_interleaved_units() {
        let steps = vec![
            Step::new("a", "A", Some(Unit::One)),
            Step::new("b", "B", Some(Unit::Two)),
            Step::new("c", "C", Some(Unit::One)),
        ];
        assert_eq!(
            LessonCatalog::new(steps),
            Err(CatalogError::NonContiguousUnit(Unit::One))
        );
    }

    #[test]
    fn unit_without_steps_has_empty_range() {
        let catalog = LessonCatalog::new(vec![Step::new("only", "Only", Some(Unit::One))]).unwrap();
        assert!(catalog.unit_range(Unit::Two).is_empty());
        assert_eq!(catalog.unit_steps(Unit::Two).count(), 0);
    }
}
