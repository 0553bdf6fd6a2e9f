//! The concrete two-period magnetism lesson.

use crate::model::catalog::{CatalogError, LessonCatalog, Step, Unit};
use crate::model::ids::StepId;

/// Answer field names shared by the pages and the services that read them.
pub mod fields {
    pub const OBSERVATION: &str = "observation";
    pub const FEEDBACK: &str = "feedback";
    pub const TEXT1: &str = "text1";
    pub const TEXT2: &str = "text2";
    pub const TEXT3: &str = "text3";
    pub const REPORT_TEXTS: [&str; 3] = [TEXT1, TEXT2, TEXT3];
    /// Choice index or typed text of a quiz.
    pub const RESPONSE: &str = "response";
    /// Last graded verdict of a quiz.
    pub const VERDICT: &str = "verdict";
}

/// Every page of the lesson, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonPage {
    Home,
    GoalsOne,
    Simulation,
    BasicQuizOne,
    ExperimentWire,
    ExperimentLoop,
    ExperimentSolenoid,
    Report,
    GoalsTwo,
    BasicQuizTwo,
    Theory,
    WorkedExample,
    ExamProblem,
    Inquiry,
    WrapUp,
}

impl LessonPage {
    pub const ALL: [LessonPage; 15] = [
        LessonPage::Home,
        LessonPage::GoalsOne,
        LessonPage::Simulation,
        LessonPage::BasicQuizOne,
        LessonPage::ExperimentWire,
        LessonPage::ExperimentLoop,
        LessonPage::ExperimentSolenoid,
        LessonPage::Report,
        LessonPage::GoalsTwo,
        LessonPage::BasicQuizTwo,
        LessonPage::Theory,
        LessonPage::WorkedExample,
        LessonPage::ExamProblem,
        LessonPage::Inquiry,
        LessonPage::WrapUp,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::GoalsOne => "goals-1",
            Self::Simulation => "simulation",
            Self::BasicQuizOne => "basic-quiz-1",
            Self::ExperimentWire => "experiment-1",
            Self::ExperimentLoop => "experiment-2",
            Self::ExperimentSolenoid => "experiment-3",
            Self::Report => "report",
            Self::GoalsTwo => "goals-2",
            Self::BasicQuizTwo => "basic-quiz-2",
            Self::Theory => "theory",
            Self::WorkedExample => "worked-example",
            Self::ExamProblem => "exam-problem",
            Self::Inquiry => "inquiry",
            Self::WrapUp => "wrap-up",
        }
    }

    #[must_use]
    pub fn step_id(self) -> StepId {
        StepId::new(self.id())
    }

    #[must_use]
    pub fn from_step_id(id: &StepId) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id.as_str())
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::GoalsOne | Self::GoalsTwo => "Learning goals",
            Self::Simulation => "Magnetic field simulation",
            Self::BasicQuizOne | Self::BasicQuizTwo => "Basic problem",
            Self::ExperimentWire => "Experiment 1: straight wire",
            Self::ExperimentLoop => "Experiment 2: circular loop",
            Self::ExperimentSolenoid => "Experiment 3: solenoid",
            Self::Report => "Report",
            Self::Theory => "Theory",
            Self::WorkedExample => "Worked example",
            Self::ExamProblem => "Exam problem",
            Self::Inquiry => "Inquiry",
            Self::WrapUp => "Wrap-up",
        }
    }

    #[must_use]
    pub fn unit(self) -> Option<Unit> {
        match self {
            Self::Home => None,
            Self::GoalsOne
            | Self::Simulation
            | Self::BasicQuizOne
            | Self::ExperimentWire
            | Self::ExperimentLoop
            | Self::ExperimentSolenoid
            | Self::Report => Some(Unit::One),
            Self::GoalsTwo
            | Self::BasicQuizTwo
            | Self::Theory
            | Self::WorkedExample
            | Self::ExamProblem
            | Self::Inquiry
            | Self::WrapUp => Some(Unit::Two),
        }
    }

    /// Experiment number for the three observation pages.
    #[must_use]
    pub fn experiment_number(self) -> Option<u8> {
        match self {
            Self::ExperimentWire => Some(1),
            Self::ExperimentLoop => Some(2),
            Self::ExperimentSolenoid => Some(3),
            _ => None,
        }
    }

    /// Diagram shown at the top of the page, looked up by file name.
    #[must_use]
    pub fn image(self) -> Option<&'static str> {
        match self {
            Self::Home => Some("oersted_experiment.png"),
            Self::Simulation => Some("magnet_lines_compass.png"),
            Self::ExperimentWire => Some("exp_straight_wire.png"),
            Self::ExperimentLoop => Some("exp_circular_wire.png"),
            Self::ExperimentSolenoid => Some("exp_solenoid.png"),
            Self::Theory => Some("right_hand_rule_straight.png"),
            _ => None,
        }
    }

    /// Pages holding a tutor conversation.
    #[must_use]
    pub fn has_chat(self) -> bool {
        matches!(self, Self::Home | Self::Inquiry | Self::WrapUp)
    }
}

/// Catalog of the fifteen lesson pages.
///
/// # Errors
///
/// Returns `CatalogError` only if the page table above is inconsistent.
pub fn lesson_catalog() -> Result<LessonCatalog, CatalogError> {
    LessonCatalog::new(
        LessonPage::ALL
            .into_iter()
            .map(|page| Step::new(page.id(), page.title(), page.unit()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_one_home_and_two_seven_step_units() {
        let catalog = lesson_catalog().unwrap();
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.first().id().as_str(), "home");
        assert_eq!(catalog.unit_range(Unit::One), 1..8);
        assert_eq!(catalog.unit_range(Unit::Two), 8..15);
    }

    #[test]
    fn step_ids_map_back_to_pages() {
        for page in LessonPage::ALL {
            assert_eq!(LessonPage::from_step_id(&page.step_id()), Some(page));
        }
        assert_eq!(LessonPage::from_step_id(&StepId::from("nope")), None);
    }

    #[test]
    fn goals_pages_have_distinct_ids() {
        assert_ne!(LessonPage::GoalsOne.id(), LessonPage::GoalsTwo.id());
        assert_eq!(LessonPage::GoalsOne.title(), LessonPage::GoalsTwo.title());
    }
}
