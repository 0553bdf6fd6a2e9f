mod catalog;
mod command;
mod ids;
mod learner;
pub mod lesson;
mod quiz;
mod session;

pub use ids::{LearnerId, SessionId, StepId};

pub use catalog::{CatalogError, LessonCatalog, Step, Unit};
pub use command::SessionCommand;
pub use learner::{LearnerProfile, ProfileError, Roster, RosterEntry};
pub use lesson::{LessonPage, fields, lesson_catalog};
pub use quiz::{ExplanationPolicy, Quiz, QuizError, QuizKind, QuizVerdict};
pub use session::{ChatRole, ChatTurn, SessionError, SessionState};
