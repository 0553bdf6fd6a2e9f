use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use maglab_core::model::{Quiz, StepId};
use tracing::info;

use crate::error::QuizBankError;

const BUNDLED: &str = include_str!("../data/quizzes.json");

/// Quizzes keyed by the step they belong to.
#[derive(Debug, Clone, Default)]
pub struct QuizBank {
    quizzes: HashMap<StepId, Quiz>,
}

impl QuizBank {
    /// Parse and validate a JSON array of quizzes.
    ///
    /// # Errors
    ///
    /// Returns `QuizBankError` for malformed JSON, an invalid quiz, or two
    /// quizzes for the same step.
    pub fn from_json(raw: &str) -> Result<Self, QuizBankError> {
        let list: Vec<Quiz> = serde_json::from_str(raw)?;
        let mut quizzes = HashMap::with_capacity(list.len());
        for quiz in list {
            quiz.validate()?;
            let step = StepId::new(quiz.step.clone());
            if quizzes.contains_key(&step) {
                return Err(QuizBankError::Duplicate(quiz.step));
            }
            quizzes.insert(step, quiz);
        }
        Ok(Self { quizzes })
    }

    /// The quiz bank compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `QuizBankError` only if the bundled file is broken.
    pub fn bundled() -> Result<Self, QuizBankError> {
        Self::from_json(BUNDLED)
    }

    /// # Errors
    ///
    /// Returns `QuizBankError::Read` if the file cannot be read, or a parse error.
    pub fn from_file(path: &Path) -> Result<Self, QuizBankError> {
        let raw = fs::read_to_string(path).map_err(|source| QuizBankError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_json(&raw)?;
        info!(path = %path.display(), quizzes = bank.len(), "quiz bank loaded");
        Ok(bank)
    }

    /// `MAGLAB_QUIZ_FILE` when set, otherwise the bundled bank.
    ///
    /// # Errors
    ///
    /// Returns `QuizBankError` if the override file is unreadable or invalid.
    pub fn from_env() -> Result<Self, QuizBankError> {
        match env::var("MAGLAB_QUIZ_FILE") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim())),
            _ => Self::bundled(),
        }
    }

    #[must_use]
    pub fn get(&self, step: &StepId) -> Option<&Quiz> {
        self.quizzes.get(step)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maglab_core::model::{ExplanationPolicy, LessonPage, QuizVerdict};

    #[test]
    fn bundled_bank_covers_the_quiz_pages() {
        let bank = QuizBank::bundled().unwrap();
        for page in [
            LessonPage::BasicQuizOne,
            LessonPage::BasicQuizTwo,
            LessonPage::WorkedExample,
            LessonPage::ExamProblem,
        ] {
            assert!(bank.get(&page.step_id()).is_some(), "{page:?}");
        }
    }

    #[test]
    fn bundled_answers_match_the_lesson() {
        let bank = QuizBank::bundled().unwrap();
        let quiz = |page: LessonPage| bank.get(&page.step_id()).unwrap();

        assert_eq!(
            quiz(LessonPage::BasicQuizOne).grade(Some("동쪽")),
            QuizVerdict::Correct
        );
        assert_eq!(
            quiz(LessonPage::BasicQuizOne).grade(Some("north")),
            QuizVerdict::Incorrect
        );
        assert_eq!(
            quiz(LessonPage::BasicQuizTwo).grade(Some("2")),
            QuizVerdict::Correct
        );
        assert_eq!(
            quiz(LessonPage::BasicQuizTwo).explain,
            ExplanationPolicy::WhenIncorrect
        );
        assert_eq!(
            quiz(LessonPage::WorkedExample).grade(Some("4")),
            QuizVerdict::Correct
        );
        assert_eq!(
            quiz(LessonPage::ExamProblem).grade(Some("1")),
            QuizVerdict::Correct
        );
        assert!(quiz(LessonPage::ExamProblem).shows_explanation(QuizVerdict::Incorrect));
    }

    #[test]
    fn rejects_duplicate_steps() {
        let raw = r#"[
            {"step": "q", "prompt": "?", "kind": {"type": "keyword", "accepted": ["a"]}},
            {"step": "q", "prompt": "?", "kind": {"type": "keyword", "accepted": ["b"]}}
        ]"#;
        assert!(matches!(
            QuizBank::from_json(raw),
            Err(QuizBankError::Duplicate(step)) if step == "q"
        ));
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let raw = r#"[{"step": "q", "prompt": "?", "kind": {"type": "choice", "options": ["a"], "correct": 3}}]"#;
        assert!(matches!(
            QuizBank::from_json(raw),
            Err(QuizBankError::Invalid(_))
        ));
    }
}
