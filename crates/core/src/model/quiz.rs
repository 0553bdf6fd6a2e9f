use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz {0} has no options")]
    NoOptions(String),

    #[error("quiz {quiz} marks option {correct} correct but has {len} options")]
    CorrectOutOfRange {
        quiz: String,
        correct: usize,
        len: usize,
    },

    #[error("quiz {0} accepts no keywords")]
    NoKeywords(String),
}

/// How the answer is checked. The correct option is configuration, not derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizKind {
    /// Pick one option; `correct` is a zero-based index into `options`.
    Choice { options: Vec<String>, correct: usize },
    /// Free text; correct when it contains any accepted keyword, ignoring case.
    Keyword { accepted: Vec<String> },
}

/// When the worked explanation is shown after checking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationPolicy {
    #[default]
    Always,
    WhenIncorrect,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizVerdict {
    Correct,
    Incorrect,
    Unanswered,
}

impl QuizVerdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::Unanswered => "unanswered",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "correct" => Some(Self::Correct),
            "incorrect" => Some(Self::Incorrect),
            "unanswered" => Some(Self::Unanswered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Step id the quiz belongs to.
    pub step: String,
    pub prompt: String,
    #[serde(default)]
    pub image: Option<String>,
    pub kind: QuizKind,
    #[serde(default)]
    pub explanation: Option<String>,
    /// Worked-solution figure shown with the explanation.
    #[serde(default)]
    pub explanation_image: Option<String>,
    #[serde(default)]
    pub explain: ExplanationPolicy,
    /// Shown on a wrong keyword answer.
    #[serde(default)]
    pub hint: Option<String>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError` when a choice quiz has no options or an out-of-range
    /// correct index, or a keyword quiz accepts nothing.
    pub fn validate(&self) -> Result<(), QuizError> {
        match &self.kind {
            QuizKind::Choice { options, correct } => {
                if options.is_empty() {
                    return Err(QuizError::NoOptions(self.step.clone()));
                }
                if *correct >= options.len() {
                    return Err(QuizError::CorrectOutOfRange {
                        quiz: self.step.clone(),
                        correct: *correct,
                        len: options.len(),
                    });
                }
            }
            QuizKind::Keyword { accepted } => {
                if accepted.iter().all(|k| k.trim().is_empty()) {
                    return Err(QuizError::NoKeywords(self.step.clone()));
                }
            }
        }
        Ok(())
    }

    /// Grade a stored response: the option index for choice quizzes, the typed
    /// text for keyword quizzes.
    #[must_use]
    pub fn grade(&self, response: Option<&str>) -> QuizVerdict {
        let Some(response) = response.map(str::trim).filter(|r| !r.is_empty()) else {
            return QuizVerdict::Unanswered;
        };
        let correct = match &self.kind {
            QuizKind::Choice { options, correct } => match response.parse::<usize>() {
                Ok(picked) if picked < options.len() => picked == *correct,
                _ => return QuizVerdict::Unanswered,
            },
            QuizKind::Keyword { accepted } => {
                let response = response.to_lowercase();
                accepted
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .any(|k| response.contains(&k))
            }
        };
        if correct {
            QuizVerdict::Correct
        } else {
            QuizVerdict::Incorrect
        }
    }

    #[must_use]
    pub fn shows_explanation(&self, verdict: QuizVerdict) -> bool {
        match self.explain {
            ExplanationPolicy::Always => verdict != QuizVerdict::Unanswered,
            ExplanationPolicy::WhenIncorrect => verdict == QuizVerdict::Incorrect,
            ExplanationPolicy::Never => false,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuizKind::Choice { options, .. } => options,
            QuizKind::Keyword { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(correct: usize) -> Quiz {
        Quiz {
            step: "basic-quiz-2".into(),
            prompt: "Which statement is wrong?".into(),
            image: None,
            kind: QuizKind::Choice {
                options: vec!["a".into(), "b".into(), "c".into()],
                correct,
            },
            explanation: Some("because".into()),
            explanation_image: None,
            explain: ExplanationPolicy::WhenIncorrect,
            hint: None,
        }
    }

    #[test]
    fn grades_choice_against_configured_option() {
        let quiz = choice(2);
        assert_eq!(quiz.grade(Some("2")), QuizVerdict::Correct);
        assert_eq!(quiz.grade(Some("0")), QuizVerdict::Incorrect);
        assert_eq!(quiz.grade(None), QuizVerdict::Unanswered);
        assert_eq!(quiz.grade(Some("7")), QuizVerdict::Unanswered);
        assert_eq!(choice(0).grade(Some("2")), QuizVerdict::Incorrect);
    }

    #[test]
    fn grades_keyword_by_containment() {
        let quiz = Quiz {
            step: "basic-quiz-1".into(),
            prompt: "Where does the N pole point?".into(),
            image: None,
            kind: QuizKind::Keyword {
                accepted: vec!["east".into()],
            },
            explanation: None,
            explanation_image: None,
            explain: ExplanationPolicy::Never,
            hint: Some("Field lines run from N to S.".into()),
        };
        assert_eq!(quiz.grade(Some("towards the East")), QuizVerdict::Correct);
        assert_eq!(quiz.grade(Some("west")), QuizVerdict::Incorrect);
        assert_eq!(quiz.grade(Some("   ")), QuizVerdict::Unanswered);
    }

    #[test]
    fn validate_rejects_out_of_range_answer() {
        assert!(choice(2).validate().is_ok());
        assert_eq!(
            choice(3).validate(),
            Err(QuizError::CorrectOutOfRange {
                quiz: "basic-quiz-2".into(),
                correct: 3,
                len: 3
            })
        );
    }

    #[test]
    fn explanation_policy() {
        let quiz = choice(1);
        assert!(quiz.shows_explanation(QuizVerdict::Incorrect));
        assert!(!quiz.shows_explanation(QuizVerdict::Correct));
    }

    #[test]
    fn verdict_round_trips_through_text() {
        for v in [QuizVerdict::Correct, QuizVerdict::Incorrect, QuizVerdict::Unanswered] {
            assert_eq!(QuizVerdict::parse(v.as_str()), Some(v));
        }
    }
}
