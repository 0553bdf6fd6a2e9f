use std::sync::Arc;

use maglab_core::Clock;
use maglab_core::model::{
    ChatRole, ChatTurn, LessonPage, Quiz, QuizVerdict, SessionCommand, SessionError,
    SessionState, StepId, fields,
};
use maglab_core::time::short_stamp;
use tracing::{debug, info};

use crate::activity_log_service::ActivityLogService;
use crate::error::LessonServiceError;
use crate::prompts::{self, WRAP_UP_GREETING};
use crate::quiz_bank::QuizBank;
use crate::tutor_service::{TutorReply, TutorService};

const WRAP_UP_LOG_CHARS: usize = 500;

/// Severity of an inline message shown next to the page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}

/// A row waiting to be appended once the session change has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRow {
    pub source: StepId,
    pub fields: Vec<String>,
    /// Shown when the append succeeds; failures always produce a warning.
    pub saved: Option<String>,
}

/// Result of a lesson action: session commands to apply, then rows to log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct LessonOutcome {
    pub commands: Vec<SessionCommand>,
    pub rows: Vec<PendingRow>,
    pub notices: Vec<Notice>,
}

impl LessonOutcome {
    fn notice(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
            ..Self::default()
        }
    }

    /// Apply the commands to `state`, handing back what is left to log.
    ///
    /// # Errors
    ///
    /// Returns the first command error; earlier commands stay applied.
    pub fn apply(self, state: &mut SessionState) -> Result<PendingLog, LessonServiceError> {
        for command in self.commands {
            debug!(command = command.name(), "applying session command");
            state.apply(command)?;
        }
        Ok(PendingLog {
            rows: self.rows,
            notices: self.notices,
        })
    }
}

/// Rows and notices left after an outcome's commands were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct PendingLog {
    rows: Vec<PendingRow>,
    notices: Vec<Notice>,
}

/// Orchestrates the tutor, quiz bank and activity log around a session.
///
/// Collaborator failures become notices; only session validation errors are
/// returned as errors.
#[derive(Clone)]
pub struct LessonService {
    clock: Clock,
    tutor: Arc<TutorService>,
    activity: Arc<ActivityLogService>,
    quizzes: Arc<QuizBank>,
}

impl LessonService {
    #[must_use]
    pub fn new(
        clock: Clock,
        tutor: Arc<TutorService>,
        activity: Arc<ActivityLogService>,
        quizzes: Arc<QuizBank>,
    ) -> Self {
        Self {
            clock,
            tutor,
            activity,
            quizzes,
        }
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    #[must_use]
    pub fn activity(&self) -> Arc<ActivityLogService> {
        Arc::clone(&self.activity)
    }

    #[must_use]
    pub fn quiz(&self, page: LessonPage) -> Option<&Quiz> {
        self.quizzes.get(&page.step_id())
    }

    // ─── Quizzes ───────────────────────────────────────────────────────────

    /// Grade `response`, storing it and the verdict on the quiz step.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::NoQuiz` if the page has no quiz, or the
    /// session error raised while recording.
    pub fn check_quiz(
        &self,
        state: &mut SessionState,
        page: LessonPage,
        response: Option<&str>,
    ) -> Result<QuizVerdict, LessonServiceError> {
        let step = page.step_id();
        let quiz = self
            .quizzes
            .get(&step)
            .ok_or_else(|| LessonServiceError::NoQuiz(step.to_string()))?;
        let verdict = quiz.grade(response);
        state.apply_all([
            SessionCommand::RecordAnswer {
                step: step.clone(),
                field: fields::RESPONSE.to_owned(),
                value: response.unwrap_or_default().to_owned(),
            },
            SessionCommand::RecordAnswer {
                step: step.clone(),
                field: fields::VERDICT.to_owned(),
                value: verdict.as_str().to_owned(),
            },
        ])?;
        debug!(step = %step, verdict = verdict.as_str(), "quiz checked");
        Ok(verdict)
    }

    // ─── Experiments ───────────────────────────────────────────────────────

    /// Ask the tutor about the stored observation of an experiment page.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StepLocked` if the page was submitted.
    pub async fn observation_feedback(
        &self,
        state: &SessionState,
        page: LessonPage,
    ) -> Result<LessonOutcome, LessonServiceError> {
        let step = page.step_id();
        ensure_open(state, &step)?;
        let observation = state.answer_or_empty(&step, fields::OBSERVATION).trim();
        if observation.is_empty() {
            return Ok(LessonOutcome::notice(Notice::warning(
                "Write your observation first.",
            )));
        }

        let reply = self.tutor.complete(&prompts::observation_prompt(observation)).await;
        let mut outcome = LessonOutcome {
            commands: vec![SessionCommand::record(
                step,
                fields::FEEDBACK,
                reply.text(),
            )],
            ..LessonOutcome::default()
        };
        push_unavailable(&mut outcome, &reply);
        Ok(outcome)
    }

    // ─── Report ────────────────────────────────────────────────────────────

    /// Submit the final report: tutor feedback, answers, lock, activity row.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::IncompleteReport` when a section is blank
    /// and `SessionError::StepLocked` when the report was already submitted.
    pub async fn submit_report(
        &self,
        state: &SessionState,
        texts: [String; 3],
    ) -> Result<LessonOutcome, LessonServiceError> {
        let step = LessonPage::Report.step_id();
        ensure_open(state, &step)?;
        if texts.iter().any(|text| text.trim().is_empty()) {
            return Err(LessonServiceError::IncompleteReport);
        }

        let reply = self.tutor.complete(&prompts::report_prompt(&texts)).await;
        let feedback = reply.text().to_owned();

        let mut commands: Vec<SessionCommand> = fields::REPORT_TEXTS
            .iter()
            .zip(&texts)
            .map(|(field, text)| SessionCommand::record(step.clone(), field, text.clone()))
            .collect();
        commands.push(SessionCommand::record(
            step.clone(),
            fields::FEEDBACK,
            feedback.clone(),
        ));
        commands.push(SessionCommand::SubmitFinal(step.clone()));

        let [first, second, third] = texts;
        let mut row = identity_fields(state);
        row.push(format!("report submitted ({})", short_stamp(self.clock.now())));
        row.extend([first, second, third, feedback]);

        let mut outcome = LessonOutcome {
            commands,
            rows: vec![PendingRow {
                source: step,
                fields: row,
                saved: None,
            }],
            notices: vec![Notice::success("Your report was submitted.")],
        };
        push_unavailable(&mut outcome, &reply);
        info!("report submitted");
        Ok(outcome)
    }

    // ─── Chat ──────────────────────────────────────────────────────────────

    /// Send a student message on a chat page and collect the tutor's reply.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::EmptyMessage` for blank input and
    /// `SessionError::UnknownStep` for pages without a conversation.
    pub async fn send_chat(
        &self,
        state: &SessionState,
        page: LessonPage,
        message: &str,
    ) -> Result<LessonOutcome, LessonServiceError> {
        let step = page.step_id();
        let message = message.trim();
        if message.is_empty() {
            return Err(LessonServiceError::EmptyMessage);
        }
        let Some(prompt) = prompts::chat_prompt(page, message) else {
            return Err(SessionError::UnknownStep(step).into());
        };

        let mut commands = Vec::new();
        if page == LessonPage::WrapUp && state.transcript(&step).is_empty() {
            commands.push(append(&step, ChatTurn::tutor(WRAP_UP_GREETING)));
        }
        commands.push(append(&step, ChatTurn::student(message)));

        let reply = self.tutor.complete(&prompt).await;
        commands.push(append(&step, ChatTurn::tutor(reply.text())));

        let mut outcome = LessonOutcome {
            commands,
            ..LessonOutcome::default()
        };
        if page == LessonPage::WrapUp {
            let mut row = identity_fields(state);
            row.push(check_tag(state));
            row.extend([String::new(), String::new(), String::new()]);
            let excerpt: String = message.chars().take(WRAP_UP_LOG_CHARS).collect();
            row.push(format!("feedback: {excerpt}"));
            outcome.rows.push(PendingRow {
                source: step,
                fields: row,
                saved: None,
            });
        }
        push_unavailable(&mut outcome, &reply);
        Ok(outcome)
    }

    /// The wrap-up conversation including its opening greeting.
    #[must_use]
    pub fn wrap_up_turns(state: &SessionState) -> Vec<ChatTurn> {
        let turns = state.transcript(&LessonPage::WrapUp.step_id());
        if turns.is_empty() {
            vec![ChatTurn::tutor(WRAP_UP_GREETING)]
        } else {
            turns.to_vec()
        }
    }

    // ─── Inquiry ───────────────────────────────────────────────────────────

    /// Log the inquiry discussion as one row with the transcript in the last column.
    pub fn save_inquiry(&self, state: &SessionState) -> LessonOutcome {
        let step = LessonPage::Inquiry.step_id();
        let turns = state.transcript(&step);
        if turns.is_empty() {
            return LessonOutcome::notice(Notice::warning(
                "There is nothing to save yet. Discuss with the tutor first.",
            ));
        }

        let mut row = identity_fields(state);
        row.push(format!("inquiry ({})", short_stamp(self.clock.now())));
        row.extend(std::iter::repeat_n(String::new(), 4));
        row.push(join_transcript(turns));

        LessonOutcome {
            rows: vec![PendingRow {
                source: step,
                fields: row,
                saved: Some("Your inquiry discussion was saved.".into()),
            }],
            ..LessonOutcome::default()
        }
    }

    // ─── Logging ───────────────────────────────────────────────────────────

    /// Append pending rows; returns the outcome's notices plus any log results.
    pub async fn log(&self, pending: PendingLog) -> Vec<Notice> {
        let PendingLog { rows, mut notices } = pending;
        for row in rows {
            if self.activity.append_row(&row.source, row.fields).await {
                if let Some(saved) = row.saved {
                    notices.push(Notice::success(saved));
                }
            } else {
                notices.push(Notice::warning(
                    "The activity log is unavailable; this entry was not saved.",
                ));
            }
        }
        notices
    }

    /// Apply `outcome` to `state` and log its rows.
    ///
    /// # Errors
    ///
    /// Returns the first command error; nothing is logged in that case.
    pub async fn commit(
        &self,
        state: &mut SessionState,
        outcome: LessonOutcome,
    ) -> Result<Vec<Notice>, LessonServiceError> {
        let pending = outcome.apply(state)?;
        Ok(self.log(pending).await)
    }
}

/// `[student]` / `[tutor]` blocks separated by horizontal rules.
#[must_use]
pub fn join_transcript(turns: &[ChatTurn]) -> String {
    turns
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                ChatRole::Student => "student",
                ChatRole::Tutor => "tutor",
            };
            format!("[{speaker}]\n{}", turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

fn identity_fields(state: &SessionState) -> Vec<String> {
    let profile = state.profile().cloned().unwrap_or_default();
    vec![profile.student_id, profile.name, profile.class_group]
}

fn check_tag(state: &SessionState) -> String {
    let Some(profile) = state.profile() else {
        return String::new();
    };
    let id = profile.learner_id();
    state
        .roster()
        .entries()
        .iter()
        .find(|entry| entry.learner_id == id)
        .map(|entry| entry.tag())
        .unwrap_or_default()
}

fn append(step: &StepId, turn: ChatTurn) -> SessionCommand {
    SessionCommand::AppendChat {
        step: step.clone(),
        turn,
    }
}

fn ensure_open(state: &SessionState, step: &StepId) -> Result<(), SessionError> {
    if state.is_submitted(step) {
        Err(SessionError::StepLocked(step.clone()))
    } else {
        Ok(())
    }
}

fn push_unavailable(outcome: &mut LessonOutcome, reply: &TutorReply) {
    if !reply.is_answer() {
        outcome.notices.push(Notice::warning(
            "The tutor is unavailable. Enter an API key in Settings to enable feedback.",
        ));
    }
}
