use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::ids::StepId;
use crate::model::learner::LearnerProfile;
use crate::model::session::{ChatTurn, SessionState};

/// A single mutation of [`SessionState`].
///
/// The presentation layer never pokes at session fields directly; it builds a
/// command and applies it, so every write goes through the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum SessionCommand {
    Navigate(StepId),
    RecordAnswer {
        step: StepId,
        field: String,
        value: String,
    },
    SubmitFinal(StepId),
    /// Reopen a submitted step for editing.
    Unlock(StepId),
    AppendChat {
        step: StepId,
        turn: ChatTurn,
    },
    Register(LearnerProfile),
    UpdateProfile(LearnerProfile),
}

impl SessionCommand {
    #[must_use]
    pub fn record(step: impl Into<StepId>, field: &str, value: impl Into<String>) -> Self {
        Self::RecordAnswer {
            step: step.into(),
            field: field.to_owned(),
            value: value.into(),
        }
    }

    /// Short name used in log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate(_) => "navigate",
            Self::RecordAnswer { .. } => "record_answer",
            Self::SubmitFinal(_) => "submit_final",
            Self::Unlock(_) => "unlock",
            Self::AppendChat { .. } => "append_chat",
            Self::Register(_) => "register",
            Self::UpdateProfile(_) => "update_profile",
        }
    }
}

impl SessionState {
    /// Apply one command. A failing command changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the session or profile error raised by the underlying operation.
    pub fn apply(&mut self, command: SessionCommand) -> Result<(), Error> {
        match command {
            SessionCommand::Navigate(step) => self.navigate(&step)?,
            SessionCommand::RecordAnswer { step, field, value } => {
                self.record_answer(&step, &field, value)?;
            }
            SessionCommand::SubmitFinal(step) => self.submit_final(&step)?,
            SessionCommand::Unlock(step) => {
                self.reopen(&step)?;
            }
            SessionCommand::AppendChat { step, turn } => self.append_chat(&step, turn)?,
            SessionCommand::Register(profile) => {
                self.register_profile(profile)?;
            }
            SessionCommand::UpdateProfile(profile) => self.update_profile(profile)?,
        }
        Ok(())
    }

    /// Apply commands in order, stopping at the first failure.
    ///
    /// Commands before the failing one stay applied.
    ///
    /// # Errors
    ///
    /// Returns the first error raised.
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = SessionCommand>,
    ) -> Result<(), Error> {
        for command in commands {
            self.apply(command)?;
        }
        Ok(())
    }
}
