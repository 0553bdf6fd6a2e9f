//! Tutor prompt text and token budgets per page.

use maglab_core::model::LessonPage;

use crate::tutor_service::TutorPrompt;

pub const HOME_SYSTEM: &str = "You are a friendly and knowledgeable physics tutor for \
high-school students. Your name is 'Phi-Bot'.";
pub const HOME_TOKENS: u32 = 450;

pub const OBSERVATION_SYSTEM: &str = "You are a veteran physics teacher.";
pub const OBSERVATION_TOKENS: u32 = 300;

pub const REPORT_SYSTEM: &str = "You are a helpful physics TA.";
pub const REPORT_TOKENS: u32 = 400;

pub const INQUIRY_SYSTEM: &str = "You are a Socratic physics mentor.";
pub const INQUIRY_TOKENS: u32 = 400;

pub const WRAP_UP_SYSTEM: &str = "You are a friendly physics tutor. Summarize key points \
and encourage the student.";
pub const WRAP_UP_TOKENS: u32 = 500;

/// First tutor turn of the wrap-up conversation.
pub const WRAP_UP_GREETING: &str = "Hello! How was today's class?";

/// System prompt and budget for a chat page, `None` for pages without chat.
#[must_use]
pub fn chat_prompt(page: LessonPage, message: &str) -> Option<TutorPrompt> {
    let (system, tokens) = match page {
        LessonPage::Home => (HOME_SYSTEM, HOME_TOKENS),
        LessonPage::Inquiry => (INQUIRY_SYSTEM, INQUIRY_TOKENS),
        LessonPage::WrapUp => (WRAP_UP_SYSTEM, WRAP_UP_TOKENS),
        _ => return None,
    };
    Some(TutorPrompt::new(system, message, tokens))
}

#[must_use]
pub fn observation_prompt(observation: &str) -> TutorPrompt {
    TutorPrompt::new(
        OBSERVATION_SYSTEM,
        format!(
            "Analyse the student's observation record below from a teacher's point of view. \
             Give brief, positive feedback and a **mind map** summary as a Markdown list.\n\n\
             ---\n{observation}"
        ),
        OBSERVATION_TOKENS,
    )
}

#[must_use]
pub fn report_prompt(texts: &[String; 3]) -> TutorPrompt {
    let [first, second, third] = texts;
    TutorPrompt::new(
        REPORT_SYSTEM,
        format!(
            "Here is an experiment report written by a student. Give overall feedback.\n\n\
             Item (1):\n{first}\n\nItem (2):\n{second}\n\nItem (3):\n{third}"
        ),
        REPORT_TOKENS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_budgets_follow_the_page() {
        assert_eq!(chat_prompt(LessonPage::Home, "hi").unwrap().max_tokens, 450);
        assert_eq!(chat_prompt(LessonPage::Inquiry, "hi").unwrap().max_tokens, 400);
        assert_eq!(chat_prompt(LessonPage::WrapUp, "hi").unwrap().max_tokens, 500);
        assert!(chat_prompt(LessonPage::Theory, "hi").is_none());
    }

    #[test]
    fn report_prompt_lists_all_items() {
        let prompt = report_prompt(&["a".into(), "b".into(), "c".into()]);
        assert!(prompt.user.contains("Item (1):\na\n\nItem (2):\nb\n\nItem (3):\nc"));
        assert_eq!(prompt.max_tokens, REPORT_TOKENS);
    }
}
