use dioxus::prelude::*;
use maglab_core::model::{LessonPage, QuizKind, QuizVerdict, fields};
use tracing::warn;

use super::widgets::{Figure, Markdown};
use crate::context::{AppContext, use_session};

#[component]
pub fn QuizPage(page: LessonPage) -> Element {
    let ctx = use_context::<AppContext>();
    let mut session = use_session();
    let step = page.step_id();
    let lessons = ctx.lessons();
    let quiz = lessons.quiz(page).cloned();

    let stored = session.read().answer_or_empty(&step, fields::RESPONSE).to_owned();
    let mut response = use_signal(|| stored);
    let mut error = use_signal(|| None::<String>);

    let Some(quiz) = quiz else {
        return rsx! {
            div { class: "empty-state", "No question is configured for this step." }
        };
    };

    let verdict = session
        .read()
        .answer(&step, fields::VERDICT)
        .and_then(QuizVerdict::parse);

    let on_check = move |_: MouseEvent| {
        let answer = response.peek().clone();
        let result = lessons.check_quiz(&mut session.write(), page, Some(&answer));
        match result {
            Ok(_) => error.set(None),
            Err(err) => {
                warn!(error = %err, "quiz check failed");
                error.set(Some(err.to_string()));
            }
        }
    };

    rsx! {
        section { class: "card quiz",
            Markdown { text: quiz.prompt.clone() }
            if let Some(image) = quiz.image.clone() {
                Figure { name: image }
            }
            match quiz.kind.clone() {
                QuizKind::Choice { options, .. } => rsx! {
                    div { class: "choices",
                        for (index, option) in options.into_iter().enumerate() {
                            label { class: "choice",
                                input {
                                    r#type: "radio",
                                    name: "{page.id()}",
                                    checked: response() == index.to_string(),
                                    onchange: move |_| response.set(index.to_string()),
                                }
                                span { "{option}" }
                            }
                        }
                    }
                },
                QuizKind::Keyword { .. } => rsx! {
                    input {
                        class: "answer-input",
                        r#type: "text",
                        placeholder: "Type your answer",
                        value: "{response}",
                        oninput: move |evt| response.set(evt.value()),
                    }
                },
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: on_check,
                "Check answer"
            }
            if let Some(message) = error() {
                div { class: "notice notice-warning", "{message}" }
            }
            match verdict {
                Some(QuizVerdict::Correct) => rsx! {
                    div { class: "notice notice-success", "Correct!" }
                },
                Some(QuizVerdict::Incorrect) => rsx! {
                    div { class: "notice notice-warning", "Not quite. Try again." }
                    if let Some(hint) = quiz.hint.clone() {
                        div { class: "notice notice-info", "Hint: {hint}" }
                    }
                },
                Some(QuizVerdict::Unanswered) => rsx! {
                    div { class: "notice notice-info", "Choose or type an answer first." }
                },
                None => rsx! {},
            }
            if let Some(verdict) = verdict {
                if quiz.shows_explanation(verdict) {
                    div { class: "explanation",
                        if let Some(text) = quiz.explanation.clone() {
                            Markdown { text }
                        }
                        if let Some(image) = quiz.explanation_image.clone() {
                            Figure { name: image }
                        }
                    }
                }
            }
        }
    }
}
