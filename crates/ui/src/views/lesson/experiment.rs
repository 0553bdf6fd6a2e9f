use dioxus::prelude::*;
use maglab_core::model::{LessonPage, SessionCommand, fields};
use services::Notice;
use tracing::warn;

use super::widgets::{Markdown, NoticeList, settle};
use crate::context::{AppContext, use_session};

fn instructions(page: LessonPage) -> &'static str {
    match page {
        LessonPage::ExperimentWire => {
            "When the switch closes, observe the compass needle. Move the compass \
             closer to and further from the straight wire and watch how far it turns."
        }
        LessonPage::ExperimentLoop => "Observe the N pole of the compass at the center of the loop.",
        _ => "Observe the compass near the solenoid and inside it.",
    }
}

#[component]
pub fn ExperimentPage(page: LessonPage) -> Element {
    let ctx = use_context::<AppContext>();
    let mut session = use_session();
    let mut busy = use_signal(|| false);
    let mut notices = use_signal(Vec::<Notice>::new);
    let step = page.step_id();

    let (observation, feedback) = {
        let state = session.read();
        (
            state.answer_or_empty(&step, fields::OBSERVATION).to_owned(),
            state.answer_or_empty(&step, fields::FEEDBACK).to_owned(),
        )
    };
    let number = page.experiment_number().unwrap_or_default();

    let record_step = step.clone();
    let on_input = move |evt: FormEvent| {
        let command = SessionCommand::record(record_step.clone(), fields::OBSERVATION, evt.value());
        if let Err(err) = session.write().apply(command) {
            warn!(error = %err, "observation not recorded");
        }
    };

    let on_feedback = move |_: MouseEvent| {
        if busy() {
            return;
        }
        let lessons = ctx.lessons();
        busy.set(true);
        spawn(async move {
            let snapshot = session.peek().clone();
            let result = lessons.observation_feedback(&snapshot, page).await;
            notices.set(settle(&lessons, session, result).await);
            busy.set(false);
        });
    };

    rsx! {
        section { class: "card experiment",
            h3 { "Experiment {number}" }
            p { "{instructions(page)}" }
            label { class: "field",
                span { "Looking at the figure, describe how the compass N pole moves when current flows." }
                textarea {
                    rows: "5",
                    value: "{observation}",
                    oninput: on_input,
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: busy(),
                onclick: on_feedback,
                if busy() { "Asking the tutor..." } else { "Get feedback" }
            }
            NoticeList { notices: notices() }
            if !feedback.is_empty() {
                div { class: "feedback",
                    h4 { "Tutor feedback" }
                    Markdown { text: feedback.clone() }
                }
            }
        }
    }
}
