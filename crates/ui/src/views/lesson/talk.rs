use dioxus::prelude::*;
use maglab_core::model::LessonPage;
use services::{LessonService, Notice, write_transcript};
use tracing::warn;

use super::widgets::{ChatPanel, Figure, Markdown, NoticeList, settle};
use crate::context::{AppContext, use_session};

const INQUIRY_TEXT: &str = "\
### Everyday electromagnetism

Speakers, scrap-yard cranes and electric motors all rely on the magnetic field \
of a current. Pick one and discuss with the tutor how it works: where is the \
current, what field does it make, and what does that field push on?";

#[component]
pub fn InquiryPage() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let mut notices = use_signal(Vec::<Notice>::new);

    let on_save = move |_: MouseEvent| {
        let lessons = ctx.lessons();
        let outcome = lessons.save_inquiry(&session.read());
        spawn(async move {
            notices.set(settle(&lessons, session, Ok(outcome)).await);
        });
    };

    rsx! {
        Markdown { text: INQUIRY_TEXT.to_owned() }
        div { class: "figure-row",
            Figure { name: "speaker.webp".to_owned(), caption: "Speaker".to_owned() }
            Figure { name: "crane.jpg".to_owned(), caption: "Electromagnetic crane".to_owned() }
            Figure { name: "motor_structure.png".to_owned(), caption: "Motor".to_owned() }
        }
        section { class: "card",
            h3 { "Discuss with the tutor" }
            ChatPanel {
                page: LessonPage::Inquiry,
                placeholder: "Explain how one of these devices works".to_owned(),
            }
        }
        section { class: "card",
            h3 { "Save your discussion" }
            p { class: "muted", "Saving records the whole conversation in the activity log." }
            button { class: "btn btn-primary", r#type: "button", onclick: on_save, "Save discussion" }
            NoticeList { notices: notices() }
        }
    }
}

#[component]
pub fn WrapUpPage() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let mut notices = use_signal(Vec::<Notice>::new);

    let on_export = move |_: MouseEvent| {
        let turns = LessonService::wrap_up_turns(&session.read());
        let now = ctx.clock().now();
        match write_transcript(&turns, now, &ctx.export_dir()) {
            Ok(path) => notices.set(vec![Notice::success(format!("Saved to {}", path.display()))]),
            Err(err) => {
                warn!(error = %err, "transcript export failed");
                notices.set(vec![Notice::warning(err.to_string())]);
            }
        }
    };

    rsx! {
        p { "Write the most important or hardest point of today's lesson." }
        section { class: "card",
            ChatPanel {
                page: LessonPage::WrapUp,
                placeholder: "What stood out for you today?".to_owned(),
            }
        }
        div { class: "export-buttons",
            button { class: "btn", r#type: "button", onclick: on_export, "Save conversation" }
        }
        NoticeList { notices: notices() }
    }
}
