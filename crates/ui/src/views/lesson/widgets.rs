use dioxus::prelude::*;
use maglab_core::model::{ChatRole, ChatTurn, LessonPage, SessionState};
use services::{LessonOutcome, LessonService, LessonServiceError, Notice, NoticeLevel};
use tracing::warn;

use crate::context::{AppContext, use_session};
use crate::vm::{CurveVm, QuiverVm, markdown_to_html};

/// Apply a lesson outcome to the session, then log its rows.
pub async fn settle(
    lessons: &LessonService,
    mut session: Signal<SessionState>,
    result: Result<LessonOutcome, LessonServiceError>,
) -> Vec<Notice> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => return vec![Notice::warning(err.to_string())],
    };
    let applied = outcome.apply(&mut session.write());
    match applied {
        Ok(pending) => lessons.log(pending).await,
        Err(err) => {
            warn!(error = %err, "lesson outcome rejected");
            vec![Notice::warning(err.to_string())]
        }
    }
}

#[component]
pub fn Markdown(text: String) -> Element {
    let html = markdown_to_html(&text);
    rsx! {
        div { class: "markdown", dangerous_inner_html: "{html}" }
    }
}

fn notice_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "notice notice-info",
        NoticeLevel::Success => "notice notice-success",
        NoticeLevel::Warning => "notice notice-warning",
    }
}

#[component]
pub fn NoticeList(notices: Vec<Notice>) -> Element {
    rsx! {
        for notice in notices {
            div {
                class: notice_class(notice.level),
                "{notice.text}"
            }
        }
    }
}

/// A lesson image looked up by file name; a missing file shows a placeholder.
#[component]
pub fn Figure(name: String, caption: Option<String>) -> Element {
    let ctx = use_context::<AppContext>();
    let located = ctx.assets().locate(&name);

    rsx! {
        figure { class: "figure",
            match located {
                Ok(path) => rsx! {
                    img { src: "{path.display()}", alt: "{name}" }
                },
                Err(_) => rsx! {
                    div { class: "figure-missing", "Image not available: {name}" }
                },
            }
            if let Some(caption) = caption {
                figcaption { "{caption}" }
            }
        }
    }
}

#[component]
pub fn Slider(label: String, min: f64, max: f64, step: f64, value: Signal<f64>) -> Element {
    let mut value = value;
    let shown = format!("{:.1}", value());
    rsx! {
        label { class: "slider",
            span { class: "slider-label", "{label}" }
            input {
                r#type: "range",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                oninput: move |evt| {
                    if let Ok(parsed) = evt.value().parse::<f64>() {
                        value.set(parsed.clamp(min, max));
                    }
                },
            }
            span { class: "slider-value", "{shown}" }
        }
    }
}

#[component]
pub fn QuiverPlot(vm: QuiverVm) -> Element {
    rsx! {
        svg { class: "field-plot", view_box: "{vm.view_box}",
            for arrow in vm.arrows.iter() {
                g {
                    line {
                        x1: "{arrow.x1:.1}",
                        y1: "{arrow.y1:.1}",
                        x2: "{arrow.x2:.1}",
                        y2: "{arrow.y2:.1}",
                        stroke: "{arrow.color()}",
                        stroke_width: "1.5",
                    }
                    polygon { points: "{arrow.head_points()}", fill: "{arrow.color()}" }
                }
            }
            for pole in vm.poles.iter() {
                g {
                    circle { class: "{pole.class()}", cx: "{pole.cx:.1}", cy: "{pole.cy:.1}", r: "9" }
                    text {
                        x: "{pole.cx:.1}",
                        y: "{pole.cy:.1}",
                        text_anchor: "middle",
                        dominant_baseline: "central",
                        class: "pole-label",
                        "{pole.label()}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn CurvePlot(vm: CurveVm, caption: String) -> Element {
    rsx! {
        figure { class: "curve",
            svg { class: "curve-plot", view_box: "{vm.view_box}",
                polyline { points: "{vm.points}", fill: "none", stroke: "currentColor", stroke_width: "2" }
                if let Some((x, y)) = vm.marker {
                    circle { cx: "{x:.1}", cy: "{y:.1}", r: "4", class: "curve-marker" }
                }
            }
            figcaption { "{caption}" }
        }
    }
}

fn speaker(role: ChatRole) -> (&'static str, &'static str) {
    match role {
        ChatRole::Student => ("chat-turn chat-student", "You"),
        ChatRole::Tutor => ("chat-turn chat-tutor", "Tutor"),
    }
}

/// Conversation with the tutor on a chat page.
#[component]
pub fn ChatPanel(page: LessonPage, placeholder: String) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let mut draft = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut notices = use_signal(Vec::<Notice>::new);

    let turns: Vec<ChatTurn> = if page == LessonPage::WrapUp {
        LessonService::wrap_up_turns(&session.read())
    } else {
        session.read().transcript(&page.step_id()).to_vec()
    };

    let on_send = move |_: MouseEvent| {
        let message = draft.peek().clone();
        if busy() {
            return;
        }
        let lessons = ctx.lessons();
        busy.set(true);
        spawn(async move {
            let snapshot = session.peek().clone();
            let result = lessons.send_chat(&snapshot, page, &message).await;
            let sent = result.is_ok();
            notices.set(settle(&lessons, session, result).await);
            if sent {
                draft.set(String::new());
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "chat",
            div { class: "chat-log",
                for turn in turns {
                    {
                        let (class, who) = speaker(turn.role);
                        rsx! {
                            div { class: "{class}",
                                span { class: "chat-speaker", "{who}" }
                                Markdown { text: turn.text.clone() }
                            }
                        }
                    }
                }
            }
            NoticeList { notices: notices() }
            div { class: "chat-input",
                textarea {
                    rows: "3",
                    placeholder: "{placeholder}",
                    value: "{draft}",
                    disabled: busy(),
                    oninput: move |evt| draft.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: on_send,
                    if busy() { "Waiting for the tutor..." } else { "Send" }
                }
            }
        }
    }
}
