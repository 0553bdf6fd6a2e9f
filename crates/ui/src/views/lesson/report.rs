use std::sync::Arc;

use dioxus::prelude::*;
use maglab_core::model::{LessonPage, SessionCommand, fields};
use services::{Notice, ReportDocument, ReportExporter, write_report};
use tracing::warn;

use super::widgets::{Markdown, NoticeList, settle};
use crate::context::{AppContext, use_session};

const LABELS: [&str; 3] = [
    "(1) Summarise how the experiments were carried out.",
    "(2) Describe how the current and its magnetic field are related.",
    "(3) Write your ideas and reflections on the experiments.",
];

const REVIEW_PAGES: [LessonPage; 3] = [
    LessonPage::ExperimentWire,
    LessonPage::ExperimentLoop,
    LessonPage::ExperimentSolenoid,
];

#[component]
pub fn ReportPage() -> Element {
    let session = use_session();
    let step = LessonPage::Report.step_id();
    let submitted = session.read().is_submitted(&step);

    rsx! {
        ExperimentReview {}
        if submitted {
            SubmittedReport {}
        } else {
            ReportForm {}
        }
    }
}

#[component]
fn ExperimentReview() -> Element {
    let session = use_session();
    let entries: Vec<(u8, String, String)> = REVIEW_PAGES
        .into_iter()
        .map(|page| {
            let step = page.step_id();
            let state = session.read();
            (
                page.experiment_number().unwrap_or_default(),
                state.answer_or_empty(&step, fields::OBSERVATION).to_owned(),
                state.answer_or_empty(&step, fields::FEEDBACK).to_owned(),
            )
        })
        .collect();

    rsx! {
        details { class: "card review",
            summary { "Review your experiment notes" }
            for (number, observation, feedback) in entries {
                div { class: "review-entry",
                    h4 { "Experiment {number}" }
                    if observation.is_empty() {
                        p { class: "muted", "No observation written." }
                    } else {
                        p { "{observation}" }
                    }
                    if !feedback.is_empty() {
                        Markdown { text: feedback.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn ReportForm() -> Element {
    let ctx = use_context::<AppContext>();
    let mut session = use_session();
    let mut busy = use_signal(|| false);
    let mut notices = use_signal(Vec::<Notice>::new);
    let step = LessonPage::Report.step_id();

    let texts: Vec<String> = {
        let state = session.read();
        fields::REPORT_TEXTS
            .iter()
            .map(|field| state.answer_or_empty(&step, field).to_owned())
            .collect()
    };

    let on_submit = move |_: MouseEvent| {
        if busy() {
            return;
        }
        let lessons = ctx.lessons();
        busy.set(true);
        spawn(async move {
            let snapshot = session.peek().clone();
            let report_step = LessonPage::Report.step_id();
            let texts = fields::REPORT_TEXTS
                .map(|field| snapshot.answer_or_empty(&report_step, field).to_owned());
            let result = lessons.submit_report(&snapshot, texts).await;
            notices.set(settle(&lessons, session, result).await);
            busy.set(false);
        });
    };

    rsx! {
        section { class: "card report",
            div { class: "notice notice-info", "Fill in all three sections, then submit." }
            for (index, (label, text)) in LABELS.iter().zip(texts).enumerate() {
                label { class: "field",
                    span { "{label}" }
                    textarea {
                        rows: "4",
                        value: "{text}",
                        oninput: {
                            let field_step = step.clone();
                            move |evt: FormEvent| {
                                let command = SessionCommand::record(
                                    field_step.clone(),
                                    fields::REPORT_TEXTS[index],
                                    evt.value(),
                                );
                                if let Err(err) = session.write().apply(command) {
                                    warn!(error = %err, "report draft not recorded");
                                }
                            }
                        },
                    }
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: busy(),
                onclick: on_submit,
                if busy() { "Submitting..." } else { "Submit report" }
            }
            NoticeList { notices: notices() }
        }
    }
}

#[component]
fn SubmittedReport() -> Element {
    let ctx = use_context::<AppContext>();
    let mut session = use_session();
    let mut notices = use_signal(Vec::<Notice>::new);
    let step = LessonPage::Report.step_id();

    let (texts, feedback) = {
        let state = session.read();
        (
            fields::REPORT_TEXTS.map(|field| state.answer_or_empty(&step, field).to_owned()),
            state.answer_or_empty(&step, fields::FEEDBACK).to_owned(),
        )
    };
    let exporters: Vec<Arc<dyn ReportExporter>> = ctx.exporters().to_vec();

    let unlock_step = step.clone();
    let on_unlock = move |_: MouseEvent| {
        if let Err(err) = session.write().apply(SessionCommand::Unlock(unlock_step.clone())) {
            warn!(error = %err, "report unlock rejected");
        }
    };

    rsx! {
        section { class: "card report submitted",
            div { class: "notice notice-success", "Report submitted. It is now read-only." }
            for (label, text) in LABELS.iter().zip(texts) {
                div { class: "field",
                    span { "{label}" }
                    p { class: "locked-text", "{text}" }
                }
            }
            if !feedback.is_empty() {
                div { class: "feedback",
                    h4 { "Tutor feedback" }
                    Markdown { text: feedback.clone() }
                }
            }
            div { class: "export-buttons",
                for exporter in exporters {
                    ExportButton { exporter: ExporterHandle(exporter), notices }
                }
                button { class: "btn", r#type: "button", onclick: on_unlock, "Edit again" }
            }
            NoticeList { notices: notices() }
        }
    }
}

/// Props wrapper comparing exporters by identity.
#[derive(Clone)]
struct ExporterHandle(Arc<dyn ReportExporter>);

impl PartialEq for ExporterHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[component]
fn ExportButton(exporter: ExporterHandle, notices: Signal<Vec<Notice>>) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let exporter = exporter.0;
    let format = exporter.format();
    let enabled = exporter.enabled();
    let hint = if enabled { "" } else { "Not available in this build" };

    let on_export = move |_: MouseEvent| {
        let mut notices = notices;
        let written = ReportDocument::from_session(&session.read())
            .and_then(|doc| write_report(exporter.as_ref(), &doc, &ctx.export_dir()));
        match written {
            Ok(path) => notices.set(vec![Notice::success(format!(
                "Saved to {}",
                path.display()
            ))]),
            Err(err) => {
                warn!(error = %err, format, "report export failed");
                notices.set(vec![Notice::warning(err.to_string())]);
            }
        }
    };

    rsx! {
        button {
            class: "btn",
            r#type: "button",
            disabled: !enabled,
            title: "{hint}",
            onclick: on_export,
            "Download .{format}"
        }
    }
}
