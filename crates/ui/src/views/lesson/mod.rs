//! The lesson pages and the frame around them.

mod experiment;
mod intro;
mod quiz;
mod report;
mod simulation;
mod talk;
mod theory;
mod widgets;

use dioxus::prelude::*;
use maglab_core::model::{LessonPage, SessionCommand};
use tracing::warn;

use crate::context::use_session;

use experiment::ExperimentPage;
use intro::{GoalsPage, HomePage};
use quiz::QuizPage;
use report::ReportPage;
use simulation::SimulationPage;
use talk::{InquiryPage, WrapUpPage};
use theory::TheoryPage;
use widgets::Figure;

#[component]
pub fn LessonView() -> Element {
    let session = use_session();
    let (page, position, total) = {
        let state = session.read();
        let step = state.current_step();
        let position = state.catalog().position(step.id()).unwrap_or_default();
        (
            LessonPage::from_step_id(step.id()),
            position,
            state.catalog().len(),
        )
    };

    let Some(page) = page else {
        return rsx! {
            div { class: "empty-state", "This step has no page." }
        };
    };

    rsx! {
        article { class: "lesson",
            header { class: "lesson-header",
                if let Some(unit) = page.unit() {
                    span { class: "unit-tag", "{unit.label()}" }
                }
                h2 { "{page.title()}" }
            }
            for page in [page] {
                PageBody { key: "{page.id()}", page }
            }
            PageNav { position, total }
        }
    }
}

#[component]
fn PageBody(page: LessonPage) -> Element {
    rsx! {
        if let Some(image) = page.image() {
            Figure { name: image.to_owned() }
        }
        match page {
            LessonPage::Home => rsx! { HomePage {} },
            LessonPage::GoalsOne | LessonPage::GoalsTwo => rsx! { GoalsPage { page } },
            LessonPage::Simulation => rsx! { SimulationPage {} },
            LessonPage::BasicQuizOne
            | LessonPage::BasicQuizTwo
            | LessonPage::WorkedExample
            | LessonPage::ExamProblem => rsx! { QuizPage { page } },
            LessonPage::ExperimentWire
            | LessonPage::ExperimentLoop
            | LessonPage::ExperimentSolenoid => rsx! { ExperimentPage { page } },
            LessonPage::Report => rsx! { ReportPage {} },
            LessonPage::Theory => rsx! { TheoryPage {} },
            LessonPage::Inquiry => rsx! { InquiryPage {} },
            LessonPage::WrapUp => rsx! { WrapUpPage {} },
        }
    }
}

#[component]
fn PageNav(position: usize, total: usize) -> Element {
    let mut session = use_session();

    let mut go = move |to: usize| {
        let target = session.read().catalog().get(to).map(|step| step.id().clone());
        let Some(step) = target else {
            return;
        };
        if let Err(err) = session.write().apply(SessionCommand::Navigate(step)) {
            warn!(error = %err, "navigation rejected");
        }
    };

    rsx! {
        nav { class: "page-nav",
            button {
                class: "btn",
                r#type: "button",
                disabled: position == 0,
                onclick: move |_| go(position.saturating_sub(1)),
                "Previous"
            }
            span { class: "page-count", "{position + 1} / {total}" }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: position + 1 >= total,
                onclick: move |_| go(position + 1),
                "Next"
            }
        }
    }
}
