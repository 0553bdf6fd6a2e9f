use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use maglab_core::model::{SessionCommand, StepId};
use tracing::warn;

use crate::context::use_session;
use crate::views::{HistoryView, LessonView, ProfilePanel, SettingsView};
use crate::vm::{StepLinkVm, sidebar_vm};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LessonView)] Lesson {},
        #[route("/history", HistoryView)] History {},
        #[route("/settings", SettingsView)] Settings {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let session = use_session();
    let vm = sidebar_vm(&session.read());

    rsx! {
        nav { class: "sidebar",
            h1 { "Magnetism Lab" }
            ul { class: "sidebar-links",
                li { Link { to: Route::Lesson {}, "Lesson" } }
                li { Link { to: Route::History {}, "Activity" } }
                li { Link { to: Route::Settings {}, "Settings" } }
            }

            ProfilePanel {}

            ul { class: "step-list",
                for link in vm.intro {
                    StepButton { key: "{link.step}", link }
                }
            }
            for section in vm.units {
                section { class: "unit-section",
                    div { class: "unit-heading",
                        span { "{section.progress.label}" }
                        span { class: "unit-percent", "{section.progress.percent}%" }
                    }
                    div { class: "progress",
                        div {
                            class: "progress-bar",
                            style: "width: {section.progress.percent}%",
                        }
                    }
                    ul { class: "step-list",
                        for link in section.steps {
                            StepButton { key: "{link.step}", link }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StepButton(link: StepLinkVm) -> Element {
    let mut session = use_session();
    let navigator = use_navigator();
    let class = if link.current { "step-button current" } else { "step-button" };
    let step: StepId = link.step.clone();

    rsx! {
        li {
            button {
                class: "{class}",
                r#type: "button",
                onclick: move |_| {
                    if let Err(err) = session.write().apply(SessionCommand::Navigate(step.clone())) {
                        warn!(error = %err, "navigation rejected");
                    }
                    navigator.push(Route::Lesson {});
                },
                span { class: "step-marker", "{link.marker()}" }
                span { "{link.title}" }
            }
        }
    }
}
