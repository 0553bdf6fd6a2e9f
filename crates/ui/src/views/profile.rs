use dioxus::prelude::*;
use maglab_core::model::{LearnerProfile, ProfileError};
use tracing::info;

use crate::context::use_session;

#[derive(Clone, Debug, PartialEq, Eq)]
enum ProfileStatus {
    Idle,
    Registered,
    Updated,
    Invalid(ProfileError),
}

impl ProfileStatus {
    fn label(&self) -> Option<String> {
        match self {
            Self::Idle => None,
            Self::Registered => Some("Registered.".into()),
            Self::Updated => Some("Details updated.".into()),
            Self::Invalid(err) => Some(format!("Check your details: {err}.")),
        }
    }
}

/// Student id / name / class form plus the roster of this session.
#[component]
pub fn ProfilePanel() -> Element {
    let mut session = use_session();
    let initial = session.peek().profile().cloned().unwrap_or_default();
    let mut student_id = use_signal(|| initial.student_id.clone());
    let mut name = use_signal(|| initial.name.clone());
    let mut class_group = use_signal(|| initial.class_group.clone());
    let mut status = use_signal(|| ProfileStatus::Idle);

    let roster: Vec<String> = session
        .read()
        .roster()
        .entries()
        .iter()
        .map(|entry| entry.tag())
        .collect();

    let on_register = move |_: MouseEvent| {
        let profile = LearnerProfile::new(student_id(), name(), class_group());
        let next = match session.write().register_profile(profile) {
            Ok(true) => {
                info!("learner registered");
                ProfileStatus::Registered
            }
            Ok(false) => ProfileStatus::Updated,
            Err(err) => ProfileStatus::Invalid(err),
        };
        status.set(next);
    };

    rsx! {
        section { class: "profile-panel",
            h3 { "Student" }
            label { "Student ID"
                input {
                    value: "{student_id}",
                    oninput: move |evt| student_id.set(evt.value()),
                }
            }
            label { "Name"
                input {
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
            }
            label { "Class"
                input {
                    value: "{class_group}",
                    oninput: move |evt| class_group.set(evt.value()),
                }
            }
            button { class: "btn", r#type: "button", onclick: on_register, "Save" }
            if let Some(label) = status.read().label() {
                p { class: "profile-status", "{label}" }
            }
            if !roster.is_empty() {
                details { class: "roster",
                    summary { "Roster ({roster.len()})" }
                    ul {
                        for tag in roster {
                            li { "{tag}" }
                        }
                    }
                }
            }
        }
    }
}
