use std::time::Duration;

use dioxus::prelude::*;
use tracing::info;

use crate::context::AppContext;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyStatus {
    Idle,
    Saved,
    Cleared,
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let tutor = ctx.tutor();
    let activity = ctx.activity();
    let mut api_key = use_signal(String::new);
    let mut status = use_signal(|| KeyStatus::Idle);
    let mut tutor_enabled = use_signal(|| tutor.enabled());

    let on_save = {
        let tutor = tutor.clone();
        move |_: MouseEvent| {
            let key = api_key.peek().trim().to_string();
            tutor.set_api_key(&key);
            tutor_enabled.set(tutor.enabled());
            api_key.set(String::new());
            status.set(if key.is_empty() { KeyStatus::Cleared } else { KeyStatus::Saved });
            info!(enabled = tutor.enabled(), "tutor key updated from settings");
            spawn(async move {
                tokio::time::sleep(STATUS_CLEAR_AFTER).await;
                status.set(KeyStatus::Idle);
            });
        }
    };

    let tutor_label = if tutor_enabled() { "Connected" } else { "Not configured" };
    let status_label = match status() {
        KeyStatus::Idle => None,
        KeyStatus::Saved => Some("Key saved for this run."),
        KeyStatus::Cleared => Some("Tutor switched off."),
    };
    let log_label = if activity.enabled() {
        format!("{} columns", activity.schema().columns())
    } else {
        "Disabled".to_string()
    };
    let asset_dirs: Vec<String> = ctx
        .assets()
        .dirs()
        .iter()
        .map(|dir| dir.display().to_string())
        .collect();
    let export_dir = ctx.export_dir().display().to_string();

    rsx! {
        div { class: "page settings-page",
            h2 { "Settings" }

            section { class: "settings-section",
                h3 { "AI tutor" }
                p { class: "settings-hint",
                    "The key is kept in memory only and used for later tutor requests."
                }
                p { "Status: {tutor_label}" }
                div { class: "settings-row",
                    input {
                        class: "settings-input",
                        r#type: "password",
                        placeholder: "API key",
                        value: "{api_key}",
                        oninput: move |evt| api_key.set(evt.value()),
                    }
                    button { class: "btn btn-primary", r#type: "button", onclick: on_save, "Save key" }
                }
                if let Some(label) = status_label {
                    p { class: "settings-status", "{label}" }
                }
            }

            section { class: "settings-section",
                h3 { "Activity log" }
                p { "{log_label}" }
            }

            section { class: "settings-section",
                h3 { "Files" }
                p { "Exports are written to {export_dir}" }
                p { "Images are searched in:" }
                ul {
                    for dir in asset_dirs {
                        li { code { "{dir}" } }
                    }
                }
            }
        }
    }
}
