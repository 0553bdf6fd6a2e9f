use dioxus::prelude::*;
use services::ActivityLogError;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ActivityRowVm, map_activity_rows};

const RECENT_ROWS: u32 = 50;

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    rows: Vec<ActivityRowVm>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let activity = ctx.activity();

    let resource = use_resource(move || {
        let activity = activity.clone();
        async move {
            let records = activity.recent(RECENT_ROWS).await.map_err(|err| match err {
                ActivityLogError::Disabled => ViewError::Disabled,
                _ => ViewError::Unknown,
            })?;
            Ok::<_, ViewError>(HistoryData {
                rows: map_activity_rows(&records),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Activity" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.rows.is_empty() {
                        p { "No activity recorded yet." }
                    } else {
                        table { class: "activity-table",
                            thead {
                                tr {
                                    th { "When" }
                                    th { "Student" }
                                    th { "Activity" }
                                    th { "Content" }
                                }
                            }
                            tbody {
                                for row in data.rows {
                                    ActivityRow { key: "{row.id}", row }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn ActivityRow(row: ActivityRowVm) -> Element {
    rsx! {
        tr {
            td { class: "activity-date", "{row.logged_at_str}" }
            td { "{row.student}" }
            td { "{row.activity}" }
            td { class: "activity-preview", "{row.preview}" }
        }
    }
}
