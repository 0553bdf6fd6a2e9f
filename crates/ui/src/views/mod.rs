mod history;
mod lesson;
mod profile;
mod settings;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use history::HistoryView;
pub use lesson::LessonView;
pub use profile::ProfilePanel;
pub use settings::SettingsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
