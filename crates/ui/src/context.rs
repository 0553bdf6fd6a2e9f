use std::path::PathBuf;
use std::sync::Arc;

use dioxus::prelude::*;
use maglab_core::model::{LessonCatalog, SessionState};
use services::{
    ActivityLogService, AssetLocator, Clock, LessonService, ReportExporter, TutorService,
};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;
    fn catalog(&self) -> Arc<LessonCatalog>;

    fn lessons(&self) -> Arc<LessonService>;
    fn tutor(&self) -> Arc<TutorService>;
    fn activity(&self) -> Arc<ActivityLogService>;
    fn assets(&self) -> Arc<AssetLocator>;
    fn exporters(&self) -> Vec<Arc<dyn ReportExporter>>;

    /// Directory that report and transcript files are written to.
    fn export_dir(&self) -> PathBuf;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    catalog: Arc<LessonCatalog>,
    lessons: Arc<LessonService>,
    tutor: Arc<TutorService>,
    activity: Arc<ActivityLogService>,
    assets: Arc<AssetLocator>,
    exporters: Vec<Arc<dyn ReportExporter>>,
    export_dir: PathBuf,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            catalog: app.catalog(),
            lessons: app.lessons(),
            tutor: app.tutor(),
            activity: app.activity(),
            assets: app.assets(),
            exporters: app.exporters(),
            export_dir: app.export_dir(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// A fresh session on the first lesson step.
    #[must_use]
    pub fn new_session(&self) -> SessionState {
        SessionState::new(Arc::clone(&self.catalog), self.clock)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn tutor(&self) -> Arc<TutorService> {
        Arc::clone(&self.tutor)
    }

    #[must_use]
    pub fn activity(&self) -> Arc<ActivityLogService> {
        Arc::clone(&self.activity)
    }

    #[must_use]
    pub fn assets(&self) -> Arc<AssetLocator> {
        Arc::clone(&self.assets)
    }

    #[must_use]
    pub fn exporters(&self) -> &[Arc<dyn ReportExporter>] {
        &self.exporters
    }

    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Provide the learner's session to every view below the caller.
pub fn use_session_provider() -> Signal<SessionState> {
    let ctx = use_context::<AppContext>();
    use_context_provider(|| Signal::new(ctx.new_session()))
}

#[must_use]
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}
