use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use maglab_core::model::{LessonCatalog, LessonPage, SessionCommand, SessionState};
use maglab_core::time::fixed_clock;
use services::{
    ActivityLogService, AppServices, AssetLocator, ChatCompletion, Clock, LessonService,
    ReportExporter, ServiceOptions, TutorError, TutorPrompt, TutorService,
};

use crate::context::{UiApp, build_app_context};
use crate::views::{HistoryView, LessonView, SettingsView};

pub const TUTOR_REPLY: &str = "Good thinking! Look at the compass again.";

struct CannedTutor;

#[async_trait]
impl ChatCompletion for CannedTutor {
    fn enabled(&self) -> bool {
        true
    }

    async fn complete(&self, _prompt: &TutorPrompt) -> Result<String, TutorError> {
        Ok(TUTOR_REPLY.to_string())
    }
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    export_dir: PathBuf,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn catalog(&self) -> Arc<LessonCatalog> {
        self.services.catalog()
    }

    fn lessons(&self) -> Arc<LessonService> {
        self.services.lessons()
    }

    fn tutor(&self) -> Arc<TutorService> {
        self.services.tutor()
    }

    fn activity(&self) -> Arc<ActivityLogService> {
        self.services.activity()
    }

    fn assets(&self) -> Arc<AssetLocator> {
        self.services.assets()
    }

    fn exporters(&self) -> Vec<Arc<dyn ReportExporter>> {
        self.services.exporters().to_vec()
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Lesson(LessonPage),
    History,
    Settings,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    seed: Vec<SessionCommand>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| Signal::new(seeded_session(ctx.new_session(), props.view, &props.seed)));
    rsx! { Router::<TestRoute> {} }
}

fn seeded_session(mut state: SessionState, view: ViewKind, seed: &[SessionCommand]) -> SessionState {
    state
        .apply_all(seed.iter().cloned())
        .expect("seed commands apply");
    if let ViewKind::Lesson(page) = view {
        state
            .apply(SessionCommand::Navigate(page.step_id()))
            .expect("page is in the catalog");
    }
    state
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Lesson(_) => rsx! { LessonView {} },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::Settings => rsx! { SettingsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_seed(view, Vec::new())
}

/// Harness whose session has `seed` applied before the first render.
pub fn setup_view_harness_with_seed(view: ViewKind, seed: Vec<SessionCommand>) -> ViewHarness {
    let services = AppServices::in_memory(
        fixed_clock(),
        TutorService::new(Arc::new(CannedTutor)),
        ServiceOptions::default(),
    )
    .expect("services assemble");

    let app = Arc::new(TestApp {
        services: services.clone(),
        export_dir: std::env::temp_dir().join("maglab-ui-tests"),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view, seed });

    ViewHarness { dom, services }
}
