use std::sync::Arc;

use maglab_core::model::{LessonCatalog, lesson_catalog};
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::activity_log_service::{ActivityLogService, LogSchema};
use crate::asset_locator::AssetLocator;
use crate::error::AppServicesError;
use crate::lesson_service::LessonService;
use crate::quiz_bank::QuizBank;
use crate::report_export::{DisabledPdfExporter, PlainTextExporter, ReportExporter};
use crate::tutor_service::TutorService;

/// Startup choices resolved from command-line flags and the environment.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub schema: LogSchema,
    pub assets: AssetLocator,
    pub quizzes: QuizBank,
}

impl ServiceOptions {
    /// Options taken from `MAGLAB_*` variables alone.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the column count or quiz file is invalid.
    pub fn from_env() -> Result<Self, AppServicesError> {
        Ok(Self {
            schema: LogSchema::from_env()?,
            assets: AssetLocator::from_env(),
            quizzes: QuizBank::from_env()?,
        })
    }
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            schema: LogSchema::default(),
            assets: AssetLocator::with_base("assets"),
            quizzes: QuizBank::bundled().unwrap_or_default(),
        }
    }
}

/// Assembles the services the lesson UI talks to.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    catalog: Arc<LessonCatalog>,
    tutor: Arc<TutorService>,
    activity: Arc<ActivityLogService>,
    assets: Arc<AssetLocator>,
    lessons: Arc<LessonService>,
    exporters: Vec<Arc<dyn ReportExporter>>,
}

impl AppServices {
    /// Build services that log activity rows to `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the catalog fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        options: ServiceOptions,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        info!(db_url, columns = options.schema.columns(), "activity log opened");
        Self::assemble(clock, Some(storage), TutorService::from_env(), options)
    }

    /// Build services over in-memory storage with an explicit tutor.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog fails to build.
    pub fn in_memory(
        clock: Clock,
        tutor: TutorService,
        options: ServiceOptions,
    ) -> Result<Self, AppServicesError> {
        Self::assemble(clock, Some(Storage::in_memory()), tutor, options)
    }

    /// Build services with no activity sink; rows are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog fails to build.
    pub fn offline(
        clock: Clock,
        tutor: TutorService,
        options: ServiceOptions,
    ) -> Result<Self, AppServicesError> {
        Self::assemble(clock, None, tutor, options)
    }

    fn assemble(
        clock: Clock,
        storage: Option<Storage>,
        tutor: TutorService,
        options: ServiceOptions,
    ) -> Result<Self, AppServicesError> {
        let ServiceOptions {
            schema,
            assets,
            quizzes,
        } = options;
        let catalog = Arc::new(lesson_catalog()?);
        let tutor = Arc::new(tutor);
        let activity = Arc::new(match storage {
            Some(storage) => ActivityLogService::new(clock, schema, storage.activity),
            None => ActivityLogService::disabled(clock),
        });
        let lessons = Arc::new(LessonService::new(
            clock,
            Arc::clone(&tutor),
            Arc::clone(&activity),
            Arc::new(quizzes),
        ));
        let exporters: Vec<Arc<dyn ReportExporter>> =
            vec![Arc::new(PlainTextExporter), Arc::new(DisabledPdfExporter)];

        Ok(Self {
            clock,
            catalog,
            tutor,
            activity,
            assets: Arc::new(assets),
            lessons,
            exporters,
        })
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<LessonCatalog> {
        Arc::clone(&self.catalog)
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
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    /// Report formats in menu order; disabled ones are listed too.
    #[must_use]
    pub fn exporters(&self) -> &[Arc<dyn ReportExporter>] {
        &self.exporters
    }
}
