#![forbid(unsafe_code)]

pub mod activity_log_service;
pub mod app_services;
pub mod asset_locator;
pub mod error;
pub mod lesson_service;
pub mod prompts;
pub mod quiz_bank;
pub mod report_export;
pub mod tutor_service;

pub use maglab_core::Clock;
pub use storage::repository::ActivityRecord;

pub use activity_log_service::{ActivityLogService, LogSchema};
pub use app_services::{AppServices, ServiceOptions};
pub use asset_locator::AssetLocator;
pub use error::{
    ActivityLogError, AppServicesError, AssetError, ExportError, LessonServiceError,
    QuizBankError, TutorError,
};
pub use lesson_service::{
    LessonOutcome, LessonService, Notice, NoticeLevel, PendingLog, PendingRow, join_transcript,
};
pub use quiz_bank::QuizBank;
pub use report_export::{
    DisabledPdfExporter, PlainTextExporter, ReportDocument, ReportExporter, write_report,
    write_transcript,
};
pub use tutor_service::{
    ChatCompletion, DisabledChat, OpenAiChat, TutorConfig, TutorPrompt, TutorReply, TutorService,
};
