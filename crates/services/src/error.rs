//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use maglab_core::model::{CatalogError, QuizError, SessionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the tutor chat backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("no API key is configured for the tutor")]
    Disabled,
    #[error("the tutor returned an empty response")]
    EmptyResponse,
    #[error("tutor request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ActivityLogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActivityLogError {
    #[error("activity logging is disabled")]
    Disabled,
    #[error("unsupported column count {0}; expected 8 or 9")]
    UnsupportedColumns(usize),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AssetLocator`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssetError {
    #[error("image {name} not found in {searched:?}")]
    NotFound { name: String, searched: Vec<PathBuf> },
}

/// Errors emitted by report exporters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("{0} export is not available")]
    Unsupported(&'static str),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted while loading the quiz bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizBankError {
    #[error("failed to read quiz bank {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] QuizError),
    #[error("duplicate quiz for step {0}")]
    Duplicate(String),
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error("all three report sections must be filled in")]
    IncompleteReport,
    #[error("no quiz is configured for step {0}")]
    NoQuiz(String),
    #[error("message is empty")]
    EmptyMessage,
    #[error(transparent)]
    Core(#[from] maglab_core::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    QuizBank(#[from] QuizBankError),
    #[error(transparent)]
    ActivityLog(#[from] ActivityLogError),
}
