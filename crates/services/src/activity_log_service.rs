use std::env;
use std::sync::Arc;

use maglab_core::Clock;
use maglab_core::model::StepId;
use storage::repository::{ActivityLogRepository, ActivityRecord, NewActivityRow};
use tracing::{debug, warn};

use crate::error::ActivityLogError;

/// Column layout of the activity sink.
///
/// Eight columns hold id, name, class, activity, three answers and feedback.
/// The ninth carries inquiry transcripts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogSchema {
    Eight,
    #[default]
    Nine,
}

impl LogSchema {
    /// # Errors
    ///
    /// Returns `ActivityLogError::UnsupportedColumns` for anything but 8 or 9.
    pub fn from_columns(columns: usize) -> Result<Self, ActivityLogError> {
        match columns {
            8 => Ok(Self::Eight),
            9 => Ok(Self::Nine),
            other => Err(ActivityLogError::UnsupportedColumns(other)),
        }
    }

    /// Reads `MAGLAB_LOG_COLUMNS`, defaulting to nine columns.
    ///
    /// # Errors
    ///
    /// Returns `ActivityLogError::UnsupportedColumns` if the variable is set to
    /// something other than 8 or 9.
    pub fn from_env() -> Result<Self, ActivityLogError> {
        match env::var("MAGLAB_LOG_COLUMNS") {
            Ok(raw) => {
                let columns = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ActivityLogError::UnsupportedColumns(0))?;
                Self::from_columns(columns)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn columns(self) -> usize {
        match self {
            Self::Eight => 8,
            Self::Nine => 9,
        }
    }

    /// Pad with empty strings or truncate to the schema's column count.
    #[must_use]
    pub fn fit(self, mut fields: Vec<String>) -> Vec<String> {
        fields.resize(self.columns(), String::new());
        fields
    }
}

/// Best-effort row append on top of an activity repository.
#[derive(Clone)]
pub struct ActivityLogService {
    clock: Clock,
    schema: LogSchema,
    repo: Option<Arc<dyn ActivityLogRepository>>,
}

impl ActivityLogService {
    #[must_use]
    pub fn new(clock: Clock, schema: LogSchema, repo: Arc<dyn ActivityLogRepository>) -> Self {
        Self {
            clock,
            schema,
            repo: Some(repo),
        }
    }

    /// A sink that accepts nothing; every append returns `false`.
    #[must_use]
    pub fn disabled(clock: Clock) -> Self {
        Self {
            clock,
            schema: LogSchema::default(),
            repo: None,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.repo.is_some()
    }

    #[must_use]
    pub fn schema(&self) -> LogSchema {
        self.schema
    }

    /// Append one row, fitted to the schema. Returns whether it was stored.
    pub async fn append_row(&self, source: &StepId, fields: Vec<String>) -> bool {
        match self.try_append_row(source, fields).await {
            Ok(id) => {
                debug!(row_id = id, source = %source, "activity row appended");
                true
            }
            Err(ActivityLogError::Disabled) => {
                debug!(source = %source, "activity logging disabled; row dropped");
                false
            }
            Err(err) => {
                warn!(error = %err, source = %source, "activity row append failed");
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ActivityLogError::Disabled` without a repository, or the
    /// storage error raised by the append.
    pub async fn try_append_row(
        &self,
        source: &StepId,
        fields: Vec<String>,
    ) -> Result<i64, ActivityLogError> {
        let repo = self.repo.as_ref().ok_or(ActivityLogError::Disabled)?;
        let row = NewActivityRow {
            source: source.as_str().to_owned(),
            fields: self.schema.fit(fields),
            logged_at: self.clock.now(),
        };
        Ok(repo.append_row(&row).await?)
    }

    /// Most recent rows first.
    ///
    /// # Errors
    ///
    /// Returns `ActivityLogError` when disabled or the read fails.
    pub async fn recent(&self, limit: u32) -> Result<Vec<ActivityRecord>, ActivityLogError> {
        let repo = self.repo.as_ref().ok_or(ActivityLogError::Disabled)?;
        Ok(repo.list_recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maglab_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn fit_pads_and_truncates() {
        let eight = strings(&["1", "2", "3", "4", "5", "6", "7", "8"]);
        assert_eq!(LogSchema::Nine.fit(eight.clone()).len(), 9);
        assert_eq!(LogSchema::Nine.fit(eight.clone())[8], "");
        assert_eq!(LogSchema::Eight.fit(eight.clone()), eight);

        let ten = strings(&["a"; 10]);
        assert_eq!(LogSchema::Eight.fit(ten).len(), 8);
    }

    #[test]
    fn only_eight_or_nine_columns() {
        assert_eq!(LogSchema::from_columns(8).unwrap(), LogSchema::Eight);
        assert!(matches!(
            LogSchema::from_columns(7),
            Err(ActivityLogError::UnsupportedColumns(7))
        ));
    }

    #[tokio::test]
    async fn appends_fitted_rows() {
        let repo = Arc::new(InMemoryRepository::new());
        let log = ActivityLogService::new(fixed_clock(), LogSchema::Nine, repo.clone());
        assert!(log.append_row(&"report".into(), strings(&["20301", "Kim"])).await);

        let rows = log.recent(5).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields.len(), 9);
        assert_eq!(rows[0].source, "report");
    }

    #[tokio::test]
    async fn disabled_sink_reports_false() {
        let log = ActivityLogService::disabled(fixed_clock());
        assert!(!log.enabled());
        assert!(!log.append_row(&"report".into(), strings(&["x"])).await);
        assert!(matches!(log.recent(1).await, Err(ActivityLogError::Disabled)));
    }
}
