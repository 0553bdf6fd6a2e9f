use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A row about to be appended to the activity log.
///
/// `fields` is already padded or truncated to the sink's column count by the
/// caller; storage keeps whatever it is given, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivityRow {
    /// Step id of the page that produced the row.
    pub source: String,
    pub fields: Vec<String>,
    pub logged_at: DateTime<Utc>,
}

/// Persisted shape of an activity row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: i64,
    pub source: String,
    pub fields: Vec<String>,
    pub logged_at: DateTime<Utc>,
}

impl ActivityRecord {
    #[must_use]
    pub fn field(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(String::as_str)
    }
}

/// Append-only store of student activity rows.
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Append a row and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn append_row(&self, row: &NewActivityRow) -> Result<i64, StorageError>;

    /// Most recent rows first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if rows cannot be read or decoded.
    async fn list_recent(&self, limit: u32) -> Result<Vec<ActivityRecord>, StorageError>;

    /// Total number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the count query fails.
    async fn count_rows(&self) -> Result<u64, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    rows: Arc<Mutex<Vec<ActivityRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityLogRepository for InMemoryRepository {
    async fn append_row(&self, row: &NewActivityRow) -> Result<i64, StorageError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = i64::try_from(guard.len())
            .map_err(|_| StorageError::Serialization("row id overflow".into()))?
            + 1;
        guard.push(ActivityRecord {
            id,
            source: row.source.clone(),
            fields: row.fields.clone(),
            logged_at: row.logged_at,
        });
        Ok(id)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ActivityRecord>, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn count_rows(&self) -> Result<u64, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub activity: Arc<dyn ActivityLogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let activity: Arc<dyn ActivityLogRepository> = Arc::new(InMemoryRepository::new());
        Self { activity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maglab_core::time::fixed_now;

    fn row(source: &str, first: &str) -> NewActivityRow {
        NewActivityRow {
            source: source.into(),
            fields: vec![first.into(), "Kim".into(), "3".into()],
            logged_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let repo = InMemoryRepository::new();
        let first = repo.append_row(&row("report", "a")).await.unwrap();
        let second = repo.append_row(&row("inquiry", "b")).await.unwrap();
        assert!(second > first);

        let recent = repo.list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].source, "inquiry");
        assert_eq!(recent[1].field(0), Some("a"));
        assert_eq!(repo.count_rows().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let storage = Storage::in_memory();
        for i in 0..5 {
            storage
                .activity
                .append_row(&row("wrap-up", &i.to_string()))
                .await
                .unwrap();
        }
        let recent = storage.activity.list_recent(2).await.unwrap();
        let firsts: Vec<_> = recent.iter().map(|r| r.field(0).unwrap()).collect();
        assert_eq!(firsts, vec!["4", "3"]);
    }
}
