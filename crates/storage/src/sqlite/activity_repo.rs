use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{ActivityLogRepository, ActivityRecord, NewActivityRow, StorageError};

use super::SqliteRepository;
use super::mapping::{conn, i64_to_usize, ser, usize_to_i64};

#[async_trait]
impl ActivityLogRepository for SqliteRepository {
    async fn append_row(&self, row: &NewActivityRow) -> Result<i64, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let id = sqlx::query(
            r"
            INSERT INTO activity_rows (source, column_count, logged_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(&row.source)
        .bind(usize_to_i64("column_count", row.fields.len())?)
        .bind(row.logged_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?
        .last_insert_rowid();

        for (position, value) in row.fields.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO activity_cells (row_id, position, value)
                VALUES (?1, ?2, ?3)
                ",
            )
            .bind(id)
            .bind(usize_to_i64("position", position)?)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(id)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ActivityRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.source, r.column_count, r.logged_at, c.position, c.value
            FROM (
                SELECT id, source, column_count, logged_at
                FROM activity_rows
                ORDER BY id DESC
                LIMIT ?1
            ) AS r
            LEFT JOIN activity_cells AS c ON c.row_id = r.id
            ORDER BY r.id DESC, c.position ASC
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut records: Vec<ActivityRecord> = Vec::new();
        for row in rows {
            let id: i64 = row.try_get("id").map_err(ser)?;
            let position: Option<i64> = row.try_get("position").map_err(ser)?;
            let value: Option<String> = row.try_get("value").map_err(ser)?;

            let starts_new = records.last().is_none_or(|last| last.id != id);
            if starts_new {
                let source: String = row.try_get("source").map_err(ser)?;
                let column_count: i64 = row.try_get("column_count").map_err(ser)?;
                let logged_at: DateTime<Utc> = row.try_get("logged_at").map_err(ser)?;
                records.push(ActivityRecord {
                    id,
                    source,
                    fields: vec![String::new(); i64_to_usize("column_count", column_count)?],
                    logged_at,
                });
            }

            if let (Some(position), Some(value), Some(record)) = (position, value, records.last_mut())
            {
                let position = i64_to_usize("position", position)?;
                let Some(slot) = record.fields.get_mut(position) else {
                    return Err(StorageError::Serialization(format!(
                        "cell {position} outside row {id}"
                    )));
                };
                *slot = value;
            }
        }

        Ok(records)
    }

    async fn count_rows(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_rows")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        u64::try_from(count).map_err(ser)
    }
}
