// src/repositories/queue_repository.rs
//
// Replacement queue persistence.
//
// The queue is the hand-off point to the downstream replacement sink: an
// external process polls pending rows and performs the actual ad-creative
// swap. This crate appends rows and advances their status; it never reopens
// terminal rows.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::{
    validate_queue_item, validate_transition, NewQueueItem, QueueItem, QueueStatus,
};
use crate::error::{AppError, AppResult};

pub trait QueueRepository: Send + Sync {
    /// Append a new pending item. Rejects a second submission of the same
    /// (creative identifier, project) business key with
    /// [`AppError::DuplicateQueueItem`]; nothing is ever silently overwritten.
    fn enqueue(&self, new: NewQueueItem) -> AppResult<QueueItem>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<QueueItem>>;

    /// Items in one status, oldest first. `Pending` is the surface the
    /// downstream sink polls.
    fn list_by_status(&self, status: QueueStatus) -> AppResult<Vec<QueueItem>>;

    /// Advance an item's status. `Processing` stamps `started_at`,
    /// `Completed` stamps `completed_at` and stores the result, `Failed`
    /// increments `retry_count` and records the error. Backwards moves and
    /// updates to terminal items are rejected.
    fn update_status(
        &self,
        id: Uuid,
        status: QueueStatus,
        result: Option<&str>,
        error: Option<&str>,
    ) -> AppResult<()>;

    fn counts_by_status(&self) -> AppResult<HashMap<QueueStatus, usize>>;
}

pub struct SqliteQueueRepository {
    pool: Arc<ConnectionPool>,
}

const SELECT_COLUMNS: &str = "id, status, created_at, started_at, completed_at, video_url, \
     project_name, creative_identifier, retry_count, last_error, result, metadata";

impl SqliteQueueRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to QueueItem - returns rusqlite::Error for query_map compatibility
    fn row_to_item(row: &Row) -> Result<QueueItem, rusqlite::Error> {
        let id_str: String = row.get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let status_str: String = row.get("status")?;
        let status = QueueStatus::from_str(&status_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let created_at = parse_timestamp(row.get("created_at")?)?;
        let started_at = row
            .get::<_, Option<String>>("started_at")?
            .map(parse_timestamp)
            .transpose()?;
        let completed_at = row
            .get::<_, Option<String>>("completed_at")?
            .map(parse_timestamp)
            .transpose()?;

        let retry_count: i64 = row.get("retry_count")?;

        let metadata_json: String = row.get("metadata")?;
        let metadata: serde_json::Value = serde_json::from_str(&metadata_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(QueueItem {
            id,
            status,
            created_at,
            started_at,
            completed_at,
            video_url: row.get("video_url")?,
            project_name: row.get("project_name")?,
            creative_identifier: row.get("creative_identifier")?,
            retry_count: retry_count as u32,
            last_error: row.get("last_error")?,
            result: row.get("result")?,
            metadata,
        })
    }
}

fn parse_timestamp(s: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl QueueRepository for SqliteQueueRepository {
    fn enqueue(&self, new: NewQueueItem) -> AppResult<QueueItem> {
        let now = Utc::now();
        let item = QueueItem {
            id: Uuid::new_v4(),
            status: QueueStatus::Pending,
            created_at: now,
            started_at: None,
            completed_at: None,
            video_url: new.video_url,
            project_name: new.project_name,
            creative_identifier: new.creative_identifier,
            retry_count: 0,
            last_error: None,
            result: None,
            metadata: new.metadata,
        };

        validate_queue_item(&item)?;

        let fingerprint =
            QueueItem::business_fingerprint(&item.creative_identifier, &item.project_name);
        let metadata_json = serde_json::to_string(&item.metadata)?;

        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT INTO queue_items (
                id, fingerprint, status, created_at, started_at, completed_at,
                video_url, project_name, creative_identifier, retry_count,
                last_error, result, metadata
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                item.id.to_string(),
                fingerprint,
                item.status.to_string(),
                item.created_at.to_rfc3339(),
                Option::<String>::None,
                Option::<String>::None,
                item.video_url,
                item.project_name,
                item.creative_identifier,
                item.retry_count as i64,
                item.last_error,
                item.result,
                metadata_json,
            ],
        );

        match inserted {
            Ok(_) => Ok(item),
            Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateQueueItem {
                identifier: item.creative_identifier,
                project: item.project_name,
            }),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<QueueItem>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM queue_items WHERE id = ?1",
            SELECT_COLUMNS
        ))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_item) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_by_status(&self, status: QueueStatus) -> AppResult<Vec<QueueItem>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM queue_items WHERE status = ?1 ORDER BY created_at",
            SELECT_COLUMNS
        ))?;

        let items: Vec<QueueItem> = stmt
            .query_map(params![status.to_string()], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn update_status(
        &self,
        id: Uuid,
        status: QueueStatus,
        result: Option<&str>,
        error: Option<&str>,
    ) -> AppResult<()> {
        let current = self.get_by_id(id)?.ok_or(AppError::NotFound)?;

        validate_transition(current.status, status)?;

        let now = Utc::now().to_rfc3339();
        let conn = self.pool.get()?;

        match status {
            QueueStatus::Processing => {
                conn.execute(
                    "UPDATE queue_items SET status = ?1, started_at = ?2 WHERE id = ?3",
                    params![status.to_string(), now, id.to_string()],
                )?;
            }
            QueueStatus::Completed => {
                conn.execute(
                    "UPDATE queue_items SET status = ?1, completed_at = ?2, result = ?3
                     WHERE id = ?4",
                    params![status.to_string(), now, result, id.to_string()],
                )?;
            }
            QueueStatus::Failed => {
                conn.execute(
                    "UPDATE queue_items SET status = ?1, retry_count = retry_count + 1,
                     last_error = ?2 WHERE id = ?3",
                    params![status.to_string(), error, id.to_string()],
                )?;
            }
            // validate_transition never lets a row move back to Pending
            QueueStatus::Pending => unreachable!("transition to pending is rejected"),
        }

        Ok(())
    }

    fn counts_by_status(&self) -> AppResult<HashMap<QueueStatus, usize>> {
        let conn = self.pool.get()?;

        let mut counts: HashMap<QueueStatus, usize> =
            QueueStatus::ALL.iter().map(|s| (*s, 0)).collect();

        let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM queue_items GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            let status: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((status, count))
        })?;

        for row in rows {
            let (status_str, count) = row?;
            let status = QueueStatus::from_str(&status_str)?;
            counts.insert(status, count as usize);
        }

        Ok(counts)
    }
}
