// src/domain/queue_item/entity.rs
//
// Replacement queue entities.
//
// A QueueItem is created once per successfully-produced replacement. Status
// transitions are monotonic: completed/failed items are never reopened from
// inside this core; reprocessing is an external consumer's responsibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::DomainError;

/// Lifecycle state of a queue item. Closed enumeration; the wire form is
/// the snake_case string produced by `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl QueueStatus {
    pub const ALL: [QueueStatus; 4] = [
        QueueStatus::Pending,
        QueueStatus::Processing,
        QueueStatus::Completed,
        QueueStatus::Failed,
    ];

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueStatus::Completed | QueueStatus::Failed)
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueStatus::Pending => write!(f, "pending"),
            QueueStatus::Processing => write!(f, "processing"),
            QueueStatus::Completed => write!(f, "completed"),
            QueueStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for QueueStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(QueueStatus::Pending),
            "processing" => Ok(QueueStatus::Processing),
            "completed" => Ok(QueueStatus::Completed),
            "failed" => Ok(QueueStatus::Failed),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}

/// One enqueued replacement request.
///
/// INVARIANTS:
/// - `retry_count` only increases
/// - `completed_at` is set iff `status == Completed`
/// - `started_at` is set once processing begins and never cleared
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: Uuid,
    pub status: QueueStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Public URL of the uploaded replacement video
    pub video_url: String,
    pub project_name: String,
    pub creative_identifier: String,

    pub retry_count: u32,
    pub last_error: Option<String>,
    pub result: Option<String>,

    /// Free-form metadata (original identifier, disapproval reason, whether
    /// background composition succeeded, ...)
    pub metadata: serde_json::Value,
}

impl QueueItem {
    /// Deterministic business-key fingerprint used for deduplication.
    /// Two submissions of the same creative identifier for the same project
    /// collide here regardless of upload URL or timing.
    pub fn business_fingerprint(creative_identifier: &str, project_name: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(creative_identifier.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(project_name.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Fields supplied by the orchestrator when enqueuing; everything else
/// (id, status, timestamps, retry counter) is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewQueueItem {
    pub video_url: String,
    pub project_name: String,
    pub creative_identifier: String,
    pub metadata: serde_json::Value,
}
