// src/integrations/approval_feed.rs
//
// Approval-status feed reader.
//
// The feed reports the review state of every running creative. Exclusion
// rules are applied HERE, before candidates reach the orchestrator: paused
// and removed campaigns are not worth recovering, and demand-generation
// creatives follow a different replacement process entirely.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::DisapprovalCandidate;
use crate::error::{AppError, AppResult};

/// Campaign lifecycle states excluded from recovery.
const EXCLUDED_LIFECYCLE_STATES: [&str; 2] = ["removed", "paused"];

/// Identifier marker for demand-generation campaigns, which are skipped.
const DEMAND_GEN_MARKER: &str = "DG";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApprovalFeed: Send + Sync {
    /// All creatives currently disapproved, exclusions already applied.
    async fn list_disapproved(&self) -> AppResult<Vec<DisapprovalCandidate>>;
}

/// One row of the exported approval feed.
#[derive(Debug, Deserialize)]
struct FeedRow {
    identifier: String,

    #[serde(default)]
    account_id: String,

    status: String,

    #[serde(default)]
    campaign_state: String,

    #[serde(default)]
    reason: Option<String>,
}

/// Approval feed backed by a JSON export file.
pub struct JsonApprovalFeed {
    path: PathBuf,
    disapproved_label: String,
}

impl JsonApprovalFeed {
    pub fn new(path: PathBuf, disapproved_label: String) -> Self {
        Self {
            path,
            disapproved_label,
        }
    }

    fn accept(&self, row: &FeedRow) -> bool {
        if row.identifier.is_empty() {
            return false;
        }

        let state = row.campaign_state.to_lowercase();
        if EXCLUDED_LIFECYCLE_STATES.contains(&state.as_str()) {
            log::info!(
                "Skipping {}: campaign state is '{}'",
                row.identifier,
                state
            );
            return false;
        }

        if row.identifier.contains(DEMAND_GEN_MARKER) {
            log::info!("Skipping demand-generation creative: {}", row.identifier);
            return false;
        }

        row.status == self.disapproved_label
    }
}

#[async_trait]
impl ApprovalFeed for JsonApprovalFeed {
    async fn list_disapproved(&self) -> AppResult<Vec<DisapprovalCandidate>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::external("approval feed", e))?;

        let rows: Vec<FeedRow> =
            serde_json::from_str(&raw).map_err(|e| AppError::external("approval feed", e))?;

        let candidates: Vec<DisapprovalCandidate> = rows
            .into_iter()
            .filter(|row| self.accept(row))
            .map(|row| DisapprovalCandidate {
                reason: row.reason.unwrap_or_else(|| row.status.clone()),
                // Account ids arrive dash-separated; downstream wants digits.
                account_id: row.account_id.replace('-', ""),
                identifier: row.identifier,
            })
            .collect();

        log::info!("{} disapproved creatives detected", candidates.len());
        Ok(candidates)
    }
}
