// src/domain/queue_item/invariants.rs
//
// Queue item invariants, enforced at write time by the repository.

use crate::domain::queue_item::entity::{QueueItem, QueueStatus};
use crate::domain::DomainError;

/// Allowed status transitions.
///
/// Pending -> Processing | Completed | Failed
/// Processing -> Completed | Failed
/// Completed, Failed -> (terminal)
///
/// Same-status updates are rejected too: every update must move forward.
pub fn validate_transition(from: QueueStatus, to: QueueStatus) -> Result<(), DomainError> {
    let allowed = match (from, to) {
        (QueueStatus::Pending, QueueStatus::Processing)
        | (QueueStatus::Pending, QueueStatus::Completed)
        | (QueueStatus::Pending, QueueStatus::Failed)
        | (QueueStatus::Processing, QueueStatus::Completed)
        | (QueueStatus::Processing, QueueStatus::Failed) => true,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(DomainError::InvalidStatusTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Structural validation of a queue item before it is persisted.
pub fn validate_queue_item(item: &QueueItem) -> Result<(), DomainError> {
    if item.video_url.trim().is_empty() {
        return Err(DomainError::EmptyField("video_url"));
    }
    if item.project_name.trim().is_empty() {
        return Err(DomainError::EmptyField("project_name"));
    }
    if item.creative_identifier.trim().is_empty() {
        return Err(DomainError::EmptyField("creative_identifier"));
    }

    let completed = item.status == QueueStatus::Completed;
    if completed != item.completed_at.is_some() {
        return Err(DomainError::CompletedAtMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn item(status: QueueStatus) -> QueueItem {
        QueueItem {
            id: Uuid::new_v4(),
            status,
            created_at: Utc::now(),
            started_at: None,
            completed_at: if status == QueueStatus::Completed {
                Some(Utc::now())
            } else {
                None
            },
            video_url: "https://videos.example/watch?v=abc".to_string(),
            project_name: "NB".to_string(),
            creative_identifier: "YT_NB_video_01_01".to_string(),
            retry_count: 0,
            last_error: None,
            result: None,
            metadata: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(validate_transition(QueueStatus::Pending, QueueStatus::Processing).is_ok());
        assert!(validate_transition(QueueStatus::Processing, QueueStatus::Completed).is_ok());
        assert!(validate_transition(QueueStatus::Processing, QueueStatus::Failed).is_ok());
    }

    #[test]
    fn test_terminal_states_are_final() {
        for to in QueueStatus::ALL {
            assert!(validate_transition(QueueStatus::Completed, to).is_err());
            assert!(validate_transition(QueueStatus::Failed, to).is_err());
        }
    }

    #[test]
    fn test_no_backwards_or_same_status_updates() {
        assert!(validate_transition(QueueStatus::Processing, QueueStatus::Pending).is_err());
        assert!(validate_transition(QueueStatus::Pending, QueueStatus::Pending).is_err());
        assert!(validate_transition(QueueStatus::Processing, QueueStatus::Processing).is_err());
    }

    #[test]
    fn test_completed_at_iff_completed() {
        let ok = item(QueueStatus::Completed);
        assert!(validate_queue_item(&ok).is_ok());

        let mut missing_stamp = item(QueueStatus::Completed);
        missing_stamp.completed_at = None;
        assert_eq!(
            validate_queue_item(&missing_stamp),
            Err(DomainError::CompletedAtMismatch)
        );

        let mut spurious_stamp = item(QueueStatus::Pending);
        spurious_stamp.completed_at = Some(Utc::now());
        assert_eq!(
            validate_queue_item(&spurious_stamp),
            Err(DomainError::CompletedAtMismatch)
        );
    }

    #[test]
    fn test_empty_fields_rejected() {
        let mut no_url = item(QueueStatus::Pending);
        no_url.video_url = "  ".to_string();
        assert_eq!(
            validate_queue_item(&no_url),
            Err(DomainError::EmptyField("video_url"))
        );
    }
}
