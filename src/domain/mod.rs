// src/domain/mod.rs
//
// Domain layer
//
// CRITICAL RULES:
// - Pure data and invariants only
// - No I/O, no repositories, no collaborator calls
// - Entities validate at write time via explicit validators

pub mod asset;
pub mod channel;
pub mod creative;
pub mod queue_item;

pub use asset::{AssetCandidate, MatchOutcome};
pub use channel::{ChannelBinding, CredentialHandle, Visibility};
pub use creative::{DisapprovalCandidate, ParsedIdentifier};
pub use queue_item::{
    validate_queue_item, validate_transition, NewQueueItem, QueueItem, QueueStatus,
};

use thiserror::Error;

/// Violations of domain invariants, raised by the validators before persisting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Unknown queue status: {0}")]
    UnknownStatus(String),

    #[error("completed_at must be set exactly when status is 'completed'")]
    CompletedAtMismatch,

    #[error("Queue item field '{0}' must not be empty")]
    EmptyField(&'static str),
}
