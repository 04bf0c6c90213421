// src/lib.rs
// AdRescue - Recovery pipeline for disapproved ad creatives
//
// Architecture:
// - Domain-centric: parsed identifiers, match outcomes and queue items are
//   pure values with explicit invariants
// - Service/repository layering: decision logic in services, dumb SQL
//   mappers in repositories
// - External collaborators (approval feed, asset catalog, composition,
//   upload) behind constructor-injected traits; tests use mocks
// - Explicit: no implicit behavior, typed errors for every expected outcome

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_queue_item,
    validate_transition,
    AssetCandidate,
    ChannelBinding,
    CredentialHandle,
    DisapprovalCandidate,
    MatchOutcome,
    NewQueueItem,
    ParsedIdentifier,
    QueueItem,
    QueueStatus,
    Visibility,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Configuration & Database
// ============================================================================

pub use config::{AppConfig, CompositionConfig};

pub use db::{
    create_connection_pool, default_database_path, initialize_database, ConnectionPool,
};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{QueueRepository, SqliteQueueRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AssetResolver,
    BatchSummary,
    CandidateOutcome,
    ChannelRouter,
    Disposition,
    IdentifierParser,
    RecoveryOptions,
    RecoveryService,
};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    ApprovalFeed,
    AssetCatalog,
    CommandComposition,
    CompositionRequest,
    CompositionService,
    HttpUploadService,
    JsonApprovalFeed,
    LocalDirCatalog,
    Orientation,
    UploadService,
};

// ============================================================================
// PUBLIC API - Infrastructure
// ============================================================================

pub use infrastructure::RecoveryWorkspace;
