// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod asset_resolver;
pub mod channel_router;
pub mod identifier_parser;
pub mod recovery_service;


// Re-export all services and their types
pub use asset_resolver::{AssetResolver, DEFAULT_MATCH_THRESHOLD};

pub use channel_router::ChannelRouter;

pub use identifier_parser::IdentifierParser;

pub use recovery_service::{
    BatchSummary,
    CandidateOutcome,
    Disposition,
    RecoveryOptions,
    RecoveryService,
};
