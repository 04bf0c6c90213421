// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic beyond invariant checks at write time
// - NO collaborator calls
// - Explicit SQL only

pub mod queue_repository;

pub use queue_repository::{QueueRepository, SqliteQueueRepository};
