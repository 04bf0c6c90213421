// src/domain/creative.rs
//
// Creative identifier value objects.
//
// A creative identifier is the raw, structured-but-inconsistent name string
// that identifies an ad creative. Parsing never fails: malformed input
// degrades to a best-effort partial result marked `degraded`.

use serde::{Deserialize, Serialize};

/// One disapproved creative as reported by the approval feed.
/// Immutable; consumed once per batch pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisapprovalCandidate {
    /// Raw creative identifier (e.g. an ad-group name)
    pub identifier: String,

    /// External account reference, normalized (no dash separators)
    pub account_id: String,

    /// Disapproval reason tag from the feed
    pub reason: String,
}

/// Structured fields extracted from a raw creative identifier.
///
/// Derived deterministically from a [`DisapprovalCandidate`]; never mutated
/// after creation. Identical input always yields identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIdentifier {
    /// Short business-line code (e.g. NB, OM, SBC, RL)
    pub project: String,

    /// First free-text segment of the video name
    pub concept_name: String,

    /// Human-readable video name, used to search the asset catalog
    pub video_name: String,

    /// True if the marker substring appears anywhere in the identifier.
    /// This is a whole-string existence check, independent of where the
    /// video name accumulation stopped.
    pub has_marker: bool,

    /// Purely-numeric suffix tokens, in identifier order. These denote
    /// hierarchy/version, not content.
    pub trailing_numbers: Vec<String>,

    /// True when the identifier did not fit the expected shape and a
    /// best-effort fallback was produced instead of failing.
    pub degraded: bool,
}

impl ParsedIdentifier {
    /// Fallback result for identifiers that do not follow the convention.
    pub fn degraded(project: String, video_name: String) -> Self {
        Self {
            project,
            concept_name: String::new(),
            video_name,
            has_marker: false,
            trailing_numbers: Vec::new(),
            degraded: true,
        }
    }
}
