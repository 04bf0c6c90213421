// src/domain/asset.rs
//
// Asset catalog value objects.

use serde::{Deserialize, Serialize};

/// One entry from the catalog of available source videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCandidate {
    /// Catalog-specific identifier (a path for local catalogs)
    pub id: String,

    /// Display name, usually a file name with extension
    pub display_name: String,

    /// Size in bytes as reported by the catalog
    pub size_bytes: u64,
}

/// The outcome of resolving a parsed identifier against a catalog.
///
/// `NoMatch` is explicit absence, never a guess: a candidate below the
/// acceptance threshold is not returned.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// A candidate name matched one of the exact search variants
    Exact(AssetCandidate),

    /// Best word-overlap candidate at or above the acceptance threshold
    Fuzzy { candidate: AssetCandidate, score: f64 },

    /// Nothing acceptable; carries the best score seen for the log line
    NoMatch { best_score: f64 },
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        !matches!(self, MatchOutcome::NoMatch { .. })
    }

    /// The chosen candidate, if any.
    pub fn candidate(&self) -> Option<&AssetCandidate> {
        match self {
            MatchOutcome::Exact(c) => Some(c),
            MatchOutcome::Fuzzy { candidate, .. } => Some(candidate),
            MatchOutcome::NoMatch { .. } => None,
        }
    }
}
