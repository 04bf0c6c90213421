// src/domain/channel.rs
//
// Upload channel configuration.
//
// Bindings are static configuration, loaded at process start and immutable
// during a run. There is no implicit default channel.

use serde::{Deserialize, Serialize};

/// Opaque reference to an upload credential (a token name, a key id).
/// The credential material itself lives with the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHandle(pub String);

impl CredentialHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Maps a project tag to the identity used to upload its replacements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelBinding {
    pub project_tag: String,
    pub credential: CredentialHandle,
}

/// Visibility of an uploaded replacement asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Unlisted => write!(f, "unlisted"),
            Visibility::Private => write!(f, "private"),
        }
    }
}
