// src/integrations/mod.rs
//
// External collaborators behind narrow interfaces.
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Traits are constructor-injected into services; tests use mocks
// - Implementations map external concerns to domain values, nothing more

pub mod approval_feed;
pub mod asset_catalog;
pub mod composition;
pub mod upload;

pub use approval_feed::{ApprovalFeed, JsonApprovalFeed};
pub use asset_catalog::{AssetCatalog, LocalDirCatalog};
pub use composition::{CommandComposition, CompositionRequest, CompositionService, Orientation};
pub use upload::{HttpUploadService, UploadService};

#[cfg(test)]
pub use approval_feed::MockApprovalFeed;
#[cfg(test)]
pub use asset_catalog::MockAssetCatalog;
#[cfg(test)]
pub use composition::MockCompositionService;
#[cfg(test)]
pub use upload::MockUploadService;
