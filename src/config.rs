// src/config.rs
//
// Application configuration.
//
// PRINCIPLES:
// - Explicitly constructed, immutable after load
// - No global mutable state; components receive what they need at startup
// - A broken configuration aborts before any candidate is processed

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{ChannelBinding, Visibility};
use crate::error::{AppError, AppResult};
use crate::integrations::composition::{CompositionRequest, Orientation};

/// Top-level configuration, deserialized from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Queue database path; defaults to the platform data directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Exported approval feed read by `JsonApprovalFeed`
    pub feed_path: PathBuf,

    /// Root directory of the asset catalog (one subdirectory per project)
    pub catalog_root: PathBuf,

    /// Upload service endpoint
    pub upload_endpoint: String,

    /// Visibility of uploaded replacements
    #[serde(default = "default_visibility")]
    pub upload_visibility: Visibility,

    /// Project tag -> upload credential bindings. Must not be empty.
    pub channels: Vec<ChannelBinding>,

    #[serde(default)]
    pub composition: CompositionConfig,

    /// Courtesy pause between external-service-heavy candidates, in seconds
    #[serde(default = "default_inter_item_delay_secs")]
    pub inter_item_delay_secs: u64,

    /// Feed status label that marks a creative as disapproved
    #[serde(default = "default_disapproved_label")]
    pub disapproved_label: String,
}

/// Settings for the external composition step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionConfig {
    /// External program invoked to compose the replacement; when absent,
    /// composition always fails and the unmodified source asset is used
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub orientation: Orientation,

    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,

    /// Style/disclaimer text burned into the composed output
    #[serde(default)]
    pub style: String,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            program: None,
            orientation: Orientation::default(),
            duration_seconds: default_duration_seconds(),
            style: String::new(),
        }
    }
}

impl CompositionConfig {
    pub fn to_request(&self) -> CompositionRequest {
        CompositionRequest {
            orientation: self.orientation,
            duration_seconds: self.duration_seconds,
            style: self.style.clone(),
        }
    }
}

fn default_visibility() -> Visibility {
    Visibility::Unlisted
}

fn default_inter_item_delay_secs() -> u64 {
    5
}

fn default_disapproved_label() -> String {
    "disapproved".to_string()
}

fn default_duration_seconds() -> u32 {
    5
}

impl AppConfig {
    /// Load and validate configuration from a JSON file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;

        let config: AppConfig = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("Invalid config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Startup validation. A failure here is fatal: the batch never starts.
    pub fn validate(&self) -> AppResult<()> {
        if self.channels.is_empty() {
            return Err(AppError::Config(
                "No channel bindings configured".to_string(),
            ));
        }

        let mut tags: Vec<&str> = self.channels.iter().map(|b| b.project_tag.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        if tags.len() != self.channels.len() {
            return Err(AppError::Config(
                "Duplicate project tag in channel bindings".to_string(),
            ));
        }

        if self.upload_endpoint.trim().is_empty() {
            return Err(AppError::Config("Upload endpoint is empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CredentialHandle;
    use std::io::Write;

    fn sample() -> AppConfig {
        AppConfig {
            database_path: None,
            feed_path: PathBuf::from("feed.json"),
            catalog_root: PathBuf::from("catalog"),
            upload_endpoint: "https://upload.example/videos".to_string(),
            upload_visibility: Visibility::Unlisted,
            channels: vec![ChannelBinding {
                project_tag: "NB".to_string(),
                credential: CredentialHandle("token_NB".to_string()),
            }],
            composition: CompositionConfig::default(),
            inter_item_delay_secs: 5,
            disapproved_label: "disapproved".to_string(),
        }
    }

    #[test]
    fn test_load_from_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "feed_path": "feed.json",
                "catalog_root": "catalog",
                "upload_endpoint": "https://upload.example/videos",
                "channels": [
                    {{"project_tag": "NB", "credential": "token_NB"}},
                    {{"project_tag": "OM", "credential": "token_OM"}}
                ]
            }}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.inter_item_delay_secs, 5);
        assert_eq!(config.disapproved_label, "disapproved");
        assert_eq!(config.upload_visibility, Visibility::Unlisted);
        assert!(config.composition.program.is_none());
        assert_eq!(config.channels.len(), 2);
    }

    #[test]
    fn test_empty_channels_rejected() {
        let mut config = sample();
        config.channels.clear();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_duplicate_project_tag_rejected() {
        let mut config = sample();
        config.channels.push(config.channels[0].clone());
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = AppConfig::load(Path::new("/nonexistent/adrescue.json")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
