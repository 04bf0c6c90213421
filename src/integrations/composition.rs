// src/integrations/composition.rs
//
// Background composition of replacement videos.
//
// Composition is an opaque, possibly slow, fallible external operation. The
// orchestrator treats a failure here as non-fatal and uploads the unmodified
// source asset instead.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::error::{AppError, AppResult};

/// Output orientation requested from the composition step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// Parameters handed to the composition step for every candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionRequest {
    pub orientation: Orientation,
    pub duration_seconds: u32,

    /// Style/disclaimer text burned into the output
    pub style: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompositionService: Send + Sync {
    /// Produce a composed output for the source asset and return its path.
    async fn compose(&self, source: PathBuf, request: CompositionRequest) -> AppResult<PathBuf>;
}

/// Composition via a configured external program.
///
/// Invoked as: `<program> <source> <output> <orientation> <duration> <style>`.
/// With no program configured every call fails, which the orchestrator
/// handles by falling back to the source asset.
pub struct CommandComposition {
    program: Option<String>,
    output_dir: PathBuf,
}

impl CommandComposition {
    pub fn new(program: Option<String>, output_dir: PathBuf) -> Self {
        Self {
            program,
            output_dir,
        }
    }

    fn output_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        self.output_dir
            .join(format!("{}_recomposed_{}.mp4", stem, timestamp))
    }
}

#[async_trait]
impl CompositionService for CommandComposition {
    async fn compose(&self, source: PathBuf, request: CompositionRequest) -> AppResult<PathBuf> {
        let program = self.program.as_ref().ok_or_else(|| {
            AppError::external("composition", "no composition program configured")
        })?;

        let output = self.output_path(&source);

        let status = Command::new(program)
            .arg(&source)
            .arg(&output)
            .arg(request.orientation.to_string())
            .arg(request.duration_seconds.to_string())
            .arg(&request.style)
            .status()
            .await
            .map_err(|e| AppError::external("composition", e))?;

        if !status.success() {
            return Err(AppError::external(
                "composition",
                format!("{} exited with {}", program, status),
            ));
        }

        if !output.is_file() {
            return Err(AppError::external(
                "composition",
                format!("{} produced no output at {}", program, output.display()),
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompositionRequest {
        CompositionRequest {
            orientation: Orientation::Horizontal,
            duration_seconds: 5,
            style: "results may vary".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_program_fails() {
        let dir = tempfile::tempdir().unwrap();
        let composition = CommandComposition::new(None, dir.path().to_path_buf());

        let err = composition
            .compose(PathBuf::from("source.mp4"), request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalService { .. }));
    }

    #[tokio::test]
    async fn test_missing_program_fails() {
        let dir = tempfile::tempdir().unwrap();
        let composition = CommandComposition::new(
            Some("/nonexistent/composer".to_string()),
            dir.path().to_path_buf(),
        );

        let err = composition
            .compose(PathBuf::from("source.mp4"), request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalService { .. }));
    }

    #[test]
    fn test_output_path_keeps_source_stem() {
        let composition =
            CommandComposition::new(Some("composer".to_string()), PathBuf::from("/outputs"));
        let output = composition.output_path(Path::new("/assets/NB/老後は考えるな.mp4"));

        let name = output.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("老後は考えるな_recomposed_"));
        assert!(name.ends_with(".mp4"));
        assert!(output.starts_with("/outputs"));
    }

    #[test]
    fn test_orientation_wire_form() {
        assert_eq!(Orientation::Horizontal.to_string(), "horizontal");
        assert_eq!(Orientation::Vertical.to_string(), "vertical");
    }
}
