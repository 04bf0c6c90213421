// src/infrastructure/workspace.rs
//
// Per-run working directories.
//
// CRITICAL RULES:
// - One workspace per batch run
// - Catalog assets are NEVER modified; composition writes here
// - Cleanup requires explicit confirmation

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Scratch space for one batch run: composed outputs land in `outputs/`.
#[derive(Debug, Clone)]
pub struct RecoveryWorkspace {
    /// Unique workspace identifier
    pub id: Uuid,

    base: PathBuf,
    root: PathBuf,
    outputs_dir: PathBuf,

    is_cleaned: bool,
}

impl RecoveryWorkspace {
    /// Create a fresh workspace under `base` (the system temp directory
    /// when not given).
    pub fn new(base: Option<PathBuf>) -> AppResult<Self> {
        let base = base.unwrap_or_else(|| std::env::temp_dir().join("adrescue"));
        let id = Uuid::new_v4();
        let root = base.join("runs").join(id.to_string());
        let outputs_dir = root.join("outputs");

        fs::create_dir_all(&outputs_dir).map_err(AppError::Io)?;

        Ok(Self {
            id,
            base,
            root,
            outputs_dir,
            is_cleaned: false,
        })
    }

    /// Directory for composed replacement outputs.
    pub fn outputs_dir(&self) -> &Path {
        &self.outputs_dir
    }

    pub fn is_valid(&self) -> bool {
        !self.is_cleaned && self.root.exists()
    }

    /// Remove the run directory and everything in it.
    ///
    /// CRITICAL: never touches anything outside the workspace base.
    pub fn cleanup(&mut self) -> AppResult<()> {
        if self.is_cleaned {
            return Ok(());
        }

        if !self.root.starts_with(&self.base) {
            return Err(AppError::Other(
                "Workspace root escaped its base directory".to_string(),
            ));
        }

        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(AppError::Io)?;
        }

        self.is_cleaned = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creates_output_dir() {
        let base = tempfile::tempdir().unwrap();
        let workspace = RecoveryWorkspace::new(Some(base.path().to_path_buf())).unwrap();

        assert!(workspace.is_valid());
        assert!(workspace.outputs_dir().is_dir());
        assert!(workspace.outputs_dir().starts_with(base.path()));
    }

    #[test]
    fn test_cleanup_removes_run_dir_and_is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        let mut workspace = RecoveryWorkspace::new(Some(base.path().to_path_buf())).unwrap();
        let outputs = workspace.outputs_dir().to_path_buf();

        workspace.cleanup().unwrap();
        assert!(!outputs.exists());
        assert!(!workspace.is_valid());

        workspace.cleanup().unwrap();
    }

    #[test]
    fn test_two_workspaces_do_not_collide() {
        let base = tempfile::tempdir().unwrap();
        let a = RecoveryWorkspace::new(Some(base.path().to_path_buf())).unwrap();
        let b = RecoveryWorkspace::new(Some(base.path().to_path_buf())).unwrap();
        assert_ne!(a.outputs_dir(), b.outputs_dir());
    }
}
