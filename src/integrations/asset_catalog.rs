// src/integrations/asset_catalog.rs
//
// Source-video catalog.
//
// The catalog holds the original creatives eligible to satisfy a parsed
// identifier, organized per project. Listing returns lightweight candidate
// descriptors; `fetch` stages the chosen asset on the local filesystem for
// composition and upload.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::AssetCandidate;
use crate::error::{AppError, AppResult};

/// Extensions recognized as video assets.
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];

#[cfg_attr(test, mockall::automock)]
pub trait AssetCatalog: Send + Sync {
    /// Candidate source videos for one project, in stable name order.
    fn list(&self, project_tag: &str) -> AppResult<Vec<AssetCandidate>>;

    /// Stage the candidate locally and return its path.
    fn fetch(&self, candidate: &AssetCandidate) -> AppResult<PathBuf>;
}

/// Catalog rooted at a local directory with one subdirectory per project
/// (e.g. `<root>/NB/`, `<root>/OM/`).
pub struct LocalDirCatalog {
    root: PathBuf,
}

impl LocalDirCatalog {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn is_video(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

impl AssetCatalog for LocalDirCatalog {
    fn list(&self, project_tag: &str) -> AppResult<Vec<AssetCandidate>> {
        let project_dir = self.root.join(project_tag);
        if !project_dir.is_dir() {
            log::warn!(
                "No catalog directory for project '{}' under {}",
                project_tag,
                self.root.display()
            );
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();
        for entry in WalkDir::new(&project_dir).max_depth(1) {
            let entry = entry.map_err(|e| AppError::external("asset catalog", e))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !Self::is_video(path) {
                continue;
            }

            let display_name = entry.file_name().to_string_lossy().into_owned();
            let size_bytes = entry
                .metadata()
                .map(|m| m.len())
                .map_err(|e| AppError::external("asset catalog", e))?;

            candidates.push(AssetCandidate {
                id: path.to_string_lossy().into_owned(),
                display_name,
                size_bytes,
            });
        }

        candidates.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(candidates)
    }

    fn fetch(&self, candidate: &AssetCandidate) -> AppResult<PathBuf> {
        let path = PathBuf::from(&candidate.id);
        if !path.is_file() {
            return Err(AppError::external(
                "asset catalog",
                format!("asset disappeared: {}", path.display()),
            ));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn catalog_with_files(files: &[(&str, &str)]) -> (tempfile::TempDir, LocalDirCatalog) {
        let dir = tempfile::tempdir().unwrap();
        for (project, name) in files {
            let project_dir = dir.path().join(project);
            fs::create_dir_all(&project_dir).unwrap();
            fs::write(project_dir.join(name), b"video-bytes").unwrap();
        }
        let catalog = LocalDirCatalog::new(dir.path().to_path_buf());
        (dir, catalog)
    }

    #[test]
    fn test_list_filters_to_videos_and_sorts() {
        let (_dir, catalog) = catalog_with_files(&[
            ("NB", "b_video.mp4"),
            ("NB", "a_video.MOV"),
            ("NB", "notes.txt"),
            ("OM", "other_project.mp4"),
        ]);

        let candidates = catalog.list("NB").unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["a_video.MOV", "b_video.mp4"]);
        assert!(candidates.iter().all(|c| c.size_bytes > 0));
    }

    #[test]
    fn test_missing_project_dir_is_empty() {
        let (_dir, catalog) = catalog_with_files(&[("NB", "a.mp4")]);
        assert!(catalog.list("RL").unwrap().is_empty());
    }

    #[test]
    fn test_fetch_returns_existing_path() {
        let (_dir, catalog) = catalog_with_files(&[("NB", "a.mp4")]);
        let candidates = catalog.list("NB").unwrap();

        let path = catalog.fetch(&candidates[0]).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_fetch_missing_asset_is_error() {
        let (_dir, catalog) = catalog_with_files(&[]);
        let gone = AssetCandidate {
            id: "/nonexistent/gone.mp4".to_string(),
            display_name: "gone.mp4".to_string(),
            size_bytes: 0,
        };
        assert!(matches!(
            catalog.fetch(&gone),
            Err(AppError::ExternalService { .. })
        ));
    }
}
