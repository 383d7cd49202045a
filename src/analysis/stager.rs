use super::workspace::{AnalysisTarget, Workspace};
use crate::error::AnalysisError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Copies a package to its zip form and unpacks it
#[derive(Debug, Clone, Default)]
pub struct ArchiveStager {
    strict: bool,
}

impl ArchiveStager {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Copies the target next to itself with a `.zip` extension
    pub async fn stage(&self, target: &AnalysisTarget) -> Result<Workspace, AnalysisError> {
        let workspace = Workspace::for_target(target);

        if workspace.owns_archive {
            tokio::fs::copy(target.path(), &workspace.archive)
                .await
                .map_err(|e| {
                    AnalysisError::io(
                        format!(
                            "Failed to copy {} to {}",
                            target,
                            workspace.archive.display()
                        ),
                        e,
                    )
                })?;
            debug!(archive = %workspace.archive.display(), "Staged archive");
        } else {
            debug!(archive = %workspace.archive.display(), "Target is already a zip, using in place");
        }

        Ok(workspace)
    }

    /// Unpacks the staged archive into the extraction directory
    ///
    /// Unless strict, a broken archive only logs a warning; whatever was written
    /// before the failure stays in place for the later steps.
    pub async fn extract(&self, workspace: &Workspace) -> Result<PathBuf, AnalysisError> {
        let dir = workspace.extraction_dir.clone();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AnalysisError::io(format!("Failed to create {}", dir.display()), e)
        })?;

        let archive = workspace.archive.clone();
        let target_dir = dir.clone();
        let outcome = tokio::task::spawn_blocking(move || unzip(&archive, &target_dir))
            .await
            .unwrap_or_else(|e| Err(format!("extraction task failed: {}", e)));

        match outcome {
            Ok(()) => {
                debug!(dir = %dir.display(), "Extracted archive");
                Ok(dir)
            }
            Err(message) if self.strict => Err(AnalysisError::Extraction {
                archive: workspace.archive.clone(),
                message,
            }),
            Err(message) => {
                warn!(
                    archive = %workspace.archive.display(),
                    error = %message,
                    "Extraction failed, continuing with partial contents"
                );
                Ok(dir)
            }
        }
    }
}

fn unzip(archive: &Path, dir: &Path) -> Result<(), String> {
    let file = File::open(archive).map_err(|e| e.to_string())?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;
    zip.extract(dir).map_err(|e| e.to_string())
}
