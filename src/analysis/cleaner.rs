use super::workspace::Workspace;
use crate::error::AnalysisError;
use std::io;
use tracing::debug;

/// Removes the staged archive and extraction directory of a run
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceCleaner;

impl WorkspaceCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Both removals are attempted; the first error is returned
    ///
    /// Paths that are already gone count as cleaned.
    pub async fn clean(&self, workspace: &Workspace) -> Result<(), AnalysisError> {
        let archive = if workspace.owns_archive {
            tolerate_missing(tokio::fs::remove_file(&workspace.archive).await).map_err(|e| {
                AnalysisError::io(
                    format!("Failed to remove {}", workspace.archive.display()),
                    e,
                )
            })
        } else {
            Ok(())
        };

        let dir = tolerate_missing(tokio::fs::remove_dir_all(&workspace.extraction_dir).await)
            .map_err(|e| {
                AnalysisError::io(
                    format!("Failed to remove {}", workspace.extraction_dir.display()),
                    e,
                )
            });

        debug!(dir = %workspace.extraction_dir.display(), "Workspace cleaned");
        archive.and(dir)
    }
}

fn tolerate_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::workspace::AnalysisTarget;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clean_never_created_workspace() {
        let temp = TempDir::new().unwrap();
        let target = AnalysisTarget::resolve(temp.path().join("ghost.apk")).unwrap();
        let workspace = Workspace::for_target(&target);

        assert!(WorkspaceCleaner::new().clean(&workspace).await.is_ok());
    }

    #[tokio::test]
    async fn test_clean_removes_archive_and_dir() {
        let temp = TempDir::new().unwrap();
        let apk = temp.path().join("app.apk");
        std::fs::write(&apk, b"apk").unwrap();
        let workspace = Workspace::for_target(&AnalysisTarget::resolve(&apk).unwrap());
        std::fs::write(&workspace.archive, b"zip").unwrap();
        std::fs::create_dir_all(workspace.extraction_dir.join("lib")).unwrap();

        WorkspaceCleaner::new().clean(&workspace).await.unwrap();

        assert!(apk.exists());
        assert!(!workspace.archive.exists());
        assert!(!workspace.extraction_dir.exists());
    }

    #[tokio::test]
    async fn test_clean_keeps_unowned_archive() {
        let temp = TempDir::new().unwrap();
        let zip = temp.path().join("bundle.zip");
        std::fs::write(&zip, b"zip").unwrap();
        let workspace = Workspace::for_target(&AnalysisTarget::resolve(&zip).unwrap());
        std::fs::create_dir_all(&workspace.extraction_dir).unwrap();

        WorkspaceCleaner::new().clean(&workspace).await.unwrap();

        assert!(zip.exists());
        assert!(!workspace.extraction_dir.exists());
    }

    #[tokio::test]
    async fn test_clean_keeps_uppercase_zip_target() {
        let temp = TempDir::new().unwrap();
        let zip = temp.path().join("Bundle.ZIP");
        std::fs::write(&zip, b"zip").unwrap();
        let workspace = Workspace::for_target(&AnalysisTarget::resolve(&zip).unwrap());
        std::fs::create_dir_all(&workspace.extraction_dir).unwrap();

        WorkspaceCleaner::new().clean(&workspace).await.unwrap();

        assert!(zip.exists());
        assert!(!workspace.extraction_dir.exists());
    }
}
