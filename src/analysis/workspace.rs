use serde::{Serialize, Serializer};
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

const ARCHIVE_EXTENSION: &str = "zip";
const EXTRACTION_SUFFIX: &str = " - content";

/// A package path, made absolute once at the start of a run
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnalysisTarget(PathBuf);

impl AnalysisTarget {
    /// Anchors a relative path at the current working directory
    pub fn resolve(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if path.is_absolute() {
            Ok(Self(path.to_path_buf()))
        } else {
            Ok(Self(std::env::current_dir()?.join(path)))
        }
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for AnalysisTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl Serialize for AnalysisTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.display())
    }
}

/// On-disk scratch locations derived from a target path
///
/// `app.apk` stages to `app.zip` and extracts to `app - content`, both next to
/// the original package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub archive: PathBuf,
    pub extraction_dir: PathBuf,
    /// False when the target already was a zip and is used in place
    pub owns_archive: bool,
}

impl Workspace {
    pub fn for_target(target: &AnalysisTarget) -> Self {
        let path = target.path();
        let already_zip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
            .unwrap_or(false);

        let archive = if already_zip {
            path.to_path_buf()
        } else {
            path.with_extension(ARCHIVE_EXTENSION)
        };

        let mut dir: OsString = path.with_extension("").into_os_string();
        dir.push(EXTRACTION_SUFFIX);

        Self {
            owns_archive: !already_zip,
            archive,
            extraction_dir: PathBuf::from(dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(path: &str) -> AnalysisTarget {
        AnalysisTarget::resolve(path).unwrap()
    }

    #[test]
    fn test_workspace_paths() {
        let workspace = Workspace::for_target(&target("/data/apps/com.example.app.apk"));

        assert_eq!(workspace.archive, PathBuf::from("/data/apps/com.example.app.zip"));
        assert_eq!(
            workspace.extraction_dir,
            PathBuf::from("/data/apps/com.example.app - content")
        );
        assert!(workspace.owns_archive);
    }

    #[test]
    fn test_zip_target_is_not_owned() {
        let workspace = Workspace::for_target(&target("/data/apps/bundle.zip"));

        assert_eq!(workspace.archive, PathBuf::from("/data/apps/bundle.zip"));
        assert_eq!(workspace.extraction_dir, PathBuf::from("/data/apps/bundle - content"));
        assert!(!workspace.owns_archive);
    }

    #[test]
    fn test_uppercase_zip_target_is_not_owned() {
        let workspace = Workspace::for_target(&target("/data/apps/Bundle.ZIP"));

        assert_eq!(workspace.archive, PathBuf::from("/data/apps/Bundle.ZIP"));
        assert_eq!(workspace.extraction_dir, PathBuf::from("/data/apps/Bundle - content"));
        assert!(!workspace.owns_archive);
    }

    #[test]
    fn test_workspace_is_deterministic() {
        let t = target("/tmp/a.apk");
        assert_eq!(Workspace::for_target(&t), Workspace::for_target(&t));
    }

    #[test]
    fn test_relative_target_becomes_absolute() {
        let t = target("relative/app.apk");
        assert!(t.path().is_absolute());
        assert!(t.path().ends_with("relative/app.apk"));
    }
}
