use super::pipeline::ApkAnalyzer;
use super::result::TargetReport;
use super::workspace::AnalysisTarget;
use crate::fs::FileSystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

const PACKAGE_EXTENSION: &str = "apk";

/// Where the packages to analyse come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    Files(Vec<PathBuf>),
    /// Every `*.apk` directly inside the directory
    Directory(PathBuf),
}

fn is_package(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PACKAGE_EXTENSION))
        .unwrap_or(false)
}

pub fn resolve_targets(fs: &dyn FileSystem, source: &TargetSource) -> Result<Vec<AnalysisTarget>> {
    let paths: Vec<PathBuf> = match source {
        TargetSource::Files(files) => files.clone(),
        TargetSource::Directory(dir) => {
            let mut packages: Vec<PathBuf> = fs
                .read_dir(dir)
                .with_context(|| format!("Failed to read directory {}", dir.display()))?
                .into_iter()
                .filter(|entry| entry.is_file() && is_package(entry.path()))
                .map(|entry| entry.path)
                .collect();
            packages.sort();
            info!(dir = %dir.display(), count = packages.len(), "Found packages");
            packages
        }
    };

    paths
        .iter()
        .map(|path| {
            AnalysisTarget::resolve(path)
                .with_context(|| format!("Failed to resolve {}", path.display()))
        })
        .collect()
}

/// Analyses targets one after another; a failing target does not stop the batch
pub async fn run_batch(analyzer: &ApkAnalyzer, targets: &[AnalysisTarget]) -> Vec<TargetReport> {
    let mut reports = Vec::with_capacity(targets.len());

    for target in targets {
        let report = match analyzer.analyze(target).await {
            Ok(result) => TargetReport::Classified(result),
            Err(e) => {
                error!(target = %target, category = e.category(), "Analysis failed: {}", e);
                TargetReport::failed(target.clone(), &e)
            }
        };
        reports.push(report);
    }

    reports
}
