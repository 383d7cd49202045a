use super::bytecode::BytecodeScanner;
use super::classifier::classify;
use super::cleaner::WorkspaceCleaner;
use super::evidence::{collect_evidence, Evidence};
use super::framework::PlatformLabel;
use super::result::ClassificationResult;
use super::stager::ArchiveStager;
use super::workspace::{AnalysisTarget, Workspace};
use crate::error::AnalysisError;
use crate::fs::FileSystem;
use crate::tools::Disassembler;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerOptions {
    pub strict_extraction: bool,
    pub keep_workspace: bool,
}

/// Runs stage, extract, scan, collect and classify for one package, then cleans up
pub struct ApkAnalyzer {
    fs: Arc<dyn FileSystem>,
    scanner: BytecodeScanner,
    stager: ArchiveStager,
    cleaner: WorkspaceCleaner,
    options: AnalyzerOptions,
}

impl ApkAnalyzer {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        disassembler: Arc<dyn Disassembler>,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            scanner: BytecodeScanner::new(fs.clone(), disassembler),
            fs,
            stager: ArchiveStager::new(options.strict_extraction),
            cleaner: WorkspaceCleaner::new(),
            options,
        }
    }

    pub async fn analyze(
        &self,
        target: &AnalysisTarget,
    ) -> Result<ClassificationResult, AnalysisError> {
        let start = Instant::now();
        info!(target = %target, "Analyzing package");

        let outcome = self.run(target).await;

        let workspace = Workspace::for_target(target);
        if self.options.keep_workspace {
            info!(
                archive = %workspace.archive.display(),
                dir = %workspace.extraction_dir.display(),
                "Keeping workspace"
            );
        } else if let Err(e) = self.cleaner.clean(&workspace).await {
            warn!(target = %target, error = %e, "Workspace cleanup failed");
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let (label, evidence) = outcome?;

        info!(
            target = %target,
            label = %label,
            duration_ms = elapsed_ms,
            "Analysis complete"
        );

        Ok(ClassificationResult {
            target: target.clone(),
            label,
            evidence,
            elapsed_ms,
        })
    }

    async fn run(
        &self,
        target: &AnalysisTarget,
    ) -> Result<(PlatformLabel, Evidence), AnalysisError> {
        let step = Instant::now();
        let workspace = self.stager.stage(target).await?;
        let dir = self.stager.extract(&workspace).await?;
        debug!(duration_ms = step.elapsed().as_millis() as u64, "Staged and extracted");

        let step = Instant::now();
        let text = self.scanner.collect(&dir).await?;
        debug!(duration_ms = step.elapsed().as_millis() as u64, "Disassembled bytecode");

        let evidence = collect_evidence(self.fs.as_ref(), &text, &dir);
        let label = classify(&evidence);

        Ok((label, evidence))
    }
}
