//! Package classification engine
//!
//! A package goes through [`stager::ArchiveStager`] (copy to `.zip`, unpack),
//! [`bytecode::BytecodeScanner`] (disassemble every `classes*.dex`),
//! [`evidence::collect_evidence`] (reference counts and asset scores) and
//! finally [`classifier::classify`]. [`pipeline::ApkAnalyzer`] drives those steps
//! and always hands the workspace to [`cleaner::WorkspaceCleaner`] afterwards.

pub mod batch;
pub mod bytecode;
pub mod classifier;
pub mod cleaner;
pub mod evidence;
pub mod framework;
pub mod pipeline;
pub mod result;
pub mod signatures;
pub mod stager;
pub mod workspace;

pub use batch::{resolve_targets, run_batch, TargetSource};
pub use bytecode::{BytecodeFile, BytecodeScanner, DisassemblyText, ScanControl, ScanStep};
pub use classifier::classify;
pub use cleaner::WorkspaceCleaner;
pub use evidence::{collect_evidence, Evidence, EvidenceVector};
pub use framework::{FrameworkId, PlatformLabel};
pub use pipeline::{AnalyzerOptions, ApkAnalyzer};
pub use result::{ClassificationResult, TargetReport};
pub use signatures::{signatures, ManifestEntry, Signature};
pub use stager::ArchiveStager;
pub use workspace::{AnalysisTarget, Workspace};
