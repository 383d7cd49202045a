//! apkpeel - cross-platform framework detection for Android packages
//!
//! Given an `.apk`, apkpeel stages it as a zip, extracts it, disassembles each
//! `classes*.dex` with `dexdump` and weighs two kinds of evidence per framework:
//! how often the framework is referenced in the bytecode, and how much of its
//! characteristic asset manifest is bundled. A two-round vote turns that into a
//! verdict of React Native, Flutter, Cordova/Ionic or native.
//!
//! # Example Usage
//!
//! ```no_run
//! use apkpeel::analysis::{AnalysisTarget, AnalyzerOptions, ApkAnalyzer};
//! use apkpeel::fs::RealFileSystem;
//! use apkpeel::tools::{Dexdump, ProcessRunner};
//! use apkpeel::ApkpeelConfig;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ApkpeelConfig::default();
//! let fs = Arc::new(RealFileSystem::new());
//! let toolchain = config.resolve_toolchain(fs.as_ref())?;
//!
//! let dexdump = Arc::new(Dexdump::new(toolchain.dexdump, Arc::new(ProcessRunner::new())));
//! let analyzer = ApkAnalyzer::new(fs, dexdump, AnalyzerOptions::default());
//!
//! let result = analyzer.analyze(&AnalysisTarget::resolve("app.apk")?).await?;
//! println!("{}: {}", result.target, result.label);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`analysis`]: staging, bytecode scan, evidence, classification and cleanup
//! - [`tools`]: `dexdump` and `adb` adapters behind a mockable process runner
//! - [`fs`]: read-only file system abstraction with a mock for tests
//! - [`config`]: SDK and toolchain resolution from the environment
//! - [`cli`]: argument parsing, handlers and output formatting

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod tools;
pub mod util;

pub use analysis::{
    AnalysisTarget, AnalyzerOptions, ApkAnalyzer, ClassificationResult, Evidence, EvidenceVector,
    FrameworkId, PlatformLabel, TargetReport,
};
pub use config::{ApkpeelConfig, ConfigError, HostPlatform, Toolchain};
pub use error::AnalysisError;
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
