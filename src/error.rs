use crate::config::ConfigError;
use crate::tools::ToolError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end the analysis of a single target
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to extract {}: {message}", archive.display())]
    Extraction { archive: PathBuf, message: String },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Dex file not found in {}", dir.display())]
    BytecodeNotFound { dir: PathBuf },

    #[error("No disassembly text was produced for any dex file")]
    EmptyDisassembly,
}

impl AnalysisError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Coarse error category reported alongside failed targets
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Io { .. } | Self::Extraction { .. } => "io",
            Self::Tool(_) => "external-tool",
            Self::BytecodeNotFound { .. } | Self::EmptyDisassembly => "missing-evidence",
        }
    }
}
