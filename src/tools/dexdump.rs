//! `dexdump` adapter
//!
//! Disassembles a single `.dex` file into a text artifact next to it and hands the
//! artifact's contents back to the caller.

use super::runner::{check_output, ToolError, ToolRequest, ToolRunner};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Turns one bytecode file into disassembly text
#[async_trait]
pub trait Disassembler: Send + Sync {
    /// Disassemble `bytecode`, persisting the text to `artifact` and returning it
    async fn disassemble(&self, bytecode: &Path, artifact: &Path) -> Result<String, ToolError>;

    fn name(&self) -> &str;
}

pub struct Dexdump {
    executable: PathBuf,
    runner: Arc<dyn ToolRunner>,
}

impl Dexdump {
    pub fn new(executable: impl Into<PathBuf>, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            executable: executable.into(),
            runner,
        }
    }
}

#[async_trait]
impl Disassembler for Dexdump {
    async fn disassemble(&self, bytecode: &Path, artifact: &Path) -> Result<String, ToolError> {
        let mut request = ToolRequest::new(&self.executable).arg(bytecode);
        if let Some(dir) = bytecode.parent() {
            request = request.current_dir(dir);
        }

        let output = self.runner.run(&request).await?;
        let text = check_output(&request, output)?;

        tokio::fs::write(artifact, text).await.map_err(|e| {
            ToolError::io(format!("Failed to write {}", artifact.display()), e)
        })?;

        debug!(artifact = %artifact.display(), "Reading disassembly output");

        tokio::fs::read_to_string(artifact)
            .await
            .map_err(|e| ToolError::io(format!("Failed to read {}", artifact.display()), e))
    }

    fn name(&self) -> &str {
        "dexdump"
    }
}
