//! Locating and disassembling `classes*.dex` files
//!
//! Android splits bytecode across `classes.dex`, `classes2.dex`, `classes3.dex`
//! and so on. The scan walks that sequence from index 1 and stops at the first
//! gap. Each step is reduced to a [`ScanStep`], and [`ScanStep::control`] decides
//! whether the walk continues.

use crate::error::AnalysisError;
use crate::fs::FileSystem;
use crate::tools::{Disassembler, ToolError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One bytecode file and the text artifact its disassembly is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeFile {
    pub index: usize,
    pub path: PathBuf,
    pub artifact: PathBuf,
}

impl BytecodeFile {
    /// The `index`-th file in `dir`, counting from 1
    pub fn nth(dir: &Path, index: usize) -> Self {
        let suffix = if index <= 1 {
            String::new()
        } else {
            index.to_string()
        };

        Self {
            index,
            path: dir.join(format!("classes{}.dex", suffix)),
            artifact: dir.join(format!("dexdump{}.text", suffix)),
        }
    }
}

/// Outcome of looking at one index
#[derive(Debug)]
pub enum ScanStep {
    Disassembled(String),
    Failed(ToolError),
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    Finished,
    /// The primary bytecode file is absent
    Abort,
}

impl ScanStep {
    pub fn control(&self, index: usize) -> ScanControl {
        match self {
            Self::Missing if index <= 1 => ScanControl::Abort,
            Self::Missing => ScanControl::Finished,
            Self::Disassembled(_) | Self::Failed(_) => ScanControl::Continue,
        }
    }
}

/// Disassembly of every bytecode file, concatenated in index order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisassemblyText {
    buffer: String,
    chunks: usize,
}

impl DisassemblyText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &str) {
        self.buffer.push('\n');
        self.buffer.push_str(chunk);
        self.chunks += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }
}

pub struct BytecodeScanner {
    fs: Arc<dyn FileSystem>,
    disassembler: Arc<dyn Disassembler>,
}

impl BytecodeScanner {
    pub fn new(fs: Arc<dyn FileSystem>, disassembler: Arc<dyn Disassembler>) -> Self {
        Self { fs, disassembler }
    }

    async fn step(&self, file: &BytecodeFile) -> ScanStep {
        if !self.fs.is_file(&file.path) {
            return ScanStep::Missing;
        }

        let start = Instant::now();
        match self.disassembler.disassemble(&file.path, &file.artifact).await {
            Ok(text) => {
                debug!(
                    index = file.index,
                    bytes = text.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Disassembled {}",
                    file.path.display()
                );
                ScanStep::Disassembled(text)
            }
            Err(e) => ScanStep::Failed(e),
        }
    }

    /// Disassembles `classes.dex`, `classes2.dex`, ... under `dir`
    pub async fn collect(&self, dir: &Path) -> Result<DisassemblyText, AnalysisError> {
        let mut text = DisassemblyText::new();
        let mut index = 1;

        loop {
            let file = BytecodeFile::nth(dir, index);
            let step = self.step(&file).await;

            match step.control(index) {
                ScanControl::Abort => {
                    return Err(AnalysisError::BytecodeNotFound {
                        dir: dir.to_path_buf(),
                    })
                }
                ScanControl::Finished => break,
                ScanControl::Continue => {}
            }

            match step {
                ScanStep::Disassembled(chunk) => text.push(&chunk),
                ScanStep::Failed(e) => warn!(
                    index,
                    tool = self.disassembler.name(),
                    error = %e,
                    "Skipping {}",
                    file.path.display()
                ),
                ScanStep::Missing => {}
            }

            index += 1;
        }

        info!(
            files = index - 1,
            disassembled = text.chunks(),
            "Bytecode scan complete"
        );

        if text.is_blank() {
            return Err(AnalysisError::EmptyDisassembly);
        }

        Ok(text)
    }
}
