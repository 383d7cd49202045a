//! Narrow request/response interface over external command-line tools
//!
//! Both collaborators the analyzer talks to (`dexdump` and `adb`) are plain
//! processes: arguments in, text out. [`ToolRunner`] captures exactly that, so the
//! pipeline can run against [`super::MockToolRunner`] without spawning anything.
//!
//! A run counts as failed when the process exits with a non-zero status *or*
//! writes anything to stderr. See [`check_output`].

use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors produced while invoking an external tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// The process could not be started at all
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process exited unsuccessfully
    #[error("{program} exited with {}: {}", describe_code(.code), .stderr.trim())]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The process exited cleanly but wrote diagnostics to stderr
    #[error("{program} reported errors: {}", .stderr.trim())]
    Diagnostics { program: String, stderr: String },

    /// Reading or writing a tool artifact failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The tool succeeded but its output could not be interpreted
    #[error("Unexpected output from {program}: {message}")]
    InvalidOutput { program: String, message: String },
}

impl ToolError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

/// A single tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
}

impl ToolRequest {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Short program name for log and error messages
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// Everything a finished process reported, before the failure policy is applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RawOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, request: &ToolRequest) -> Result<RawOutput, ToolError>;
}

/// Applies the shared failure policy: non-zero exit or any stderr output fails the run.
pub fn check_output(request: &ToolRequest, output: RawOutput) -> Result<String, ToolError> {
    let program = request.program_name();

    if !output.success {
        return Err(ToolError::ExitStatus {
            program,
            code: output.code,
            stderr: output.stderr,
        });
    }

    if !output.stderr.is_empty() {
        return Err(ToolError::Diagnostics {
            program,
            stderr: output.stderr,
        });
    }

    Ok(output.stdout)
}

/// Runs tools as real child processes
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, request: &ToolRequest) -> Result<RawOutput, ToolError> {
        debug!(
            program = %request.program.display(),
            args = ?request.args,
            "Spawning tool"
        );

        let mut command = Command::new(&request.program);
        command
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &request.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|source| ToolError::Spawn {
            program: request.program_name(),
            source,
        })?;

        Ok(RawOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
