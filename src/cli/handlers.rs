//! Subcommand handlers
//!
//! Each handler returns the process exit code; `main` only parses arguments,
//! initialises logging and dispatches here.

use super::commands::{AnalyzeArgs, CliArgs, DeviceArgs, DeviceCommand};
use super::output::OutputFormatter;
use crate::analysis::{resolve_targets, run_batch, ApkAnalyzer, TargetReport, TargetSource};
use crate::config::ApkpeelConfig;
use crate::fs::{FileSystem, RealFileSystem};
use crate::tools::{DeviceBridge, Dexdump, ProcessRunner};
use anyhow::{Context, Result};
use clap::CommandFactory;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Global logging flags, applied over `APKPEEL_LOG_LEVEL` before validation
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFlags<'a> {
    pub log_level: Option<&'a str>,
    pub verbose: bool,
    pub quiet: bool,
}

pub async fn handle_analyze(args: &AnalyzeArgs, log_flags: LogFlags<'_>) -> i32 {
    if !args.has_targets() {
        print_subcommand_help("analyze");
        return 0;
    }

    match run_analyze(args, log_flags).await {
        Ok(reports) => {
            if reports.iter().any(TargetReport::is_failed) {
                1
            } else {
                0
            }
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

async fn run_analyze(args: &AnalyzeArgs, log_flags: LogFlags<'_>) -> Result<Vec<TargetReport>> {
    let start = Instant::now();

    let mut config = ApkpeelConfig::default();
    config.apply_cli_log_level(log_flags.log_level, log_flags.verbose, log_flags.quiet);
    config.strict_extraction |= args.strict_extraction;
    config.keep_workspace |= args.keep_workspace;
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());

    let source = match &args.directory {
        Some(dir) => TargetSource::Directory(dir.clone()),
        None => TargetSource::Files(args.files.clone()),
    };
    let targets = resolve_targets(fs.as_ref(), &source)?;

    let reports = if targets.is_empty() {
        info!("No packages to analyze");
        Vec::new()
    } else {
        let toolchain = config
            .resolve_toolchain(fs.as_ref())
            .context("Failed to locate dexdump")?;
        info!(dexdump = %toolchain.dexdump.display(), "Using disassembler");

        let dexdump = Arc::new(Dexdump::new(
            toolchain.dexdump,
            Arc::new(ProcessRunner::new()),
        ));
        let analyzer = ApkAnalyzer::new(fs.clone(), dexdump, config.analyzer_options());
        run_batch(&analyzer, &targets).await
    };

    let formatter = OutputFormatter::new(args.format.into());
    let output = formatter.format_reports(&reports)?;
    write_output(&output, args.output.as_deref())?;

    info!(
        targets = reports.len(),
        failed = reports.iter().filter(|r| r.is_failed()).count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Batch complete"
    );

    Ok(reports)
}

pub async fn handle_device(args: &DeviceArgs) -> i32 {
    match run_device(args).await {
        Ok(()) => 0,
        Err(e) => {
            error!("Device command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

async fn run_device(args: &DeviceArgs) -> Result<()> {
    let config = ApkpeelConfig::default();
    let adb = config.adb_executable().context("Failed to locate adb")?;
    debug!(adb = %adb.display(), "Using device bridge");

    let bridge = DeviceBridge::new(adb, Arc::new(ProcessRunner::new()));

    match &args.command {
        DeviceCommand::List { format } => {
            let packages = bridge
                .list_packages()
                .await
                .context("Failed to list installed packages")?;
            let formatter = OutputFormatter::new((*format).into());
            print!("{}", ensure_newline(formatter.format_packages(&packages)?));
        }
        DeviceCommand::Pull { package, output } => {
            let message = bridge
                .extract(package, output)
                .await
                .with_context(|| format!("Failed to pull package '{}'", package))?;
            debug!(adb_output = message.trim(), "Pull finished");
            println!("{} -> {}", package, output.display());
        }
    }

    Ok(())
}

fn write_output(output: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, ensure_newline(output.to_string()))
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!(path = %path.display(), "Wrote results");
        }
        None => print!("{}", ensure_newline(output.to_string())),
    }
    Ok(())
}

fn ensure_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Prints help for the top-level command or one of its subcommands
pub fn print_subcommand_help(name: &str) {
    let mut command = CliArgs::command();
    let result = match command.find_subcommand_mut(name) {
        Some(sub) => sub.print_help(),
        None => command.print_help(),
    };

    if let Err(e) = result {
        eprintln!("Failed to print help: {}", e);
    }
}

pub fn print_help() {
    if let Err(e) = CliArgs::command().print_help() {
        eprintln!("Failed to print help: {}", e);
    }
}
