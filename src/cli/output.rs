//! Output formatting for analysis reports and device listings
//!
//! # Example
//!
//! ```ignore
//! use apkpeel::cli::output::{OutputFormat, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format_reports(&reports)?;
//! println!("{}", output);
//! ```

use anyhow::{Context, Result};

use crate::analysis::{ClassificationResult, FrameworkId, TargetReport};
use crate::tools::InstalledPackage;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats batch reports in input order
    pub fn format_reports(&self, reports: &[TargetReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(reports)
                .context("Failed to serialize analysis results to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(reports)
                .context("Failed to serialize analysis results to YAML"),
            OutputFormat::Human => Ok(self.format_reports_human(reports)),
        }
    }

    pub fn format_packages(&self, packages: &[InstalledPackage]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(packages)
                .context("Failed to serialize package list to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(packages)
                .context("Failed to serialize package list to YAML"),
            OutputFormat::Human => {
                let mut output = String::new();
                for package in packages {
                    output.push_str(&format!("{}  {}\n", package.name, package.apk_path));
                }
                if packages.is_empty() {
                    output.push_str("No third-party packages installed\n");
                }
                Ok(output)
            }
        }
    }

    fn format_reports_human(&self, reports: &[TargetReport]) -> String {
        reports
            .iter()
            .map(|report| match report {
                TargetReport::Classified(result) => format_result_human(result),
                TargetReport::Failed {
                    target,
                    category,
                    error,
                } => format!("Output: {}\nFailed ({}): {}\n", target, category, error),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn format_result_human(result: &ClassificationResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Output: {}\n", result.target));
    output.push_str(&format!("Estimated to be: {}\n\n", result.label.headline()));

    for id in FrameworkId::all() {
        let vector = result.evidence.get(*id);
        output.push_str(&format!(
            "{} references in dex-dump: {}\n",
            id.display_name(),
            vector.references
        ));
        output.push_str(&format!(
            "{} asset count: {:.2}%\n",
            id.display_name(),
            vector.asset_score
        ));
    }

    output.push_str(&format!("\nTook {}ms\n", result.elapsed_ms));
    output
}
