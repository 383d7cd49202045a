//! `adb` adapter for pulling installed packages off a device

use super::runner::{check_output, ToolError, ToolRequest, ToolRunner};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const PACKAGE_PREFIX: &str = "package:";

/// A third-party package installed on the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledPackage {
    pub name: String,
    pub apk_path: String,
}

pub struct DeviceBridge {
    executable: PathBuf,
    runner: Arc<dyn ToolRunner>,
}

impl DeviceBridge {
    pub fn new(executable: impl Into<PathBuf>, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            executable: executable.into(),
            runner,
        }
    }

    async fn exec(&self, request: ToolRequest) -> Result<String, ToolError> {
        let output = self.runner.run(&request).await?;
        check_output(&request, output)
    }

    fn request(&self) -> ToolRequest {
        ToolRequest::new(&self.executable)
    }

    /// Resolves the on-device path of an installed package's base APK
    pub async fn installed_path(&self, package: &str) -> Result<String, ToolError> {
        let stdout = self
            .exec(self.request().args(["shell", "pm", "path", package]))
            .await?;

        let path = parse_package_path(&stdout).ok_or_else(|| ToolError::InvalidOutput {
            program: "adb".to_string(),
            message: format!("no path reported for package '{}'", package),
        })?;

        debug!(package, path = %path, "Resolved package path");
        Ok(path)
    }

    /// Copies a device-side file to `local`
    pub async fn pull(&self, device_path: &str, local: &Path) -> Result<String, ToolError> {
        info!(device_path, local = %local.display(), "Pulling package from device");
        self.exec(self.request().args(["pull", device_path]).arg(local))
            .await
    }

    /// Lists third-party packages with their APK paths
    pub async fn list_packages(&self) -> Result<Vec<InstalledPackage>, ToolError> {
        let stdout = self
            .exec(self.request().args(["shell", "pm", "list", "packages", "-f", "-3"]))
            .await?;
        Ok(parse_package_list(&stdout))
    }

    /// Resolves `package` and pulls it into `output`
    pub async fn extract(&self, package: &str, output: &Path) -> Result<String, ToolError> {
        let device_path = self.installed_path(package).await?;
        self.pull(&device_path, output).await
    }
}

/// First path from `pm path` output, without the `package:` prefix
pub fn parse_package_path(output: &str) -> Option<String> {
    let first = output.trim().lines().next()?.trim();
    let path = first.strip_prefix(PACKAGE_PREFIX).unwrap_or(first).trim();
    (!path.is_empty()).then(|| path.to_string())
}

/// Parses `pm list packages -f` lines of the form `package:<apk path>=<name>`
pub fn parse_package_list(output: &str) -> Vec<InstalledPackage> {
    output
        .lines()
        .filter_map(|line| {
            let entry = line.trim().strip_prefix(PACKAGE_PREFIX)?;
            let (apk_path, name) = entry.rsplit_once('=')?;
            Some(InstalledPackage {
                name: name.to_string(),
                apk_path: apk_path.to_string(),
            })
        })
        .collect()
}
