//! Configuration management for apkpeel
//!
//! Toolchain locations and analysis switches are resolved once at startup from
//! environment variables with sensible defaults, then passed explicitly into the
//! analyzer. Nothing below reads the environment after that point.
//!
//! # Environment Variables
//!
//! - `APKPEEL_SDK_ROOT`: Android SDK root; falls back to `ANDROID_HOME`, then
//!   `ANDROID_SDK_ROOT`, then the per-OS default install location
//! - `APKPEEL_DEXDUMP`: explicit path to `dexdump` - default: newest `build-tools` entry
//! - `APKPEEL_ADB`: explicit path to `adb` - default: `<sdk>/platform-tools/adb`
//! - `APKPEEL_STRICT_EXTRACTION`: fail when unzipping fails (true|false) - default: "false"
//! - `APKPEEL_KEEP_WORKSPACE`: leave the staged zip and extracted tree behind - default: "false"
//! - `APKPEEL_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use apkpeel::ApkpeelConfig;
//! use apkpeel::fs::RealFileSystem;
//!
//! let config = ApkpeelConfig::default();
//! config.validate().expect("Invalid configuration");
//!
//! let toolchain = config.resolve_toolchain(&RealFileSystem::new()).expect("No dexdump");
//! println!("dexdump: {}", toolchain.dexdump.display());
//! ```

use crate::analysis::pipeline::AnalyzerOptions;
use crate::fs::FileSystem;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_STRICT_EXTRACTION: bool = false;
const DEFAULT_KEEP_WORKSPACE: bool = false;

const SDK_ROOT_VARS: [&str; 3] = ["APKPEEL_SDK_ROOT", "ANDROID_HOME", "ANDROID_SDK_ROOT"];
const BUILD_TOOLS_DIR: &str = "build-tools";
const PLATFORM_TOOLS_DIR: &str = "platform-tools";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No default SDK location is known for this OS and none was configured
    #[error("This operating system is not supported: {0}. Set APKPEEL_SDK_ROOT or APKPEEL_DEXDUMP")]
    UnsupportedPlatform(String),

    /// The home directory could not be determined
    #[error("Could not determine the home directory to locate the Android SDK")]
    MissingHomeDirectory,

    /// The SDK has no usable build-tools installed
    #[error("No Android SDK build-tools installed in {}", .0.display())]
    NoBuildTools(PathBuf),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Host operating system, as far as SDK layout is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl HostPlatform {
    pub fn current() -> Self {
        Self::from_os(env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            other => Self::Other(other.to_string()),
        }
    }

    /// Platform-specific executable file name
    pub fn executable(&self, base: &str) -> String {
        match self {
            Self::Windows => format!("{}.exe", base),
            _ => base.to_string(),
        }
    }

    /// Default Android Studio SDK location under `home`
    pub fn default_sdk_root(&self, home: &Path) -> Result<PathBuf, ConfigError> {
        match self {
            Self::Windows => Ok(home.join("AppData").join("Local").join("Android").join("Sdk")),
            Self::MacOs => Ok(home.join("Library").join("Android").join("sdk")),
            Self::Linux => Ok(home.join("Android").join("Sdk")),
            Self::Other(name) => Err(ConfigError::UnsupportedPlatform(name.clone())),
        }
    }
}

/// Resolved external tool locations used by analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub dexdump: PathBuf,
}

/// Main configuration structure for apkpeel
#[derive(Debug, Clone)]
pub struct ApkpeelConfig {
    /// Host platform, used for SDK layout and executable names
    pub platform: HostPlatform,

    /// Home directory used to derive the default SDK root
    pub home_dir: Option<PathBuf>,

    /// Explicit SDK root
    pub sdk_root: Option<PathBuf>,

    /// Explicit dexdump executable
    pub dexdump_path: Option<PathBuf>,

    /// Explicit adb executable
    pub adb_path: Option<PathBuf>,

    /// Propagate extraction failures instead of continuing with a partial tree
    pub strict_extraction: bool,

    /// Skip workspace cleanup after analysis
    pub keep_workspace: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ApkpeelConfig {
    /// Loads configuration from `APKPEEL_*` environment variables with defaults
    fn default() -> Self {
        let sdk_root = SDK_ROOT_VARS
            .iter()
            .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()))
            .map(PathBuf::from);

        let dexdump_path = env::var("APKPEEL_DEXDUMP")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let adb_path = env::var("APKPEEL_ADB")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let strict_extraction = env::var("APKPEEL_STRICT_EXTRACTION")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_STRICT_EXTRACTION);

        let keep_workspace = env::var("APKPEEL_KEEP_WORKSPACE")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_KEEP_WORKSPACE);

        let log_level = env::var("APKPEEL_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            platform: HostPlatform::current(),
            home_dir: dirs::home_dir(),
            sdk_root,
            dexdump_path,
            adb_path,
            strict_extraction,
            keep_workspace,
            log_level,
        }
    }
}

impl ApkpeelConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(path) = &self.dexdump_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "dexdump path must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Applies the global logging flags over the environment level
    ///
    /// An explicit level wins, then `verbose` (debug), then `quiet` (error).
    pub fn apply_cli_log_level(&mut self, log_level: Option<&str>, verbose: bool, quiet: bool) {
        if let Some(level) = log_level {
            self.log_level = level.to_lowercase();
        } else if verbose {
            self.log_level = "debug".to_string();
        } else if quiet {
            self.log_level = "error".to_string();
        }
    }

    /// SDK root: explicit setting first, then the platform default
    pub fn sdk_root(&self) -> Result<PathBuf, ConfigError> {
        if let Some(root) = &self.sdk_root {
            return Ok(root.clone());
        }

        let home = self
            .home_dir
            .as_deref()
            .ok_or(ConfigError::MissingHomeDirectory)?;
        self.platform.default_sdk_root(home)
    }

    /// Resolves the dexdump executable, picking the newest installed build-tools
    pub fn resolve_toolchain(&self, fs: &dyn FileSystem) -> Result<Toolchain, ConfigError> {
        if let Some(dexdump) = &self.dexdump_path {
            return Ok(Toolchain {
                dexdump: dexdump.clone(),
            });
        }

        let build_tools = self.sdk_root()?.join(BUILD_TOOLS_DIR);
        let latest = latest_build_tools(fs, &build_tools)?;
        let dexdump = latest.join(self.platform.executable("dexdump"));

        debug!(dexdump = %dexdump.display(), "Resolved dexdump");
        Ok(Toolchain { dexdump })
    }

    /// Resolves the adb executable
    pub fn adb_executable(&self) -> Result<PathBuf, ConfigError> {
        if let Some(adb) = &self.adb_path {
            return Ok(adb.clone());
        }

        Ok(self
            .sdk_root()?
            .join(PLATFORM_TOOLS_DIR)
            .join(self.platform.executable("adb")))
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            strict_extraction: self.strict_extraction,
            keep_workspace: self.keep_workspace,
        }
    }
}

impl fmt::Display for ApkpeelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Apkpeel Configuration:")?;
        writeln!(f, "  Platform: {:?}", self.platform)?;
        if let Some(ref root) = self.sdk_root {
            writeln!(f, "  SDK Root: {}", root.display())?;
        }
        if let Some(ref dexdump) = self.dexdump_path {
            writeln!(f, "  Dexdump: {}", dexdump.display())?;
        }
        if let Some(ref adb) = self.adb_path {
            writeln!(f, "  Adb: {}", adb.display())?;
        }
        writeln!(f, "  Strict Extraction: {}", self.strict_extraction)?;
        writeln!(f, "  Keep Workspace: {}", self.keep_workspace)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

/// Picks the highest-versioned directory inside `build_tools`
pub fn latest_build_tools(fs: &dyn FileSystem, build_tools: &Path) -> Result<PathBuf, ConfigError> {
    let entries = fs
        .read_dir(build_tools)
        .map_err(|_| ConfigError::NoBuildTools(build_tools.to_path_buf()))?;

    entries
        .into_iter()
        .filter(|entry| entry.is_dir())
        .max_by(|a, b| {
            version_key(a.file_name())
                .cmp(&version_key(b.file_name()))
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .map(|entry| entry.path)
        .ok_or_else(|| ConfigError::NoBuildTools(build_tools.to_path_buf()))
}

/// Numeric components of a build-tools directory name ("34.0.0-rc1" -> [34, 0, 0])
fn version_key(name: &str) -> Vec<u64> {
    name.split(|c: char| !c.is_ascii_digit())
        .take_while(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn config_for(platform: HostPlatform) -> ApkpeelConfig {
        ApkpeelConfig {
            platform,
            home_dir: Some(PathBuf::from("/home/dev")),
            sdk_root: None,
            dexdump_path: None,
            adb_path: None,
            strict_extraction: false,
            keep_workspace: false,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("APKPEEL_SDK_ROOT"),
            EnvGuard::unset("ANDROID_HOME"),
            EnvGuard::unset("ANDROID_SDK_ROOT"),
            EnvGuard::unset("APKPEEL_DEXDUMP"),
            EnvGuard::unset("APKPEEL_ADB"),
            EnvGuard::unset("APKPEEL_STRICT_EXTRACTION"),
            EnvGuard::unset("APKPEEL_KEEP_WORKSPACE"),
            EnvGuard::set("APKPEEL_LOG_LEVEL", DEFAULT_LOG_LEVEL),
        ];

        let config = ApkpeelConfig::default();

        assert_eq!(config.platform, HostPlatform::current());
        assert!(config.sdk_root.is_none());
        assert!(config.dexdump_path.is_none());
        assert!(!config.strict_extraction);
        assert!(!config.keep_workspace);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("APKPEEL_SDK_ROOT", "/opt/android-sdk"),
            EnvGuard::set("ANDROID_HOME", "/ignored"),
            EnvGuard::set("APKPEEL_DEXDUMP", "/usr/bin/dexdump"),
            EnvGuard::set("APKPEEL_ADB", "/usr/bin/adb"),
            EnvGuard::set("APKPEEL_STRICT_EXTRACTION", "true"),
            EnvGuard::set("APKPEEL_KEEP_WORKSPACE", "true"),
            EnvGuard::set("APKPEEL_LOG_LEVEL", "DEBUG"),
        ];

        let config = ApkpeelConfig::default();

        assert_eq!(config.sdk_root, Some(PathBuf::from("/opt/android-sdk")));
        assert_eq!(config.dexdump_path, Some(PathBuf::from("/usr/bin/dexdump")));
        assert_eq!(config.adb_path, Some(PathBuf::from("/usr/bin/adb")));
        assert!(config.strict_extraction);
        assert!(config.keep_workspace);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_android_home_fallback() {
        let _guards = vec![
            EnvGuard::unset("APKPEEL_SDK_ROOT"),
            EnvGuard::set("ANDROID_HOME", "/sdk/from/android-home"),
        ];

        let config = ApkpeelConfig::default();
        assert_eq!(config.sdk_root, Some(PathBuf::from("/sdk/from/android-home")));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = config_for(HostPlatform::Linux);
        config.log_level = "verbose".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed(_)));
    }

    #[test]
    fn test_cli_log_level_replaces_environment_level() {
        let mut config = config_for(HostPlatform::Linux);
        config.log_level = "verbose".to_string();

        config.apply_cli_log_level(Some("DEBUG"), false, true);
        assert_eq!(config.log_level, "debug");
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        config.apply_cli_log_level(None, true, false);
        assert_eq!(config.log_level, "debug");

        config.log_level = "verbose".to_string();
        config.apply_cli_log_level(None, false, true);
        assert_eq!(config.log_level, "error");
    }

    #[test]
    fn test_cli_log_level_keeps_environment_level_without_flags() {
        let mut config = config_for(HostPlatform::Linux);
        config.log_level = "warn".to_string();

        config.apply_cli_log_level(None, false, false);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_validation_valid() {
        assert!(config_for(HostPlatform::MacOs).validate().is_ok());
    }

    #[test]
    fn test_default_sdk_roots() {
        let home = Path::new("/home/dev");
        assert_eq!(
            HostPlatform::MacOs.default_sdk_root(home).unwrap(),
            PathBuf::from("/home/dev/Library/Android/sdk")
        );
        assert_eq!(
            HostPlatform::Linux.default_sdk_root(home).unwrap(),
            PathBuf::from("/home/dev/Android/Sdk")
        );
        assert!(HostPlatform::Windows
            .default_sdk_root(home)
            .unwrap()
            .ends_with("AppData/Local/Android/Sdk"));
    }

    #[test]
    fn test_unsupported_platform() {
        let config = config_for(HostPlatform::from_os("freebsd"));

        let err = config.resolve_toolchain(&MockFileSystem::new()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedPlatform(ref os) if os == "freebsd"));
    }

    #[test]
    fn test_unsupported_platform_with_override() {
        let mut config = config_for(HostPlatform::from_os("freebsd"));
        config.dexdump_path = Some(PathBuf::from("/usr/local/bin/dexdump"));

        let toolchain = config.resolve_toolchain(&MockFileSystem::new()).unwrap();
        assert_eq!(toolchain.dexdump, PathBuf::from("/usr/local/bin/dexdump"));
    }

    #[test]
    fn test_resolve_picks_newest_build_tools() {
        let fs = MockFileSystem::new();
        let build_tools = "/home/dev/Android/Sdk/build-tools";
        fs.add_dir(format!("{}/29.0.3", build_tools));
        fs.add_dir(format!("{}/34.0.0", build_tools));
        fs.add_dir(format!("{}/9.0.0", build_tools));
        fs.add_dir(format!("{}/33.0.2", build_tools));
        fs.add_file(format!("{}/README", build_tools));

        let toolchain = config_for(HostPlatform::Linux)
            .resolve_toolchain(&fs)
            .unwrap();

        assert_eq!(
            toolchain.dexdump,
            PathBuf::from("/home/dev/Android/Sdk/build-tools/34.0.0/dexdump")
        );
    }

    #[test]
    fn test_resolve_windows_executable_name() {
        let fs = MockFileSystem::new();
        let mut config = config_for(HostPlatform::Windows);
        config.sdk_root = Some(PathBuf::from("/sdk"));
        fs.add_dir("/sdk/build-tools/30.0.3");

        let toolchain = config.resolve_toolchain(&fs).unwrap();
        assert_eq!(
            toolchain.dexdump,
            PathBuf::from("/sdk/build-tools/30.0.3/dexdump.exe")
        );
    }

    #[test]
    fn test_resolve_without_build_tools() {
        let fs = MockFileSystem::new();
        fs.add_dir("/home/dev/Android/Sdk/build-tools");

        let err = config_for(HostPlatform::Linux)
            .resolve_toolchain(&fs)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoBuildTools(_)));

        let err = config_for(HostPlatform::MacOs)
            .resolve_toolchain(&MockFileSystem::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoBuildTools(_)));
    }

    #[test]
    fn test_missing_home_directory() {
        let mut config = config_for(HostPlatform::Linux);
        config.home_dir = None;

        assert!(matches!(
            config.sdk_root().unwrap_err(),
            ConfigError::MissingHomeDirectory
        ));
    }

    #[test]
    fn test_adb_executable() {
        let mut config = config_for(HostPlatform::Linux);
        config.sdk_root = Some(PathBuf::from("/sdk"));
        assert_eq!(
            config.adb_executable().unwrap(),
            PathBuf::from("/sdk/platform-tools/adb")
        );

        config.adb_path = Some(PathBuf::from("/usr/bin/adb"));
        assert_eq!(config.adb_executable().unwrap(), PathBuf::from("/usr/bin/adb"));
    }

    #[test]
    fn test_version_key() {
        assert_eq!(version_key("34.0.0"), vec![34, 0, 0]);
        assert_eq!(version_key("34.0.0-rc1"), vec![34, 0, 0]);
        assert!(version_key("34.0.0") > version_key("9.0.0"));
        assert!(version_key("preview").is_empty());
    }

    #[test]
    fn test_analyzer_options() {
        let mut config = config_for(HostPlatform::Linux);
        config.strict_extraction = true;

        let options = config.analyzer_options();
        assert!(options.strict_extraction);
        assert!(!options.keep_workspace);
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", config_for(HostPlatform::Linux));
        assert!(display.contains("Apkpeel Configuration"));
        assert!(display.contains("Log Level: info"));
    }
}
