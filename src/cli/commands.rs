use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Identify the cross-platform framework an Android package was built with
#[derive(Parser, Debug)]
#[command(
    name = "apkpeel",
    about = "Identify the cross-platform framework an Android package was built with",
    version,
    author,
    long_about = "apkpeel unpacks Android packages, disassembles their bytecode with dexdump \
                  and weighs framework fingerprints to tell React Native, Flutter and \
                  Cordova/Ionic apps apart from native ones."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Classify one or more packages",
        long_about = "Stages each package as a zip, extracts it, disassembles every \
                      classes*.dex and reports the most likely framework.\n\n\
                      Examples:\n  \
                      apkpeel analyze --file app.apk\n  \
                      apkpeel analyze --file a.apk,b.apk --format json\n  \
                      apkpeel analyze --directory ./apks"
    )]
    Analyze(AnalyzeArgs),

    #[command(about = "Work with packages installed on a connected device")]
    Device(DeviceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(
        short = 'f',
        long = "file",
        value_name = "APK",
        value_delimiter = ',',
        help = "Package to classify (repeatable, or comma separated)"
    )]
    pub files: Vec<PathBuf>,

    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        conflicts_with = "files",
        help = "Classify every .apk directly inside this directory"
    )]
    pub directory: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[arg(long, help = "Fail the package when its archive cannot be fully extracted")]
    pub strict_extraction: bool,

    #[arg(long, help = "Leave the staged zip and extracted files on disk")]
    pub keep_workspace: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

impl AnalyzeArgs {
    pub fn has_targets(&self) -> bool {
        !self.files.is_empty() || self.directory.is_some()
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DeviceCommand {
    #[command(about = "List third-party packages installed on the device")]
    List {
        #[arg(long, value_enum, default_value = "human", help = "Output format")]
        format: OutputFormatArg,
    },

    #[command(alias = "extract", about = "Copy an installed package to local disk")]
    Pull {
        #[arg(short = 'p', long, value_name = "ID", help = "Package name, e.g. com.example.app")]
        package: String,

        #[arg(short = 'o', long, value_name = "PATH", help = "Local destination for the .apk")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
