use apkpeel::cli::commands::{CliArgs, Commands};
use apkpeel::cli::handlers::{handle_analyze, handle_device, print_help, LogFlags};
use apkpeel::util::logging::{init_logging, LoggingConfig};
use apkpeel::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_cli(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("apkpeel v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Some(Commands::Analyze(analyze_args)) => {
            let log_flags = LogFlags {
                log_level: args.log_level.as_deref(),
                verbose: args.verbose,
                quiet: args.quiet,
            };
            handle_analyze(analyze_args, log_flags).await
        }
        Some(Commands::Device(device_args)) => handle_device(device_args).await,
        None => {
            print_help();
            0
        }
    };

    std::process::exit(exit_code);
}
