use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use ragchat::cli::{parse_args, run_cli_command, version_line, CliCommand, USAGE};
use ragchat::config::ChatConfig;

const DEFAULT_LOG_FILTER: &str = "ragchat=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = match parse_args(std::env::args()) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    // Handle --version before any initialization
    if cli.command == CliCommand::Version {
        println!("{}", version_line());
        return Ok(());
    }

    color_eyre::install()?;
    init_tracing();

    let config = cli.options.apply(ChatConfig::from_env());
    tracing::debug!(base_url = %config.base_url, collection = %config.collection, "Configuration loaded");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_cli_command(cli.command, config))
}
