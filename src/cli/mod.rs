//! CLI module for ragchat.
//!
//! This module provides the command-line front end:
//! - Argument parsing
//! - Version display
//! - Running a command against the backend and printing the result
//!
//! # Usage
//!
//! ```ignore
//! use ragchat::cli::{parse_args, run_cli_command};
//! use ragchat::config::ChatConfig;
//!
//! let cli = parse_args(std::env::args())?;
//! let config = cli.options.apply(ChatConfig::from_env());
//! runtime.block_on(run_cli_command(cli.command, config))?;
//! ```

pub mod args;
pub mod render;
pub mod version;

pub use args::{parse_args, ArgsError, Cli, CliCommand, CliOptions, USAGE};
pub use version::{version_line, VERSION};

use std::io::Write;
use std::path::Path;

use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use tokio::sync::mpsc;

use crate::client::RagClient;
use crate::config::ChatConfig;
use crate::session::ChatSession;
use crate::state::{SessionState, TurnUpdate};

/// Run a parsed command.
///
/// `Version` and `Help` only print. A failed turn is returned as an error so
/// the process exits non-zero; a cancelled one is not.
pub async fn run_cli_command(command: CliCommand, config: ChatConfig) -> Result<()> {
    match command {
        CliCommand::Version => println!("{}", version_line()),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Health => health(&config).await?,
        CliCommand::Ingest { path } => ingest(&config, &path).await?,
        CliCommand::Ask { question } => ask(&config, &question).await?,
    }
    Ok(())
}

async fn health(config: &ChatConfig) -> Result<()> {
    let client = RagClient::new(&config.base_url);
    let healthy = client.health_check().await?;
    println!("{}", render::format_health(client.base_url(), healthy));
    if !healthy {
        bail!("backend at {} is not healthy", client.base_url());
    }
    Ok(())
}

async fn ingest(config: &ChatConfig, path: &Path) -> Result<()> {
    let client = RagClient::new(&config.base_url);
    let ingested = client.ingest_file(path, &config.collection).await?;
    println!("{}", render::format_ingested(&ingested));
    Ok(())
}

async fn ask(config: &ChatConfig, question: &str) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session =
        ChatSession::new(RagClient::new(&config.base_url), config.scope()).with_updates(tx);

    let on_interrupt = session.clone();
    ctrlc::set_handler(move || {
        on_interrupt.cancel();
    })?;

    let handle = session.send(question)?;

    let mut stdout = std::io::stdout();
    while let Some(update) = rx.recv().await {
        match update {
            TurnUpdate::Delta { delta, .. } => {
                write!(stdout, "{}", delta)?;
                stdout.flush()?;
            }
            TurnUpdate::Finished { .. } => break,
            TurnUpdate::Started { .. } | TurnUpdate::Citations { .. } => {}
        }
    }
    writeln!(stdout)?;

    match handle.wait().await {
        SessionState::Completed => {
            print!("{}", render::format_sources(&session.citations()));
            Ok(())
        }
        SessionState::Cancelled => {
            eprintln!("{} cancelled", render::icons::WARNING);
            Ok(())
        }
        SessionState::Failed(reason) => Err(eyre!(reason)),
        state => Err(eyre!("turn ended in state {}", state.label())),
    }
}
