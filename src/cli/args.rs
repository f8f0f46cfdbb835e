//! Command-line argument parsing for the ragchat CLI.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ChatConfig;
use crate::models::{MAX_TOP_K, MIN_TOP_K};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Probe the backend
    Health,
    /// Upload a PDF
    Ingest { path: PathBuf },
    /// Ask a question (default)
    Ask { question: String },
}

/// Flags that override the environment configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub url: Option<String>,
    pub collection: Option<String>,
    pub doc_id: Option<String>,
    pub top_k: Option<u32>,
}

impl CliOptions {
    /// Layer these flags over `config`.
    pub fn apply(&self, config: ChatConfig) -> ChatConfig {
        let mut config = config;
        if let Some(url) = &self.url {
            config = config.with_base_url(url);
        }
        if let Some(collection) = &self.collection {
            config = config.with_collection(collection);
        }
        if let Some(doc_id) = &self.doc_id {
            config = config.with_doc_id(doc_id);
        }
        if let Some(top_k) = self.top_k {
            config = config.with_top_k(top_k);
        }
        config
    }
}

/// A full command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub command: CliCommand,
    pub options: CliOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("--top-k expects a number from 1 to 20, got '{0}'")]
    InvalidTopK(String),
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),
    #[error("no question given")]
    MissingQuestion,
}

pub const USAGE: &str = "\
Usage: ragchat [OPTIONS] <QUESTION>...
       ragchat [OPTIONS] --ingest <FILE>
       ragchat [OPTIONS] --health

Options:
      --url <URL>          Backend base URL [env: RAGCHAT_URL]
      --collection <NAME>  Vector collection [env: RAGCHAT_COLLECTION]
      --doc <ID>           Document id to answer from [env: RAGCHAT_DOC_ID]
      --top-k <N>          Chunks to retrieve, 1-20 [env: RAGCHAT_TOP_K]
  -h, --help               Print help
  -V, --version            Print version";

/// Parse command-line arguments.
///
/// The first item is the program name. Every word that is not a flag is
/// part of the question; `--` ends flag parsing.
///
/// # Examples
///
/// ```
/// use ragchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["ragchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap().command, CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<Cli, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut command = None;
    let mut words: Vec<String> = Vec::new();

    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(simple(CliCommand::Version)),
            "--help" | "-h" => return Ok(simple(CliCommand::Help)),
            "--health" => command = Some(CliCommand::Health),
            "--ingest" => {
                let path = value(&mut args, &arg)?;
                command = Some(CliCommand::Ingest {
                    path: PathBuf::from(path),
                });
            }
            "--url" => options.url = Some(value(&mut args, &arg)?),
            "--collection" => options.collection = Some(value(&mut args, &arg)?),
            "--doc" => options.doc_id = Some(value(&mut args, &arg)?),
            "--top-k" => {
                let raw = value(&mut args, &arg)?;
                match raw.parse::<u32>() {
                    Ok(top_k) if (MIN_TOP_K..=MAX_TOP_K).contains(&top_k) => {
                        options.top_k = Some(top_k)
                    }
                    _ => return Err(ArgsError::InvalidTopK(raw)),
                }
            }
            "--" => words.extend(args.by_ref()),
            flag if flag.starts_with("--") => {
                return Err(ArgsError::UnknownFlag(flag.to_string()))
            }
            _ => words.push(arg),
        }
    }

    let command = match command {
        Some(command) => command,
        None if words.is_empty() => return Err(ArgsError::MissingQuestion),
        None => CliCommand::Ask {
            question: words.join(" "),
        },
    };
    Ok(Cli { command, options })
}

fn simple(command: CliCommand) -> Cli {
    Cli {
        command,
        options: CliOptions::default(),
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, ArgsError> {
    args.next()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}
