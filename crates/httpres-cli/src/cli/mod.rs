//! CLI for the httpres resource.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use httpres_core::config::{self, Settings};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use commands::{run_check, run_checksum, run_in, run_out};

/// Executable names that select an operation on their own.
const OPERATION_NAMES: [&str; 3] = ["check", "in", "out"];

/// Top-level CLI for the httpres resource.
#[derive(Debug, Parser)]
#[command(name = "httpres")]
#[command(about = "httpres: detect and fetch new versions of an HTTP resource", long_about = None)]
pub struct Cli {
    /// Settings file (default: ~/.config/httpres/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Report new versions of the resource. Reads the request as JSON on stdin.
    Check,

    /// Download the requested version into DIR. Reads the request as JSON on stdin.
    #[command(name = "in")]
    In {
        /// Destination directory; the body is written to DIR/downloaded.
        dir: PathBuf,
    },

    /// Publish the resource. Not supported; always fails.
    Out {
        /// Source directory supplied by the orchestrator.
        dir: PathBuf,
    },

    /// Compute SHA-1 of a file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

/// When invoked as `check`, `in` or `out` (e.g. `/opt/resource/check`), the
/// executable name becomes the sub-command.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();
    let operation = args
        .first()
        .and_then(|argv0| Path::new(argv0).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| OPERATION_NAMES.contains(name))
        .map(OsString::from);
    if let Some(op) = operation {
        args[0] = OsString::from("httpres");
        args.insert(1, op);
    }
    args
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("settings file {} does not exist", p.display());
            }
            Ok(config::load_from(p)?)
        }
        None => Ok(config::load()?),
    }
}

/// The single stderr line printed for a failed run, with the full cause chain.
pub fn error_report(err: &anyhow::Error) -> String {
    format!("httpres error: {:#}", err)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse_from(normalize_args(std::env::args_os()));
        let settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
        tracing::debug!("loaded settings: {:?}", settings);

        let stdin = std::io::stdin().lock();
        let stdout = std::io::stdout().lock();
        match cli.command {
            CliCommand::Check => run_check(&settings, stdin, stdout)?,
            CliCommand::In { dir } => run_in(&settings, &dir, stdin, stdout)?,
            CliCommand::Out { dir } => run_out(&dir)?,
            CliCommand::Checksum { path } => run_checksum(&path, stdout)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
