//! CLI parse and command tests.

use super::{normalize_args, Cli, CliCommand};
use clap::Parser;
use std::ffi::OsString;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

pub(super) fn os_args(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

mod commands;
