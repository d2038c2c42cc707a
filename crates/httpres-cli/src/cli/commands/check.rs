//! Check command: report new versions of the resource.

use anyhow::{Context, Result};
use httpres_core::config::Settings;
use httpres_core::protocol::{CheckRequest, CheckResponse};
use httpres_core::Fetcher;
use std::io::{Read, Write};

pub fn run_check<R: Read, W: Write>(settings: &Settings, input: R, mut output: W) -> Result<()> {
    let request: CheckRequest =
        serde_json::from_reader(input).context("failed to parse check request")?;
    let fetcher = Fetcher::new(&request.source, settings)?;
    let previous = request.version.unwrap_or_default();

    let versions: CheckResponse = httpres_core::check(&fetcher, &previous)?;

    serde_json::to_writer(&mut output, &versions).context("failed to write check response")?;
    writeln!(output)?;
    Ok(())
}
