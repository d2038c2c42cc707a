//! In command: download the requested version into a directory.

use anyhow::{Context, Result};
use httpres_core::config::Settings;
use httpres_core::protocol::{InRequest, InResponse};
use httpres_core::Fetcher;
use std::io::{Read, Write};
use std::path::Path;

pub fn run_in<R: Read, W: Write>(
    settings: &Settings,
    dir: &Path,
    input: R,
    mut output: W,
) -> Result<()> {
    let request: InRequest = serde_json::from_reader(input).context("failed to parse in request")?;
    let fetcher = Fetcher::new(&request.source, settings)?;
    let expected = request.version.unwrap_or_default();

    let download = httpres_core::materialize(&fetcher, &expected, dir)
        .with_context(|| format!("failed to fetch {}", fetcher.url()))?;

    let response = InResponse {
        metadata: download.metadata(),
        version: download.version,
    };
    serde_json::to_writer(&mut output, &response).context("failed to write in response")?;
    writeln!(output)?;
    Ok(())
}
