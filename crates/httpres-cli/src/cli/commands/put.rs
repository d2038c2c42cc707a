//! Out command: publishing is not supported and always fails.

use anyhow::Result;
use std::path::Path;

pub fn run_out(dir: &Path) -> Result<()> {
    httpres_core::publish(dir)?;
    Ok(())
}
