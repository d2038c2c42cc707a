//! Checksum command: compute SHA-1 of a file.

use anyhow::{Context, Result};
use httpres_core::checksum;
use std::io::Write;
use std::path::Path;

/// Compute and print SHA-1 of the given file.
pub fn run_checksum<W: Write>(path: &Path, mut output: W) -> Result<()> {
    let digest =
        checksum::sha1_path(path).with_context(|| format!("failed to hash {}", path.display()))?;
    writeln!(output, "{}  {}", digest, path.display())?;
    Ok(())
}
