//! SHA-1 content fingerprints and the fan-out writer used to compute them
//! while the body is being stored.
//!
//! Digests are always lowercase hex. Memory use is bounded by the caller's
//! buffer size; nothing here holds the whole body.

use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// `Write` sink that feeds every byte into a SHA-1 digest.
#[derive(Clone, Default)]
pub struct Sha1Writer {
    hasher: Sha1,
    bytes: u64,
}

impl Sha1Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.bytes += data.len() as u64;
    }

    /// Number of bytes hashed so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Consumes the writer and returns the digest as lowercase hex.
    pub fn finish_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl Write for Sha1Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes every chunk to `primary` and then to `secondary`.
///
/// A short or failed write on `primary` stops the chunk before `secondary`
/// sees it, so `secondary` never gets bytes `primary` did not accept.
pub struct TeeWriter<A, B> {
    primary: A,
    secondary: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.primary, self.secondary)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.primary.write(buf)?;
        self.secondary.write_all(&buf[..n])?;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}

/// SHA-1 of an in-memory buffer, lowercase hex.
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

/// Compute SHA-1 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha1_path(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Sha1Writer::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finish_hex())
}
