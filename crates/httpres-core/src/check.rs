//! Version resolution: has the resource changed since the last known version?
//!
//! A tagged previous version makes the request conditional. A response tag
//! always decides the outcome when present, without reading the body; only
//! untagged responses are fingerprinted with SHA-1.

use crate::checksum::Sha1Writer;
use crate::error::Result;
use crate::fetch::{BodyDisposition, BodySink, Fetcher, ResponseHead};
use crate::version::Version;

/// Hashes the body only when the response carries no entity tag.
#[derive(Default)]
struct DigestUntagged {
    digest: Sha1Writer,
}

impl BodySink for DigestUntagged {
    fn on_head(&mut self, head: &ResponseHead) -> Result<BodyDisposition> {
        if head.is_not_modified() || head.etag().is_some() {
            return Ok(BodyDisposition::Skip);
        }
        Ok(BodyDisposition::Read)
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.digest.update(chunk);
        Ok(())
    }
}

/// Returns the versions the caller should now consider known, oldest first.
///
/// The previous version, when known, is always the first entry. A second
/// entry is appended only when the resource changed.
pub fn check(fetcher: &Fetcher, previous: &Version) -> Result<Vec<Version>> {
    let mut versions = Vec::new();
    if !previous.is_unknown() {
        versions.push(previous.clone());
    }

    let mut sink = DigestUntagged::default();
    let head = fetcher.get(previous.etag(), &mut sink)?;

    if head.is_not_modified() {
        tracing::info!(url = fetcher.url(), "not modified");
        return Ok(versions);
    }

    let current = match head.etag() {
        Some(tag) => Version::Tag(tag.to_string()),
        None => Version::Hash(sink.digest.finish_hex()),
    };

    if current == *previous {
        tracing::info!(url = fetcher.url(), version = ?current, "unchanged");
        return Ok(versions);
    }

    tracing::info!(url = fetcher.url(), version = ?current, "new version");
    versions.push(current);
    Ok(versions)
}
