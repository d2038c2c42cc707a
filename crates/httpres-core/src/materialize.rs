//! Verified download of the current resource body.
//!
//! The body is written and hashed in one pass through a [`TeeWriter`]. An
//! expected ETag is checked before the first byte is written; an expected
//! SHA-1 is checked after the last. In the directory form the file only
//! receives its final name when both checks passed.

use crate::checksum::{Sha1Writer, TeeWriter};
use crate::error::{ResourceError, Result};
use crate::fetch::{BodyDisposition, BodySink, Fetcher, ResponseHead, WriteSink};
use crate::protocol::MetadataField;
use crate::storage::{self, StorageWriter};
use crate::version::{ExpectedVersion, ObservedVersion};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the single file written into the destination directory.
pub const DOWNLOAD_FILENAME: &str = "downloaded";

/// Outcome of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub version: ObservedVersion,
    pub content_type: Option<String>,
    pub bytes: u64,
}

impl Download {
    /// Metadata reported alongside the version. `content-type` is always
    /// present, empty when the server sent none.
    pub fn metadata(&self) -> Vec<MetadataField> {
        vec![MetadataField::new(
            "content-type",
            self.content_type.clone().unwrap_or_default(),
        )]
    }
}

/// Checks the entity tag on the head, then streams into the tee.
struct VerifyingSink<'a, W: Write> {
    url: &'a str,
    expected_etag: Option<&'a str>,
    observed_etag: Option<String>,
    content_type: Option<String>,
    inner: WriteSink<TeeWriter<W, Sha1Writer>>,
}

impl<W: Write> BodySink for VerifyingSink<'_, W> {
    fn on_head(&mut self, head: &ResponseHead) -> Result<BodyDisposition> {
        if head.is_not_modified() {
            return Err(ResourceError::HttpStatus {
                url: self.url.to_string(),
                code: head.status,
            });
        }
        let observed = head.etag();
        if let Some(expected) = self.expected_etag {
            if observed != Some(expected) {
                return Err(ResourceError::EtagMismatch {
                    expected: expected.to_string(),
                    observed: observed.map(str::to_string),
                });
            }
        }
        self.observed_etag = observed.map(str::to_string);
        self.content_type = head.content_type().map(str::to_string);
        self.inner.on_head(head)
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.inner.on_chunk(chunk)
    }
}

fn transfer<W: Write>(
    fetcher: &Fetcher,
    expected: &ExpectedVersion,
    dest: W,
    label: &Path,
) -> Result<Download> {
    let mut sink = VerifyingSink {
        url: fetcher.url(),
        expected_etag: expected.etag.as_deref(),
        observed_etag: None,
        content_type: None,
        inner: WriteSink::new(TeeWriter::new(dest, Sha1Writer::new()), label),
    };
    fetcher.get(None, &mut sink)?;

    let (mut dest, digest) = sink.inner.into_inner().into_inner();
    dest.flush().map_err(|e| ResourceError::storage(label, e))?;
    let bytes = digest.bytes();
    let sha1 = digest.finish_hex();

    if let Some(expected) = expected.sha1.as_deref() {
        if !expected.eq_ignore_ascii_case(&sha1) {
            return Err(ResourceError::Sha1Mismatch {
                expected: expected.to_string(),
                observed: sha1,
            });
        }
    }

    Ok(Download {
        version: ObservedVersion {
            etag: sink.observed_etag,
            sha1,
        },
        content_type: sink.content_type,
        bytes,
    })
}

/// Downloads into any writer. On error the writer may hold a partial body
/// and must not be trusted.
pub fn materialize_into<W: Write>(
    fetcher: &Fetcher,
    expected: &ExpectedVersion,
    dest: W,
) -> Result<Download> {
    transfer(fetcher, expected, dest, &PathBuf::from("<destination>"))
}

/// Downloads into `dir/downloaded`.
///
/// Bytes go to `downloaded.part` first; the rename happens only after every
/// check passed, and the temp file is removed on any failure.
pub fn materialize(fetcher: &Fetcher, expected: &ExpectedVersion, dir: &Path) -> Result<Download> {
    let final_path = dir.join(DOWNLOAD_FILENAME);
    let temp_path = storage::temp_path(&final_path);
    let mut writer = StorageWriter::create(&temp_path)?;

    let outcome = transfer(fetcher, expected, &mut writer, &temp_path).and_then(|download| {
        writer.sync()?;
        Ok(download)
    });

    match outcome {
        Ok(download) => {
            writer.finalize(&final_path)?;
            tracing::info!(
                url = fetcher.url(),
                path = %final_path.display(),
                bytes = download.bytes,
                sha1 = %download.version.sha1,
                "download complete"
            );
            Ok(download)
        }
        Err(e) => {
            tracing::warn!(
                url = fetcher.url(),
                bytes_written = writer.written(),
                "download failed: {}",
                e
            );
            writer.discard();
            Err(e)
        }
    }
}
