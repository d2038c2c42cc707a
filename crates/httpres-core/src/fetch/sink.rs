//! Where a response body goes.

use super::ResponseHead;
use crate::error::{ResourceError, Result};
use std::io::Write;

/// Decision made once the response head is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyDisposition {
    /// Stream the body into [`BodySink::on_chunk`].
    Read,
    /// Stop the transfer without reading the body. Not an error.
    Skip,
}

/// Receives a single response, head first, then body chunks in order.
///
/// `on_head` is called exactly once per successful exchange, before any
/// chunk, including when the body is empty. An error from either method
/// aborts the transfer and is returned from [`super::Fetcher::get`].
pub trait BodySink {
    fn on_head(&mut self, head: &ResponseHead) -> Result<BodyDisposition>;
    fn on_chunk(&mut self, chunk: &[u8]) -> Result<()>;
}

/// Streams the body into any writer, reporting write failures as storage
/// errors against `label`.
pub struct WriteSink<W> {
    writer: W,
    label: std::path::PathBuf,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W, label: impl Into<std::path::PathBuf>) -> Self {
        Self {
            writer,
            label: label.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> BodySink for WriteSink<W> {
    fn on_head(&mut self, _head: &ResponseHead) -> Result<BodyDisposition> {
        Ok(BodyDisposition::Read)
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.writer
            .write_all(chunk)
            .map_err(|e| ResourceError::storage(&self.label, e))
    }
}
