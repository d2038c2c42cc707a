//! Disk I/O and file lifecycle for downloads.
//!
//! Bodies are written to a `.part` temp file next to the destination and
//! atomically renamed once verified, so the final name only ever holds a
//! complete, checked download.

mod writer;

pub use writer::StorageWriter;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `downloaded` → `downloaded.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
