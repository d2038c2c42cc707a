//! Error type shared by every operation.
//!
//! All variants are fatal to the current invocation. `class()` groups them the
//! way callers report them (configuration, request, network, integrity,
//! storage, unimplemented).

use std::path::PathBuf;
use std::time::Duration;

/// Coarse classification of a [`ResourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed settings or timeout; raised before any network activity.
    Configuration,
    /// Malformed URL, header, or curl option.
    RequestConstruction,
    /// Connection failure, timeout, or unexpected HTTP status.
    Network,
    /// Observed ETag or SHA-1 differs from the expected one.
    IntegrityMismatch,
    /// Creating or writing the destination failed.
    Storage,
    /// The operation exists only to satisfy the protocol.
    Unimplemented,
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("failed to parse timeout {value:?}: {reason}")]
    InvalidTimeout { value: String, reason: String },

    #[error("invalid settings in {}: {reason}", .path.display())]
    Settings { path: PathBuf, reason: String },

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("failed to create request for {url}")]
    Request {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("failed to perform request to {url}")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout {
        url: String,
        timeout: Duration,
        #[source]
        source: curl::Error,
    },

    #[error("GET {url} returned HTTP {code}")]
    HttpStatus { url: String, code: u32 },

    #[error("unexpected ETag {}, expected {expected}", display_observed(.observed))]
    EtagMismatch {
        expected: String,
        observed: Option<String>,
    },

    #[error("unexpected SHA1 content hash {observed}, expected {expected}")]
    Sha1Mismatch { expected: String, observed: String },

    #[error("storage failure at {}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} is not implemented")]
    Unimplemented { operation: &'static str },
}

fn display_observed(observed: &Option<String>) -> &str {
    observed.as_deref().unwrap_or("(none)")
}

impl ResourceError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ResourceError::InvalidTimeout { .. } | ResourceError::Settings { .. } => {
                ErrorClass::Configuration
            }
            ResourceError::InvalidUrl { .. }
            | ResourceError::InvalidHeader { .. }
            | ResourceError::Request { .. } => ErrorClass::RequestConstruction,
            ResourceError::Network { .. }
            | ResourceError::Timeout { .. }
            | ResourceError::HttpStatus { .. } => ErrorClass::Network,
            ResourceError::EtagMismatch { .. } | ResourceError::Sha1Mismatch { .. } => {
                ErrorClass::IntegrityMismatch
            }
            ResourceError::Storage { .. } => ErrorClass::Storage,
            ResourceError::Unimplemented { .. } => ErrorClass::Unimplemented,
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResourceError::Storage {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ResourceError> = std::result::Result<T, E>;
