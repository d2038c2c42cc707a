//! Resource descriptor: what to fetch and how.
//!
//! Deserialized from the `source` object of every request. Immutable once
//! parsed; the fetcher validates it before any network activity.

mod duration;

pub use duration::parse_duration;

use crate::error::{ResourceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Header name to ordered values. Every value becomes its own header line.
pub type HeaderMap = BTreeMap<String, Vec<String>>;

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Absolute `http` or `https` URL of the resource.
    pub url: String,
    /// Overall request timeout (e.g. `"30s"`, `"5m"`). Empty or missing means
    /// the settings default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    /// Extra headers sent on every request, in addition to protocol defaults.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: HeaderMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,
}

impl Source {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            headers: HeaderMap::new(),
            basic_auth: None,
        }
    }

    /// Resolves the configured timeout, falling back to `default` when unset.
    pub fn timeout_or(&self, default: Duration) -> Result<Duration> {
        match self.timeout.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(value) => parse_duration(value).map_err(|reason| ResourceError::InvalidTimeout {
                value: value.to_string(),
                reason,
            }),
        }
    }

    /// Validated `(name, value)` pairs in header-map order, values in
    /// configured order. Values are passed through byte for byte.
    pub fn header_lines(&self) -> Result<Vec<(&str, &str)>> {
        let mut lines = Vec::new();
        for (name, values) in &self.headers {
            validate_header_name(name)?;
            for value in values {
                validate_header_value(name, value)?;
                lines.push((name.trim(), value.as_str()));
            }
        }
        Ok(lines)
    }
}

fn validate_header_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    let reason = if trimmed.is_empty() {
        Some("empty name")
    } else if trimmed
        .bytes()
        .any(|b| b == b':' || b.is_ascii_whitespace() || b.is_ascii_control())
    {
        Some("name contains ':', whitespace or control characters")
    } else {
        None
    };
    match reason {
        Some(r) => Err(ResourceError::InvalidHeader {
            name: name.to_string(),
            reason: r.to_string(),
        }),
        None => Ok(()),
    }
}

fn validate_header_value(name: &str, value: &str) -> Result<()> {
    if value.bytes().any(|b| b == b'\r' || b == b'\n' || b == 0) {
        return Err(ResourceError::InvalidHeader {
            name: name.to_string(),
            reason: "value contains CR, LF or NUL".to_string(),
        });
    }
    Ok(())
}
