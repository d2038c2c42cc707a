//! Version identifiers: which state of the resource is being referred to.
//!
//! On the wire a version is an object with an `etag` or a `sha1` key. In code
//! the "at most one key" rule is carried by [`Version`]; the materializer's
//! input and output, which may legitimately carry both, have their own types.

use serde::{Deserialize, Serialize};

/// Wire shape shared by every version type. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// A known version of the resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VersionFields", into = "VersionFields")]
pub enum Version {
    /// Server-assigned entity tag, compared byte for byte.
    Tag(String),
    /// Lowercase hex SHA-1 of the body.
    Hash(String),
    /// No previously known version.
    #[default]
    Unknown,
}

impl Version {
    pub fn etag(&self) -> Option<&str> {
        match self {
            Version::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn sha1(&self) -> Option<&str> {
        match self {
            Version::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Version::Unknown)
    }
}

/// A tag wins over a hash when both are present. Hashes are lowercased so
/// they compare equal to freshly computed digests.
impl From<VersionFields> for Version {
    fn from(fields: VersionFields) -> Self {
        match (non_empty(fields.etag), non_empty(fields.sha1)) {
            (Some(tag), _) => Version::Tag(tag),
            (None, Some(hash)) => Version::Hash(hash.to_ascii_lowercase()),
            (None, None) => Version::Unknown,
        }
    }
}

impl From<Version> for VersionFields {
    fn from(version: Version) -> Self {
        match version {
            Version::Tag(tag) => VersionFields {
                etag: Some(tag),
                sha1: None,
            },
            Version::Hash(hash) => VersionFields {
                etag: None,
                sha1: Some(hash),
            },
            Version::Unknown => VersionFields::default(),
        }
    }
}

/// What the caller expects to download. Either, both, or neither may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VersionFields", into = "VersionFields")]
pub struct ExpectedVersion {
    pub etag: Option<String>,
    pub sha1: Option<String>,
}

impl From<VersionFields> for ExpectedVersion {
    fn from(fields: VersionFields) -> Self {
        Self {
            etag: non_empty(fields.etag),
            sha1: non_empty(fields.sha1),
        }
    }
}

impl From<ExpectedVersion> for VersionFields {
    fn from(expected: ExpectedVersion) -> Self {
        Self {
            etag: expected.etag,
            sha1: expected.sha1,
        }
    }
}

impl From<Version> for ExpectedVersion {
    fn from(version: Version) -> Self {
        VersionFields::from(version).into()
    }
}

/// Everything observed while downloading: the digest always, the tag when
/// the server sent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub sha1: String,
}
