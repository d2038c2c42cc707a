//! Request and response payloads exchanged with the CI orchestrator.
//!
//! Requests arrive as JSON on stdin, responses leave as JSON on stdout. Field
//! names follow the orchestrator's resource protocol.

use crate::source::Source;
use crate::version::{ExpectedVersion, ObservedVersion, Version};
use serde::{Deserialize, Serialize};

/// Input of `check`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckRequest {
    pub source: Source,
    /// Last version the orchestrator knows; `null` or absent on first check.
    #[serde(default)]
    pub version: Option<Version>,
}

/// Output of `check`: known versions, oldest first.
pub type CheckResponse = Vec<Version>;

/// Input of `in`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InRequest {
    pub source: Source,
    #[serde(default)]
    pub version: Option<ExpectedVersion>,
    /// Accepted for protocol compatibility; no parameters are used.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// One `name`/`value` metadata entry shown by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

impl MetadataField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Output of `in` (and, were it implemented, of `out`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InResponse {
    pub version: ObservedVersion,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataField>,
}

pub type OutResponse = InResponse;
