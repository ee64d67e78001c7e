//! Error types for schema resolution and decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while turning a reference into an open stream.
#[derive(Debug, Error)]
pub enum ResolveError {
    // Input errors (exit code 2)
    #[error("invalid schema reference {reference:?}: {reason}")]
    InvalidReference {
        reference: String,
        reason: String,
        #[source]
        source: Option<url::ParseError>,
    },

    // IO errors (exit code 3)
    #[error("failed to fetch {url}: HTTP status {status}")]
    FetchFailed { url: String, status: u16 },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    pub(crate) fn invalid(reference: &str, reason: impl Into<String>) -> Self {
        ResolveError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::InvalidReference { .. } => 2,
            _ => 3,
        }
    }

    /// True when an HTTP request was abandoned because its deadline passed.
    pub fn is_timeout(&self) -> bool {
        match self {
            #[cfg(feature = "remote")]
            ResolveError::Network { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of a rejected fetch, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ResolveError::FetchFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors while decoding a stream into a document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read schema stream: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
    },

    /// Re-encoding a normalized YAML tree as JSON failed. Indicates a
    /// normalization defect rather than bad input.
    #[error("failed to encode normalized YAML as JSON: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DecodeError::Read { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors from the combined resolve-then-decode entry points.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::Resolve(e) => e.exit_code(),
            LoadError::Decode(e) => e.exit_code(),
        }
    }
}
