//! Schema reference parsing.
//!
//! A reference is any string that parses as a URI. Only two shapes are
//! accepted: a local path (no scheme or `file`, no host, non-empty path) and
//! an `http`/`https` URL.

use std::fmt;
use std::path::PathBuf;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::ResolveError;

/// A classified schema reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaReference {
    /// Path to open relative to the resolver's working directory.
    Local(PathBuf),
    /// HTTP or HTTPS URL to fetch.
    Remote(Url),
}

impl SchemaReference {
    /// Parse and classify a reference string.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::InvalidReference` if the string is not a URI,
    /// or if its scheme/host/path combination is not one of the accepted forms.
    pub fn parse(reference: &str) -> Result<Self, ResolveError> {
        if reference.chars().any(|c| c.is_ascii_control()) {
            return Err(ResolveError::invalid(
                reference,
                "contains control characters",
            ));
        }

        match Url::parse(reference) {
            Ok(url) => Self::from_absolute(reference, url),
            // No scheme: a bare path such as "schema.json" or "/specs/s.yaml"
            Err(url::ParseError::RelativeUrlWithoutBase) => Self::from_relative(reference),
            Err(source) => Err(ResolveError::InvalidReference {
                reference: reference.to_string(),
                reason: "not a valid URI".to_string(),
                source: Some(source),
            }),
        }
    }

    /// True for `http`/`https` references.
    pub fn is_remote(&self) -> bool {
        matches!(self, SchemaReference::Remote(_))
    }

    fn from_absolute(reference: &str, url: Url) -> Result<Self, ResolveError> {
        match url.scheme() {
            "http" | "https" => {
                if cfg!(feature = "remote") {
                    Ok(SchemaReference::Remote(url))
                } else {
                    Err(ResolveError::invalid(
                        reference,
                        "remote references require the `remote` feature",
                    ))
                }
            }
            "file" => {
                if url.host().is_some() {
                    return Err(ResolveError::invalid(
                        reference,
                        "file references must not name a host",
                    ));
                }
                let path = url.to_file_path().map_err(|()| {
                    ResolveError::invalid(reference, "file URL has no usable path")
                })?;
                if path.as_os_str().is_empty() {
                    return Err(ResolveError::invalid(reference, "empty path"));
                }
                Ok(SchemaReference::Local(path))
            }
            other => Err(ResolveError::invalid(
                reference,
                format!("unsupported scheme \"{}\": expected a file path or HTTP URL", other),
            )),
        }
    }

    fn from_relative(reference: &str) -> Result<Self, ResolveError> {
        // "//host/path" is a network-path reference: it names a host
        if reference.starts_with("//") {
            return Err(ResolveError::invalid(
                reference,
                "reference names a host but no scheme",
            ));
        }

        // Query and fragment are not part of the file name
        let end = reference.find(['?', '#']).unwrap_or(reference.len());
        let raw_path = &reference[..end];
        if raw_path.is_empty() {
            return Err(ResolveError::invalid(reference, "empty path"));
        }

        let path = decode_path(reference, raw_path)?;
        Ok(SchemaReference::Local(PathBuf::from(path)))
    }
}

/// Percent-decode a path, rejecting malformed escapes and non-UTF-8 results.
fn decode_path(reference: &str, raw_path: &str) -> Result<String, ResolveError> {
    let bytes = raw_path.as_bytes();
    for (i, _) in raw_path.match_indices('%') {
        let well_formed = bytes
            .get(i + 1..i + 3)
            .map_or(false, |hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(ResolveError::invalid(
                reference,
                format!("invalid percent escape at byte {}", i),
            ));
        }
    }

    percent_decode_str(raw_path)
        .decode_utf8()
        .map(|path| path.into_owned())
        .map_err(|_| ResolveError::invalid(reference, "decoded path is not valid UTF-8"))
}

impl fmt::Display for SchemaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaReference::Local(path) => write!(f, "{}", path.display()),
            SchemaReference::Remote(url) => write!(f, "{}", url),
        }
    }
}
