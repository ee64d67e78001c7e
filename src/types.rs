//! Core types shared by the resolver and decoder.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

/// Source encoding of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Parse a format name (case-insensitive).
    ///
    /// Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Detect the format from the extension of a reference's path.
    ///
    /// Only the path counts: query strings, fragments and URL hosts are
    /// ignored, so `https://example.com/s.yaml?rev=2` is YAML and
    /// `https://schemas.json` has no format.
    pub fn from_reference(reference: &str) -> Option<Self> {
        let path = match Url::parse(reference) {
            Ok(url) => url.path().to_string(),
            Err(_) => {
                let end = reference.find(['?', '#']).unwrap_or(reference.len());
                reference[..end].to_string()
            }
        };
        Path::new(&path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::parse)
    }

    /// Lowercase format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
