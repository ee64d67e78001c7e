//! Schema loading from references.
//!
//! Combines [`Resolver::open`] with the decoders. The stream opened for a
//! load is owned by the call and dropped before it returns, whether decoding
//! succeeded or not.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::decoder::decode_as;
use crate::error::LoadError;
use crate::resolver::Resolver;
use crate::types::Format;

impl Resolver {
    /// Load and decode a reference in the given format.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Resolve` if the reference cannot be opened, or
    /// `LoadError::Decode` if its content is not valid for `format`.
    pub fn load(&self, reference: &str, format: Format) -> Result<Value, LoadError> {
        self.load_as(reference, format)
    }

    /// Load and decode a reference into any deserializable type.
    pub fn load_as<T: DeserializeOwned>(
        &self,
        reference: &str,
        format: Format,
    ) -> Result<T, LoadError> {
        let stream = self.open(reference)?;
        debug!(origin = stream.origin(), %format, "decoding schema");
        let document = decode_as(stream, format)?;
        Ok(document)
    }

    /// Load a JSON schema.
    pub fn load_json(&self, reference: &str) -> Result<Value, LoadError> {
        self.load(reference, Format::Json)
    }

    /// Load a YAML schema.
    pub fn load_yaml(&self, reference: &str) -> Result<Value, LoadError> {
        self.load(reference, Format::Yaml)
    }

    /// Load a schema, picking the format from the reference's extension.
    ///
    /// References without a `.json`, `.yaml` or `.yml` extension are decoded
    /// as YAML, which also accepts most JSON documents.
    pub fn load_auto(&self, reference: &str) -> Result<Value, LoadError> {
        self.load(reference, detect_format(reference))
    }
}

/// Format used by the `auto` loaders for a reference.
pub fn detect_format(reference: &str) -> Format {
    Format::from_reference(reference).unwrap_or(Format::Yaml)
}

/// Load a schema relative to the current directory in the given format.
pub fn load(reference: &str, format: Format) -> Result<Value, LoadError> {
    Resolver::default().load(reference, format)
}

/// Load a JSON schema from a file path or URL.
///
/// # Errors
///
/// See [`Resolver::load`].
pub fn load_json(reference: &str) -> Result<Value, LoadError> {
    Resolver::default().load_json(reference)
}

/// Load a YAML schema from a file path or URL.
pub fn load_yaml(reference: &str) -> Result<Value, LoadError> {
    Resolver::default().load_yaml(reference)
}

/// Load a schema from a file path or URL, detecting the format.
pub fn load_auto(reference: &str) -> Result<Value, LoadError> {
    Resolver::default().load_auto(reference)
}
