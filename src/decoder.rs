//! Document decoding for JSON and YAML streams.
//!
//! Both formats end in the same JSON decoder: YAML is parsed, its keys are
//! normalized, and the tree is re-encoded as JSON text before the final
//! decode. Equivalent JSON and YAML input therefore produce identical
//! documents, and typed targets see the same serde attributes either way.

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::error::DecodeError;
use crate::normalize::normalize_keys;
use crate::types::Format;

/// Decode a JSON stream into a document.
///
/// The stream is read to its end but not closed.
///
/// # Errors
///
/// Returns `DecodeError::Json` if the content isn't valid JSON (the error
/// carries the line and column of the failure), or `DecodeError::Read` if
/// the stream itself fails.
pub fn decode_json<R: Read>(reader: R) -> Result<Value, DecodeError> {
    decode_json_as(reader)
}

/// Decode a JSON stream into any deserializable type.
pub fn decode_json_as<T, R>(reader: R) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    R: Read,
{
    let content = read_all(reader)?;
    decode_json_slice(&content)
}

fn decode_json_slice<T: DeserializeOwned>(content: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(content).map_err(|source| DecodeError::Json { source })
}

fn read_all<R: Read>(mut reader: R) -> Result<Vec<u8>, DecodeError> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .map_err(|source| DecodeError::Read { source })?;
    trace!(bytes = content.len(), "read schema stream");
    Ok(content)
}

/// Decode a YAML stream into a document.
///
/// Only the first YAML document of the stream is used; an empty stream
/// decodes to `null`.
///
/// # Errors
///
/// Returns `DecodeError::Yaml` if the content isn't valid YAML.
pub fn decode_yaml<R: Read>(reader: R) -> Result<Value, DecodeError> {
    decode_yaml_as(reader)
}

/// Decode a YAML stream into any deserializable type.
///
/// See [`decode_yaml`].
pub fn decode_yaml_as<T, R>(reader: R) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    R: Read,
{
    let content = read_all(reader)?;
    let raw = read_first_document(&content)?;
    trace!("decoded raw YAML tree");

    let normalized = normalize_keys(raw);
    trace!("normalized YAML mapping keys");

    let json = serde_json::to_vec(&normalized).map_err(|source| DecodeError::Encode { source })?;
    trace!(bytes = json.len(), "re-encoded YAML as JSON");

    decode_json_slice(&json)
}

/// Decode a stream in the given format.
pub fn decode<R: Read>(reader: R, format: Format) -> Result<Value, DecodeError> {
    decode_as(reader, format)
}

/// Decode a stream in the given format into any deserializable type.
pub fn decode_as<T, R>(reader: R, format: Format) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    R: Read,
{
    match format {
        Format::Json => decode_json_as(reader),
        Format::Yaml => decode_yaml_as(reader),
    }
}

fn read_first_document(content: &[u8]) -> Result<serde_yaml::Value, DecodeError> {
    let Some(document) = serde_yaml::Deserializer::from_slice(content).next() else {
        return Ok(serde_yaml::Value::Null);
    };

    // `<<` stays an ordinary key: a JSON document may use it literally
    serde_yaml::Value::deserialize(document).map_err(|source| DecodeError::Yaml { source })
}
