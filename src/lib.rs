//! Schema Loader
//!
//! Resolves a schema reference (a local path or an HTTP(S) URL) into a byte
//! stream and decodes it into a JSON-shaped document.
//!
//! JSON and YAML sources produce the same [`serde_json::Value`] for the same
//! content: YAML is parsed, every mapping key is turned into a string, and
//! the result goes through the JSON decoder.
//!
//! # Example
//!
//! ```
//! use schema_loader::{decode_json, decode_yaml};
//! use serde_json::json;
//!
//! let from_json = decode_json(r#"{"type": "object", "200": {"description": "ok"}}"#.as_bytes()).unwrap();
//! let from_yaml = decode_yaml("type: object\n200:\n  description: ok\n".as_bytes()).unwrap();
//!
//! assert_eq!(from_json, from_yaml);
//! assert_eq!(from_yaml["200"], json!({"description": "ok"}));
//! ```
//!
//! # References
//!
//! | Reference | Opened as |
//! |-----------|-----------|
//! | `schema.json`, `./a/b.yaml`, `/abs/s.json` | file, joined onto the working directory |
//! | `file:///abs/s.json` | file, joined onto the working directory |
//! | `http://...`, `https://...` | HTTP GET (`remote` feature) |
//! | anything else | `ResolveError::InvalidReference` |
//!
//! ```no_run
//! use schema_loader::Resolver;
//!
//! let resolver = Resolver::new("/specs");
//! let local = resolver.load_json("schema.json").unwrap();
//! let remote = resolver.load_yaml("https://example.com/schema.yaml").unwrap();
//! ```

mod decoder;
mod error;
mod loader;
mod normalize;
mod reference;
mod resolver;
mod types;

pub use decoder::{decode, decode_as, decode_json, decode_json_as, decode_yaml, decode_yaml_as};
pub use error::{DecodeError, LoadError, ResolveError};
pub use loader::{detect_format, load, load_auto, load_json, load_yaml};
pub use normalize::{key_string, normalize_keys};
pub use reference::SchemaReference;
pub use resolver::{open, Resolver, SchemaStream};
pub use types::Format;
