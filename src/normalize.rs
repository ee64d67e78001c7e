//! YAML tree normalization.
//!
//! YAML allows scalar and even collection keys; the JSON data model only has
//! string keys. Every mapping key in the tree is rewritten to a canonical
//! string so the tree can be re-encoded as JSON.

use serde_yaml::{Mapping, Number, Value};

/// Recursively rewrite every mapping key to a string and drop YAML tags.
///
/// Key forms:
///
/// | Key | Result |
/// |-----|--------|
/// | string | unchanged |
/// | `true` / `false` | `"true"` / `"false"` |
/// | integer | base-10, e.g. `"42"`, `"-7"` |
/// | float | shortest round-trip decimal, e.g. `"1.5"`; `".inf"`, `"-.inf"`, `".nan"` |
/// | null | `"null"` |
/// | sequence / mapping | compact JSON text of the normalized key |
///
/// When two keys normalize to the same string, the later one wins.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(normalize_mapping(map)),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(normalize_keys).collect()),
        // Tags carry no meaning in the JSON model; keep the tagged value
        Value::Tagged(tagged) => normalize_keys(tagged.value),
        other => other,
    }
}

fn normalize_mapping(map: Mapping) -> Mapping {
    let mut normalized = Mapping::with_capacity(map.len());
    for (key, value) in map {
        normalized.insert(Value::String(key_string(key)), normalize_keys(value));
    }
    normalized
}

/// Canonical string form of a mapping key.
pub fn key_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(&n),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => key_string(tagged.value),
        complex @ (Value::Sequence(_) | Value::Mapping(_)) => {
            let normalized = normalize_keys(complex);
            // Every key below is a string now, so JSON encoding cannot fail;
            // fall back to YAML's flow text rather than panic.
            serde_json::to_string(&normalized).unwrap_or_else(|_| {
                serde_yaml::to_string(&normalized)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default()
            })
        }
    }
}

fn number_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_nan() => ".nan".to_string(),
        Some(f) if f.is_infinite() && f > 0.0 => ".inf".to_string(),
        Some(f) if f.is_infinite() => "-.inf".to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
