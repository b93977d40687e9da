//! Typed predicates over the loosely-typed case document tree
//!
//! Case records are kept as `serde_json::Value` trees. These helpers answer
//! the shape questions the validator asks ("is this a record", "is this a
//! list", "is this an integer in range") so the rules never inspect `Value`
//! variants directly.

use serde_json::Value;
use std::ops::RangeInclusive;

/// Look up a field on a record. Non-record values have no fields.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|map| map.get(key))
}

/// True when the record has the field, whatever its value (including `null`)
pub fn has_field(value: &Value, key: &str) -> bool {
    value.as_object().map_or(false, |map| map.contains_key(key))
}

pub fn is_record(value: &Value) -> bool {
    value.is_object()
}

pub fn is_list(value: &Value) -> bool {
    value.is_array()
}

/// Text that still has content after trimming whitespace
pub fn is_non_empty_text(value: &Value) -> bool {
    value.as_str().map_or(false, |s| !s.trim().is_empty())
}

/// An integral JSON number inside `range`. Floats such as `3.0` do not count.
pub fn is_int_in(value: &Value, range: RangeInclusive<i64>) -> bool {
    value.as_i64().map_or(false, |n| range.contains(&n))
}

/// Text that is exactly one of `options`
pub fn is_one_of(value: &Value, options: &[&str]) -> bool {
    value.as_str().map_or(false, |s| options.contains(&s))
}

/// Key used for identity comparisons. The JSON text keeps `"7"` and `7` apart.
pub fn identity_key(value: &Value) -> String {
    value.to_string()
}

/// Human-readable form of a value: strings without quotes, the rest as JSON
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
