// src/metadata/normalize.rs
//! Canonical string form for identifier fields.
//!
//! The wall API returns ids as JSON numbers, the reconciler joins on
//! strings. Every top-level key named `id` or ending in `_id` is rewritten
//! to its decimal string; everything else, nested objects included, is left
//! alone. Nested ids are converted by the extractors with [`id_to_string`].

use crate::api::types::RawItem;
use crate::constants::{ID_KEY, ID_SUFFIX};
use crate::types::ValidationError;
use serde_json::Value;

/// Whether a key names an identifier field.
pub fn is_id_key(key: &str) -> bool {
    key == ID_KEY || key.ends_with(ID_SUFFIX)
}

/// Decimal string form of an identifier value.
///
/// Strings pass through unchanged, which makes normalization idempotent.
pub fn id_to_string(key: &str, value: &Value) -> Result<String, ValidationError> {
    let found = match value {
        Value::String(s) => return Ok(s.clone()),
        Value::Number(n) => return Ok(n.to_string()),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Err(ValidationError::UnstringifiableId {
        key: key.to_string(),
        found,
    })
}

/// Rewrites every identifier field of `item` to a string. A null field
/// stays null: it marks a missing reference, not an id.
pub fn normalize(mut item: RawItem) -> Result<RawItem, ValidationError> {
    for (key, value) in item.iter_mut() {
        if is_id_key(key) && !value.is_string() && !value.is_null() {
            *value = Value::String(id_to_string(key, value)?);
        }
    }
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn item(value: Value) -> RawItem {
        match value {
            Value::Object(map) => map,
            _ => panic!("test item must be an object"),
        }
    }

    #[test]
    fn rewrites_id_fields_only() {
        let raw = item(json!({
            "id": 457239017,
            "owner_id": -1234,
            "post_id": 88,
            "date": 1700000000,
            "text": "hello",
            "orig_photo": { "id": 5, "url": "https://example.com/a.jpg" }
        }));

        let normalized = normalize(raw).unwrap();

        assert_eq!(normalized["id"], json!("457239017"));
        assert_eq!(normalized["owner_id"], json!("-1234"));
        assert_eq!(normalized["post_id"], json!("88"));
        assert_eq!(normalized["date"], json!(1700000000));
        assert_eq!(normalized["text"], json!("hello"));
        assert_eq!(normalized["orig_photo"]["id"], json!(5));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = item(json!({ "id": 1, "post_id": "2", "album_id": -7, "likes": 3 }));

        let once = normalize(raw).unwrap();
        let twice = normalize(once.clone()).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn non_scalar_ids_are_rejected() {
        for bad in [json!(true), json!([1]), json!({ "x": 1 })] {
            let err = normalize(item(json!({ "id": bad }))).unwrap_err();
            assert!(matches!(err, ValidationError::UnstringifiableId { .. }));
        }
    }

    #[test]
    fn null_references_stay_null() {
        let normalized = normalize(item(json!({ "id": 1, "post_id": null }))).unwrap();
        assert_eq!(normalized["post_id"], Value::Null);
        assert!(id_to_string("post_id", &Value::Null).is_err());
    }

    #[test]
    fn id_suffix_convention() {
        assert!(is_id_key("id"));
        assert!(is_id_key("post_id"));
        assert!(!is_id_key("identity"));
        assert!(!is_id_key("idx"));
    }
}
