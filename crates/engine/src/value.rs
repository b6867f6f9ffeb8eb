//! Setting values and their stored encoding
//!
//! Values are arbitrary JSON-shaped data: null, booleans, integers, floats,
//! strings, sequences and string-keyed mappings, nested freely. The stored
//! form is compact JSON text. Float parsing is correctly rounded, so a stored
//! `0.01` comes back as exactly the same `f64`.

use crate::error::Result;

pub use serde_json::Value;

/// A string-keyed mapping value (the "hash" of a merge).
pub type Mapping = serde_json::Map<String, Value>;

/// Encode a value to its stored text form.
pub fn encode(value: &Value) -> String {
    value.to_string()
}

/// Decode stored text back into a value.
///
/// Fails with `SettingsError::Serialization` on a malformed payload.
pub fn decode(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Human-readable name of a value's shape, used in error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use serde_json::json;

    fn roundtrip(value: Value) -> Value {
        decode(&encode(&value)).expect("decode should succeed")
    }

    #[test]
    fn test_float_precision_survives() {
        let decoded = roundtrip(json!(0.01));
        let f = decoded.as_f64().unwrap();
        assert_eq!(f, 0.01);
        assert_eq!(f * 2.0, 0.02);
    }

    #[test]
    fn test_integer_and_float_stay_distinct() {
        assert!(roundtrip(json!(1)).is_i64());
        assert!(roundtrip(json!(1.0)).is_f64());
    }

    #[test]
    fn test_false_is_not_null() {
        assert_eq!(roundtrip(json!(false)), Value::Bool(false));
        assert_eq!(roundtrip(Value::Null), Value::Null);
        assert_ne!(encode(&json!(false)), encode(&Value::Null));
    }

    #[test]
    fn test_complex_nested_value() {
        let complex = json!([1, "2", { "three": true }]);
        assert_eq!(roundtrip(complex.clone()), complex);

        let nested = json!({ "a": { "b": [1.5, null, { "c": false }] }, "d": "" });
        assert_eq!(roundtrip(nested.clone()), nested);
    }

    #[test]
    fn test_malformed_payload_is_serialization_error() {
        let err = decode("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Serialization(_)));
        assert!(decode("").is_err());
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(&json!("foo")), "a string");
        assert_eq!(kind_name(&json!(2)), "an integer");
        assert_eq!(kind_name(&json!(2.5)), "a float");
        assert_eq!(kind_name(&json!({})), "a mapping");
    }
}
