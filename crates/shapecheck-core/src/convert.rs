//! # Value Tree Conversion
//!
//! Hosts that load YAML end up holding a `serde_yaml::Value`. This module
//! converts that tree into the generic [`Value`] the validator walks. It
//! works on in-memory trees only; reading and parsing documents is the
//! host's job.

use thiserror::Error;

use crate::value::{Map, Value};

/// A YAML construct with no counterpart in the generic value tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Mapping keys must be strings, numbers, or booleans.
    #[error("unsupported mapping key at \"{path}\": {key}")]
    UnsupportedKey { path: String, key: String },

    /// NaN and infinities cannot be stored in the value tree.
    #[error("non-finite float {value} at \"{path}\"")]
    NonFiniteFloat { path: String, value: f64 },

    #[error("unsupported number {number} at \"{path}\"")]
    UnsupportedNumber { path: String, number: String },
}

/// Convert a `serde_yaml::Value` to a [`Value`].
///
/// Mapping key order is preserved. String, number and boolean keys are
/// stringified; YAML tags are dropped in favor of the tagged value.
pub fn yaml_to_value(yaml: &serde_yaml::Value) -> Result<Value, ConversionError> {
    convert(yaml, "")
}

fn convert(yaml: &serde_yaml::Value, path: &str) -> Result<Value, ConversionError> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| ConversionError::NonFiniteFloat {
                        path: path.to_string(),
                        value: f,
                    })
            } else {
                Err(ConversionError::UnsupportedNumber {
                    path: path.to_string(),
                    number: n.to_string(),
                })
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let mut items = Vec::with_capacity(seq.len());
            for (i, item) in seq.iter().enumerate() {
                items.push(convert(item, &format!("{path}.{i}"))?);
            }
            Ok(Value::Array(items))
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(ConversionError::UnsupportedKey {
                            path: path.to_string(),
                            key: format!("{other:?}"),
                        })
                    }
                };
                let value = convert(v, &format!("{path}.{key}"))?;
                map.insert(key, value);
            }
            Ok(Value::Object(map))
        }
        serde_yaml::Value::Tagged(tagged) => convert(&tagged.value, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn yaml(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_yaml_to_value_conversion() {
        let value = yaml_to_value(&yaml(
            r#"
app_name: test
port: 5432
ratio: 0.5
enabled: true
missing: ~
hosts:
  - one
  - two
"#,
        ))
        .unwrap();

        assert_eq!(value["app_name"], "test");
        assert_eq!(value["port"], 5432);
        assert_eq!(value["ratio"], 0.5);
        assert_eq!(value["enabled"], true);
        assert_eq!(value["missing"], Value::Null);
        assert_eq!(value["hosts"], json!(["one", "two"]));
    }

    #[test]
    fn test_key_order_preserved() {
        let value = yaml_to_value(&yaml("zeta: 1\nalpha: 2\nmid: 3\n")).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_scalar_keys_stringified() {
        let value = yaml_to_value(&yaml("1: one\ntrue: yes\n")).unwrap();
        assert_eq!(value, json!({"1": "one", "true": "yes"}));
    }

    #[test]
    fn test_sequence_key_rejected_with_path() {
        let err = yaml_to_value(&yaml("outer:\n  ? [1, 2]\n  : x\n")).unwrap_err();
        match err {
            ConversionError::UnsupportedKey { path, .. } => assert_eq!(path, ".outer"),
            other => panic!("Expected UnsupportedKey, got: {other}"),
        }
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let err = yaml_to_value(&yaml("items:\n  - .nan\n")).unwrap_err();
        match err {
            ConversionError::NonFiniteFloat { path, value } => {
                assert_eq!(path, ".items.0");
                assert!(value.is_nan());
            }
            other => panic!("Expected NonFiniteFloat, got: {other}"),
        }
    }

    #[test]
    fn test_tags_are_stripped() {
        let value = yaml_to_value(&yaml("level: !Custom {depth: 3}\n")).unwrap();
        assert_eq!(value, json!({"level": {"depth": 3}}));
    }
}
