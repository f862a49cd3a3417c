//! # Structural Validation
//!
//! Walks a generic [`Value`] and a [`Schema`] in lock-step and builds a
//! [`TypedValue`] bottom-up.
//!
//! ## Dispatch
//!
//! | Schema | Value must be | Result |
//! |---|---|---|
//! | `Record` | mapping | [`Record`] with declared fields, defaults filled in |
//! | `Mapping` | mapping | each value validated, keys kept |
//! | `OpaqueMapping` | mapping | deep copy |
//! | `Sequence` | sequence | each element validated |
//! | `OpaqueSequence` | sequence | deep copy |
//! | `Alternative` | kind accepted by some candidate | the value, unchanged |
//! | `Primitive` | scalar of that kind | the value, unchanged |
//!
//! Alternatives match on the value's runtime kind only; a mapping accepted
//! through a record candidate is not checked against the record's fields.
//!
//! ## Failure
//!
//! The first mismatch aborts the walk. Each level that returns the error
//! prefixes its field name, key, or index, so the caller sees the full path.
//! The input is only borrowed; results never alias it.

use indexmap::IndexMap;
use shapecheck_core::{Map, ParseError, RecordSchema, Schema, Value, ValueKind};

use crate::options::ValidateOptions;
use crate::shaped::Shaped;
use crate::typed::{Record, TypedValue};

/// Schema-directed validator.
///
/// Holds only its options; one instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidateOptions,
}

impl Validator {
    pub fn new(options: ValidateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    /// Validate `value` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] found, with its path relative to
    /// `value`.
    pub fn validate(&self, value: &Value, schema: &Schema) -> Result<TypedValue, ParseError> {
        self.walk(value, schema, 0).map_err(|err| {
            tracing::debug!(path = err.path(), error = %err, "validation failed");
            err
        })
    }

    /// Validate `value` against `T`'s schema and build a `T` from it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] found during validation or
    /// construction.
    pub fn parse<T: Shaped>(&self, value: &Value) -> Result<T, ParseError> {
        let typed = self.validate(value, &T::schema())?;
        T::from_typed(typed, self).map_err(|err| {
            tracing::debug!(path = err.path(), error = %err, "construction failed");
            err
        })
    }

    /// Bring a value handed to a typed builder into the shape of `schema`.
    ///
    /// Compound values that passed through an alternative are still raw and
    /// get validated here; everything else passes through.
    pub(crate) fn settle(
        &self,
        value: TypedValue,
        schema: &Schema,
    ) -> Result<TypedValue, ParseError> {
        match value {
            TypedValue::Value(raw @ (Value::Array(_) | Value::Object(_))) => {
                self.walk(&raw, schema, 0)
            }
            other => Ok(other),
        }
    }

    fn walk(&self, value: &Value, schema: &Schema, depth: usize) -> Result<TypedValue, ParseError> {
        if depth > self.options.max_depth {
            return Err(ParseError::depth_exceeded(self.options.max_depth));
        }
        match schema {
            Schema::Record(record) => {
                let map = expect_mapping(value, schema)?;
                self.walk_record(map, record, schema, depth)
            }
            Schema::Mapping { value: inner, .. } => {
                let map = expect_mapping(value, schema)?;
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    let typed = self
                        .walk(item, inner, depth + 1)
                        .map_err(|err| err.with_prefix(key))?;
                    entries.insert(key.clone(), typed);
                }
                Ok(TypedValue::Mapping(entries))
            }
            Schema::OpaqueMapping => {
                expect_mapping(value, schema)?;
                Ok(TypedValue::Value(value.clone()))
            }
            Schema::Sequence(element) => {
                let items = expect_sequence(value, schema)?;
                let mut typed = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    typed.push(
                        self.walk(item, element, depth + 1)
                            .map_err(|err| err.with_prefix(&i.to_string()))?,
                    );
                }
                Ok(TypedValue::Sequence(typed))
            }
            Schema::OpaqueSequence => {
                expect_sequence(value, schema)?;
                Ok(TypedValue::Value(value.clone()))
            }
            Schema::Alternative(candidates) => {
                let kind = ValueKind::of(value);
                match candidates.iter().find(|c| c.accepts_kind(kind)) {
                    Some(candidate) => {
                        tracing::trace!(%kind, %candidate, "alternative matched");
                        Ok(TypedValue::Value(value.clone()))
                    }
                    None => Err(ParseError::unexpected_type(schema, value)),
                }
            }
            Schema::Primitive(primitive) => {
                if primitive.value_kind() == ValueKind::of(value) {
                    Ok(TypedValue::Value(value.clone()))
                } else {
                    Err(ParseError::unexpected_type(schema, value))
                }
            }
        }
    }

    fn walk_record(
        &self,
        input: &Map<String, Value>,
        record: &RecordSchema,
        schema: &Schema,
        depth: usize,
    ) -> Result<TypedValue, ParseError> {
        let mut validated = IndexMap::with_capacity(record.fields().len());
        for field in record.fields() {
            match input.get(field.name()) {
                Some(item) => {
                    let typed = self
                        .walk(item, field.schema(), depth + 1)
                        .map_err(|err| err.with_prefix(field.name()))?;
                    validated.insert(field.name().to_string(), typed);
                }
                None if field.has_default() => continue,
                None => return Err(ParseError::missing_field(field)),
            }
        }
        self.construct(input, record, schema, validated, depth)
    }

    /// Assemble the record in declaration order, filling in defaults.
    /// Defaults are walked like input so they come back in the field's shape.
    fn construct(
        &self,
        input: &Map<String, Value>,
        record: &RecordSchema,
        schema: &Schema,
        mut validated: IndexMap<String, TypedValue>,
        depth: usize,
    ) -> Result<TypedValue, ParseError> {
        if self.options.deny_unknown_fields {
            if let Some(key) = input.keys().find(|k| record.field_named(k).is_none()) {
                return Err(ParseError::argument(
                    schema,
                    format!("unexpected field '{key}'"),
                ));
            }
        }

        let mut fields = IndexMap::with_capacity(record.fields().len());
        for field in record.fields() {
            let typed = match (validated.shift_remove(field.name()), field.default()) {
                (Some(typed), _) => typed,
                (None, Some(default)) => {
                    tracing::trace!(
                        record = record.name(),
                        field = field.name(),
                        "substituting default"
                    );
                    self.walk(&default.produce(), field.schema(), depth + 1)
                        .map_err(|err| err.with_prefix(field.name()))?
                }
                (None, None) => return Err(ParseError::missing_field(field)),
            };
            fields.insert(field.name().to_string(), typed);
        }
        tracing::trace!(record = record.name(), "record constructed");
        Ok(TypedValue::Record(Record::new(record.name(), fields)))
    }
}

fn expect_mapping<'a>(
    value: &'a Value,
    schema: &Schema,
) -> Result<&'a Map<String, Value>, ParseError> {
    value
        .as_object()
        .ok_or_else(|| ParseError::unexpected_type(schema, value))
}

fn expect_sequence<'a>(value: &'a Value, schema: &Schema) -> Result<&'a Vec<Value>, ParseError> {
    value
        .as_array()
        .ok_or_else(|| ParseError::unexpected_type(schema, value))
}

/// Validate with default options.
///
/// # Errors
///
/// See [`Validator::validate`].
pub fn validate(value: &Value, schema: &Schema) -> Result<TypedValue, ParseError> {
    Validator::default().validate(value, schema)
}

/// Validate and build a `T` with default options.
///
/// # Errors
///
/// See [`Validator::parse`].
pub fn parse<T: Shaped>(value: &Value) -> Result<T, ParseError> {
    Validator::default().parse(value)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// JSON trees without floats, so every number has an exact kind.
    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,10}", inner, 0..8)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// The most specific schema a value matches.
    fn infer_schema(value: &Value) -> Schema {
        match value {
            Value::Object(map) => {
                let record = map
                    .iter()
                    .fold(RecordSchema::new("Inferred"), |record, (k, v)| {
                        record.field(k.as_str(), infer_schema(v))
                    });
                Schema::record(record)
            }
            Value::Array(items) => match items.first() {
                Some(first) if items.iter().all(|i| ValueKind::of(i) == ValueKind::of(first)) => {
                    match first {
                        Value::Object(_) | Value::Array(_) => Schema::OpaqueSequence,
                        scalar => Schema::sequence(infer_schema(scalar)),
                    }
                }
                _ => Schema::OpaqueSequence,
            },
            scalar => Schema::Primitive(match ValueKind::of(scalar) {
                ValueKind::Boolean => shapecheck_core::PrimitiveKind::Boolean,
                ValueKind::Integer => shapecheck_core::PrimitiveKind::Integer,
                ValueKind::String => shapecheck_core::PrimitiveKind::String,
                _ => shapecheck_core::PrimitiveKind::Null,
            }),
        }
    }

    proptest! {
        /// A value that matches its schema comes back equal.
        #[test]
        fn matching_input_round_trips(value in json_value()) {
            let schema = infer_schema(&value);
            let typed = validate(&value, &schema).unwrap();
            prop_assert_eq!(typed.into_value(), value);
        }

        /// Validating a validated result again yields the same result.
        #[test]
        fn revalidation_is_idempotent(value in json_value()) {
            let schema = infer_schema(&value);
            let first = validate(&value, &schema).unwrap();
            let second = validate(&first.clone().into_value(), &schema).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Opaque results are unaffected by later changes to the input.
        #[test]
        fn opaque_results_do_not_alias(items in prop::collection::vec(json_value(), 1..6)) {
            let mut input = Value::Array(items);
            let typed = validate(&input, &Schema::OpaqueSequence).unwrap();
            let snapshot = input.clone();
            if let Value::Array(items) = &mut input {
                items[0] = Value::String("mutated".to_string());
            }
            prop_assert_eq!(typed.into_value(), snapshot);
        }

        /// Any scalar is rejected by a sequence schema at the root.
        #[test]
        fn scalar_rejected_by_sequence(n in any::<i64>()) {
            let err = validate(&serde_json::json!(n), &Schema::OpaqueSequence).unwrap_err();
            prop_assert_eq!(err.path(), "");
        }
    }
}
