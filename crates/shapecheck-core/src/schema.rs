//! # Schema Descriptions
//!
//! The shape a value is checked against. [`Schema`] is a closed sum type:
//! records with named, ordered fields; homogeneous sequences and mappings;
//! alternatives; opaque (untyped) sequences and mappings; and primitives.
//!
//! Schemas are built once by the host and only read afterwards. Whether a
//! record field has a default is decided when the field is declared, through
//! [`RecordSchema::field_with_default`] or [`RecordSchema::field_with_factory`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueKind};

/// Scalar kinds a [`Schema::Primitive`] can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    String,
    Integer,
    Float,
    Boolean,
    Null,
}

impl PrimitiveKind {
    /// The runtime value kind this primitive accepts.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::String => ValueKind::String,
            Self::Integer => ValueKind::Integer,
            Self::Float => ValueKind::Float,
            Self::Boolean => ValueKind::Boolean,
            Self::Null => ValueKind::Null,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_kind().as_str())
    }
}

/// Default for a record field that may be absent from the input.
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// A fixed value, cloned into every result.
    Value(Value),
    /// A factory called once per constructed record.
    Factory(fn() -> Value),
}

impl FieldDefault {
    /// Produce the default value.
    pub fn produce(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Factory(factory) => factory(),
        }
    }
}

impl PartialEq for FieldDefault {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            // Factories are compared by what they produce.
            (Self::Factory(a), Self::Factory(b)) => a() == b(),
            _ => false,
        }
    }
}

/// One declared field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    name: String,
    schema: Schema,
    default: Option<FieldDefault>,
}

impl FieldSchema {
    /// A required field.
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            default: None,
        }
    }

    /// A field that falls back to `default` when absent.
    pub fn with_default(name: impl Into<String>, schema: Schema, default: FieldDefault) -> Self {
        Self {
            name: name.into(),
            schema,
            default: Some(default),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    /// True if the field may be omitted from the input.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A named record with an ordered set of fields.
///
/// Field order is declaration order. It decides which missing field is
/// reported first and the order of fields in a constructed record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Start an empty record description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a required field.
    pub fn field(self, name: impl Into<String>, schema: Schema) -> Self {
        self.with_field(FieldSchema::required(name, schema))
    }

    /// Declare a field with a fixed default.
    pub fn field_with_default(
        self,
        name: impl Into<String>,
        schema: Schema,
        default: Value,
    ) -> Self {
        self.with_field(FieldSchema::with_default(name, schema, FieldDefault::Value(default)))
    }

    /// Declare a field whose default is produced by `factory` on each use.
    pub fn field_with_factory(
        self,
        name: impl Into<String>,
        schema: Schema,
        factory: fn() -> Value,
    ) -> Self {
        self.with_field(FieldSchema::with_default(name, schema, FieldDefault::Factory(factory)))
    }

    /// Declare a prepared field. Redeclaring a name replaces the earlier
    /// declaration in place.
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Look up a declared field by name.
    pub fn field_named(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The shape a value must have.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// A mapping with a fixed set of named fields.
    Record(RecordSchema),
    /// A sequence whose every element matches the element schema.
    Sequence(Box<Schema>),
    /// A mapping whose every value matches `value`. Keys are taken as-is.
    Mapping {
        key: PrimitiveKind,
        value: Box<Schema>,
    },
    /// The value must match one of the candidates, tried in order.
    Alternative(Vec<Schema>),
    /// Any sequence; contents are copied without inspection.
    OpaqueSequence,
    /// Any mapping; contents are copied without inspection.
    OpaqueMapping,
    /// A scalar of the given kind.
    Primitive(PrimitiveKind),
}

impl Schema {
    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    pub fn integer() -> Self {
        Self::Primitive(PrimitiveKind::Integer)
    }

    pub fn float() -> Self {
        Self::Primitive(PrimitiveKind::Float)
    }

    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    pub fn null() -> Self {
        Self::Primitive(PrimitiveKind::Null)
    }

    pub fn sequence(element: Schema) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// A string-keyed mapping with typed values.
    pub fn mapping(value: Schema) -> Self {
        Self::Mapping {
            key: PrimitiveKind::String,
            value: Box::new(value),
        }
    }

    pub fn record(record: RecordSchema) -> Self {
        Self::Record(record)
    }

    /// `candidate | null`.
    pub fn optional(candidate: Schema) -> Self {
        Self::alternative([candidate, Self::null()])
    }

    /// Build an alternative from candidates.
    ///
    /// Nested alternatives are flattened and duplicates dropped, keeping the
    /// first occurrence. A single remaining candidate is returned as itself.
    pub fn alternative(candidates: impl IntoIterator<Item = Schema>) -> Self {
        let mut flat: Vec<Schema> = Vec::new();
        for candidate in candidates {
            let nested = match candidate {
                Self::Alternative(inner) => inner,
                other => vec![other],
            };
            for schema in nested {
                if !flat.contains(&schema) {
                    flat.push(schema);
                }
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Alternative(flat)
        }
    }

    /// Whether a value of runtime kind `kind` is an instance of this schema's
    /// top-level shape. Compound contents are not inspected.
    pub fn accepts_kind(&self, kind: ValueKind) -> bool {
        match self {
            Self::Record(_) | Self::Mapping { .. } | Self::OpaqueMapping => {
                kind == ValueKind::Mapping
            }
            Self::Sequence(_) | Self::OpaqueSequence => kind == ValueKind::Sequence,
            Self::Alternative(candidates) => candidates.iter().any(|c| c.accepts_kind(kind)),
            Self::Primitive(p) => p.value_kind() == kind,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(record) => f.write_str(record.name()),
            Self::Sequence(element) => write!(f, "list[{element}]"),
            Self::Mapping { key, value } => write!(f, "map[{key}, {value}]"),
            Self::Alternative(candidates) => {
                for (i, candidate) in candidates.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{candidate}")?;
                }
                Ok(())
            }
            Self::OpaqueSequence => f.write_str("list"),
            Self::OpaqueMapping => f.write_str("map"),
            Self::Primitive(kind) => write!(f, "{kind}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alternative_flattens_and_dedups() {
        let inner = Schema::alternative([Schema::integer(), Schema::string()]);
        let outer = Schema::alternative([inner, Schema::integer(), Schema::boolean()]);
        assert_eq!(
            outer,
            Schema::Alternative(vec![Schema::integer(), Schema::string(), Schema::boolean()])
        );
    }

    #[test]
    fn test_single_candidate_alternative_collapses() {
        let schema = Schema::alternative([Schema::string(), Schema::string()]);
        assert_eq!(schema, Schema::string());
    }

    #[test]
    fn test_optional_appends_null() {
        assert_eq!(
            Schema::optional(Schema::integer()),
            Schema::Alternative(vec![Schema::integer(), Schema::null()])
        );
    }

    #[test]
    fn test_accepts_kind_is_shallow() {
        let record = Schema::record(RecordSchema::new("Leaf").field("final", Schema::string()));
        assert!(record.accepts_kind(ValueKind::Mapping));
        assert!(!record.accepts_kind(ValueKind::Sequence));
        assert!(Schema::sequence(Schema::integer()).accepts_kind(ValueKind::Sequence));
        assert!(!Schema::float().accepts_kind(ValueKind::Integer));
        assert!(!Schema::integer().accepts_kind(ValueKind::Boolean));
    }

    #[test]
    fn test_display_rendering() {
        let schema = Schema::mapping(Schema::sequence(Schema::alternative([
            Schema::integer(),
            Schema::string(),
        ])));
        assert_eq!(schema.to_string(), "map[string, list[integer | string]]");
        assert_eq!(Schema::OpaqueSequence.to_string(), "list");
        assert_eq!(Schema::OpaqueMapping.to_string(), "map");
        let record = Schema::record(RecordSchema::new("Database"));
        assert_eq!(record.to_string(), "Database");
    }

    #[test]
    fn test_record_field_order_and_lookup() {
        let record = RecordSchema::new("Person")
            .field("name", Schema::string())
            .field_with_default("city", Schema::string(), json!("London"))
            .field("age", Schema::integer());
        let names: Vec<&str> = record.fields().iter().map(FieldSchema::name).collect();
        assert_eq!(names, ["name", "city", "age"]);
        assert!(record.field_named("city").is_some_and(FieldSchema::has_default));
        assert!(!record.field_named("age").is_some_and(FieldSchema::has_default));
        assert!(record.field_named("height").is_none());
    }

    #[test]
    fn test_redeclared_field_replaces_in_place() {
        let record = RecordSchema::new("R")
            .field("a", Schema::string())
            .field("b", Schema::string())
            .field_with_default("a", Schema::integer(), json!(1));
        assert_eq!(record.fields().len(), 2);
        assert_eq!(record.fields()[0].schema(), &Schema::integer());
        assert!(record.fields()[0].has_default());
    }

    #[test]
    fn test_factory_default_produces_fresh_value() {
        fn empty_list() -> Value {
            json!([])
        }
        let default = FieldDefault::Factory(empty_list);
        assert_eq!(default.produce(), json!([]));
        assert_eq!(default, FieldDefault::Factory(empty_list));
        assert_ne!(default, FieldDefault::Value(json!(null)));
    }
}
