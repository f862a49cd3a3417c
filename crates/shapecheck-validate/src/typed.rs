//! # Typed Results
//!
//! What a successful validation returns. A [`TypedValue`] mirrors the schema
//! it was checked against: records become [`Record`]s with every declared
//! field present (defaults filled in), typed sequences and mappings become
//! containers of typed values, and everything else is carried as a plain
//! [`Value`] owned by the result.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use shapecheck_core::{Map, Value};

/// A validated value shaped after its schema.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// A constructed record.
    Record(Record),
    /// Elements of a typed sequence, in input order.
    Sequence(Vec<TypedValue>),
    /// Entries of a typed mapping, in input order.
    Mapping(IndexMap<String, TypedValue>),
    /// A scalar, an opaque sequence or mapping, or a value accepted by an
    /// alternative.
    Value(Value),
}

impl TypedValue {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[TypedValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, TypedValue>> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Flatten back into a generic value tree. Records become mappings of
    /// their fields in declaration order.
    pub fn into_value(self) -> Value {
        match self {
            Self::Record(record) => Value::Object(into_map(record.fields)),
            Self::Sequence(items) => {
                Value::Array(items.into_iter().map(TypedValue::into_value).collect())
            }
            Self::Mapping(entries) => Value::Object(into_map(entries)),
            Self::Value(value) => value,
        }
    }
}

fn into_map(entries: IndexMap<String, TypedValue>) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(k, v)| (k, v.into_value()))
        .collect()
}

impl From<TypedValue> for Value {
    fn from(typed: TypedValue) -> Self {
        typed.into_value()
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Record(record) => record.serialize(serializer),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => serialize_entries(entries, serializer),
            Self::Value(value) => value.serialize(serializer),
        }
    }
}

fn serialize_entries<S: Serializer>(
    entries: &IndexMap<String, TypedValue>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (k, v) in entries {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

/// A record built from validated fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    fields: IndexMap<String, TypedValue>,
}

impl Record {
    pub(crate) fn new(name: impl Into<String>, fields: IndexMap<String, TypedValue>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Name of the record schema this was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.fields.get(field)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &IndexMap<String, TypedValue> {
        &self.fields
    }

    pub fn into_fields(self) -> IndexMap<String, TypedValue> {
        self.fields
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entries(&self.fields, serializer)
    }
}
