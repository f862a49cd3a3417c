//! # Typed Construction
//!
//! [`Shaped`] ties a Rust type to the schema it is validated against and to
//! the code that builds it from a [`TypedValue`]. Record types implement it by
//! hand with a [`Fields`] builder, so construction goes through ordinary
//! struct literals:
//!
//! ```
//! use shapecheck_core::{ParseError, RecordSchema, Schema};
//! use shapecheck_validate::{parse, Fields, Shaped, TypedValue, Validator};
//!
//! struct Database {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Shaped for Database {
//!     fn schema() -> Schema {
//!         Schema::record(
//!             RecordSchema::new("Database")
//!                 .field("host", String::schema())
//!                 .field("port", u16::schema()),
//!         )
//!     }
//!
//!     fn from_typed(value: TypedValue, validator: &Validator) -> Result<Self, ParseError> {
//!         let mut fields = Fields::new(value, &Self::schema(), validator)?;
//!         let db = Self {
//!             host: fields.take("host")?,
//!             port: fields.take("port")?,
//!         };
//!         fields.finish()?;
//!         Ok(db)
//!     }
//! }
//!
//! let db: Database = parse(&serde_json::json!({"host": "localhost", "port": 5432})).unwrap();
//! assert_eq!(db.port, 5432);
//! ```
//!
//! A compound value that reached a builder through an alternative (for
//! example the `Some` side of an `Option<Vec<String>>`) has not been checked
//! past its kind. Builders validate it against their own schema before
//! converting, so a typed result is always fully checked.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use shapecheck_core::{FieldSchema, Map, ParseError, Schema, Value};

use crate::typed::TypedValue;
use crate::validator::Validator;

/// A Rust type with a schema and a builder.
pub trait Shaped: Sized {
    /// The schema values of this type are validated against.
    fn schema() -> Schema;

    /// Build `Self` from the result of validating against [`Shaped::schema`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] located relative to `value` if the value does
    /// not have the expected shape or does not fit the Rust type.
    fn from_typed(value: TypedValue, validator: &Validator) -> Result<Self, ParseError>;
}

/// Named fields of a validated record, taken one by one into a struct.
#[derive(Debug)]
pub struct Fields<'v> {
    schema: Schema,
    entries: IndexMap<String, TypedValue>,
    validator: &'v Validator,
}

impl<'v> Fields<'v> {
    /// Open the record in `value`, which must have been validated against
    /// `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedType`] if `value` is not a record.
    pub fn new(
        value: TypedValue,
        schema: &Schema,
        validator: &'v Validator,
    ) -> Result<Self, ParseError> {
        match validator.settle(value, schema)? {
            TypedValue::Record(record) => Ok(Self {
                schema: schema.clone(),
                entries: record.into_fields(),
                validator,
            }),
            other => Err(ParseError::unexpected_type(schema, &other.into_value())),
        }
    }

    /// Take and build field `name`. Errors are located under the field.
    ///
    /// # Errors
    ///
    /// Returns an `Argument missed` error if the record has no such field, or
    /// the field's own construction error.
    pub fn take<T: Shaped>(&mut self, name: &str) -> Result<T, ParseError> {
        match self.entries.shift_remove(name) {
            Some(value) => T::from_typed(value, self.validator)
                .map_err(|err| err.with_prefix(name)),
            None => Err(ParseError::missing_field(&FieldSchema::required(name, T::schema()))),
        }
    }

    /// Confirm every field was taken.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ArgumentError`] naming the first field left over.
    pub fn finish(self) -> Result<(), ParseError> {
        match self.entries.keys().next() {
            Some(key) => Err(ParseError::argument(
                &self.schema,
                format!("unexpected field '{key}'"),
            )),
            None => Ok(()),
        }
    }
}

fn mismatch<T: Shaped>(value: TypedValue) -> ParseError {
    ParseError::unexpected_type(&T::schema(), &value.into_value())
}

impl Shaped for String {
    fn schema() -> Schema {
        Schema::string()
    }

    fn from_typed(value: TypedValue, _: &Validator) -> Result<Self, ParseError> {
        match value {
            TypedValue::Value(Value::String(s)) => Ok(s),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Shaped for bool {
    fn schema() -> Schema {
        Schema::boolean()
    }

    fn from_typed(value: TypedValue, _: &Validator) -> Result<Self, ParseError> {
        match value {
            TypedValue::Value(Value::Bool(b)) => Ok(b),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Shaped for f64 {
    fn schema() -> Schema {
        Schema::float()
    }

    fn from_typed(value: TypedValue, _: &Validator) -> Result<Self, ParseError> {
        match value {
            TypedValue::Value(Value::Number(n)) if !(n.is_i64() || n.is_u64()) => n
                .as_f64()
                .ok_or_else(|| mismatch::<Self>(TypedValue::Value(Value::Number(n)))),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Shaped for f32 {
    fn schema() -> Schema {
        Schema::float()
    }

    fn from_typed(value: TypedValue, validator: &Validator) -> Result<Self, ParseError> {
        let f = f64::from_typed(value, validator)?;
        let narrowed = f as f32;
        if narrowed.is_infinite() {
            return Err(ParseError::argument(
                &Self::schema(),
                format!("{f} is out of range for f32"),
            ));
        }
        Ok(narrowed)
    }
}

macro_rules! shaped_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl Shaped for $ty {
            fn schema() -> Schema {
                Schema::integer()
            }

            fn from_typed(value: TypedValue, _: &Validator) -> Result<Self, ParseError> {
                let n = match &value {
                    TypedValue::Value(Value::Number(n)) => n
                        .as_i64()
                        .map(i128::from)
                        .or_else(|| n.as_u64().map(i128::from)),
                    _ => None,
                };
                match n {
                    Some(n) => <$ty>::try_from(n).map_err(|_| {
                        ParseError::argument(
                            &Self::schema(),
                            format!("{n} is out of range for {}", stringify!($ty)),
                        )
                    }),
                    None => Err(mismatch::<Self>(value)),
                }
            }
        }
    )*};
}

shaped_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Shaped> Shaped for Option<T> {
    fn schema() -> Schema {
        Schema::optional(T::schema())
    }

    fn from_typed(value: TypedValue, validator: &Validator) -> Result<Self, ParseError> {
        match value {
            TypedValue::Value(Value::Null) => Ok(None),
            other => T::from_typed(other, validator).map(Some),
        }
    }
}

impl<T: Shaped> Shaped for Vec<T> {
    fn schema() -> Schema {
        Schema::sequence(T::schema())
    }

    fn from_typed(value: TypedValue, validator: &Validator) -> Result<Self, ParseError> {
        match validator.settle(value, &Self::schema())? {
            TypedValue::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    T::from_typed(item, validator).map_err(|err| err.with_prefix(&i.to_string()))
                })
                .collect(),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

/// Build the entries of a typed mapping into any string-keyed collection.
fn mapping_entries<T, C>(value: TypedValue, validator: &Validator) -> Result<C, ParseError>
where
    T: Shaped,
    C: FromIterator<(String, T)>,
{
    let schema = Schema::mapping(T::schema());
    match validator.settle(value, &schema)? {
        TypedValue::Mapping(entries) => entries
            .into_iter()
            .map(|(key, item)| match T::from_typed(item, validator) {
                Ok(built) => Ok((key, built)),
                Err(err) => Err(err.with_prefix(&key)),
            })
            .collect(),
        other => Err(ParseError::unexpected_type(&schema, &other.into_value())),
    }
}

impl<T: Shaped> Shaped for IndexMap<String, T> {
    fn schema() -> Schema {
        Schema::mapping(T::schema())
    }

    fn from_typed(value: TypedValue, validator: &Validator) -> Result<Self, ParseError> {
        mapping_entries(value, validator)
    }
}

impl<T: Shaped> Shaped for BTreeMap<String, T> {
    fn schema() -> Schema {
        Schema::mapping(T::schema())
    }

    fn from_typed(value: TypedValue, validator: &Validator) -> Result<Self, ParseError> {
        mapping_entries(value, validator)
    }
}

impl<T: Shaped, S: BuildHasher + Default> Shaped for HashMap<String, T, S> {
    fn schema() -> Schema {
        Schema::mapping(T::schema())
    }

    fn from_typed(value: TypedValue, validator: &Validator) -> Result<Self, ParseError> {
        mapping_entries(value, validator)
    }
}

/// An untyped mapping, copied as-is.
impl Shaped for Map<String, Value> {
    fn schema() -> Schema {
        Schema::OpaqueMapping
    }

    fn from_typed(value: TypedValue, _: &Validator) -> Result<Self, ParseError> {
        match value.into_value() {
            Value::Object(map) => Ok(map),
            other => Err(ParseError::unexpected_type(&Self::schema(), &other)),
        }
    }
}

/// An untyped sequence, copied as-is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpaqueList(pub Vec<Value>);

impl OpaqueList {
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl Deref for OpaqueList {
    type Target = Vec<Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for OpaqueList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Shaped for OpaqueList {
    fn schema() -> Schema {
        Schema::OpaqueSequence
    }

    fn from_typed(value: TypedValue, _: &Validator) -> Result<Self, ParseError> {
        match value.into_value() {
            Value::Array(items) => Ok(Self(items)),
            other => Err(ParseError::unexpected_type(&Self::schema(), &other)),
        }
    }
}
