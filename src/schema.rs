//! A minimal record/schema collaborator.
//!
//! The record/schema library is normally an external dependency; this crate
//! ships a self-contained implementation of the contract it requires
//! (`value_of`, `set_value`, `schema`, `get_field`, `field_names`, `to_map`)
//! so the engine is runnable on its own.

use crate::value::{RecordMap, Value};
use std::fmt::{self, Display, Formatter};

/// The scalar kinds a `DataType::Scalar` may describe.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScalarKind {
	Null,
	Bool,
	Int,
	Long,
	Float,
	Double,
	String,
	Bytes,
	Date,
}

/// The type of a [`RecordField`]. `Choice` resolves to the first alternative
/// whose runtime kind matches a given value.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum DataType {
	Scalar(ScalarKind),
	Array(Box<DataType>),
	Map(Box<DataType>),
	Record(RecordSchema),
	Choice(Vec<DataType>),
}

impl DataType {
	/// Returns the first alternative (for `Choice`) or `self` whose kind
	/// matches `value`'s runtime kind, falling back to the first
	/// alternative if none match (mirrors a permissive schema reader).
	pub fn resolve_for<'a>(&'a self, value: &Value) -> &'a DataType {
		match self {
			DataType::Choice(alts) => alts
				.iter()
				.find(|alt| alt.matches_kind(value))
				.unwrap_or_else(|| alts.first().unwrap_or(self)),
			other => other,
		}
	}

	fn matches_kind(&self, value: &Value) -> bool {
		match (self, value) {
			(DataType::Scalar(ScalarKind::Bool), Value::Bool(_)) => true,
			(DataType::Scalar(ScalarKind::Int), Value::Int(_)) => true,
			(DataType::Scalar(ScalarKind::Long), Value::Long(_)) => true,
			(DataType::Scalar(ScalarKind::Float), Value::Float(_)) => true,
			(DataType::Scalar(ScalarKind::Double), Value::Double(_)) => true,
			(DataType::Scalar(ScalarKind::String), Value::String(_)) => true,
			(DataType::Scalar(ScalarKind::Bytes), Value::Bytes(_)) => true,
			(DataType::Scalar(ScalarKind::Date), Value::Date(_)) => true,
			(DataType::Scalar(ScalarKind::Null), Value::Null) => true,
			(DataType::Array(_), Value::Array(_)) => true,
			(DataType::Map(_), Value::Map(_)) => true,
			(DataType::Record(_), Value::Record(_)) => true,
			_ => false,
		}
	}
}

/// A single field of a [`RecordSchema`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordField {
	pub name: String,
	pub data_type: DataType,
	pub nullable: bool,
}

impl RecordField {
	pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
		Self {
			name: name.into(),
			data_type,
			nullable,
		}
	}

	/// Synthesizes a field for an array slot or map entry: the name matches
	/// the containing field, and array slots additionally carry an index.
	pub fn synthesize(name: impl Into<String>, data_type: DataType) -> Self {
		Self::new(name, data_type, true)
	}
}

/// An ordered sequence of [`RecordField`]s. Field order is semantically
/// significant: it drives wildcard iteration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordSchema {
	fields: Vec<RecordField>,
}

impl RecordSchema {
	pub fn new(fields: Vec<RecordField>) -> Self {
		Self {
			fields,
		}
	}

	pub fn fields(&self) -> impl Iterator<Item = &RecordField> {
		self.fields.iter()
	}

	pub fn get_field(&self, name: &str) -> Option<&RecordField> {
		self.fields.iter().find(|f| f.name == name)
	}

	fn push_inactive(&mut self, field: RecordField) {
		if self.get_field(&field.name).is_none() {
			self.fields.push(field);
		}
	}
}

/// A record value: a schema plus a name-keyed mapping of materialized
/// values, with a side set of fields written via `updateValue` but not
/// present in the original schema ("inactive fields").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
	schema: RecordSchema,
	values: RecordMap,
	inactive: Vec<RecordField>,
}

impl Record {
	pub fn new(schema: RecordSchema, values: RecordMap) -> Self {
		Self {
			schema,
			values,
			inactive: Vec::new(),
		}
	}

	pub fn schema(&self) -> &RecordSchema {
		&self.schema
	}

	pub fn value_of(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn value_of_mut(&mut self, name: &str) -> Option<&mut Value> {
		self.values.get_mut(name)
	}

	/// Sets the named field's value, coercing it through the schema's
	/// declared `DataType`. If `name` is not part of the original schema,
	/// it's recorded as an inactive field so `incorporate_inactive_fields`
	/// can promote it later.
	pub fn set_value(&mut self, name: &str, value: Value) {
		let coerced = match self.schema.get_field(name) {
			Some(field) => {
				let resolved = field.data_type.resolve_for(&value).clone();
				crate::value::coerce::coerce_to(value, &resolved)
			}
			None => {
				self.inactive.push(RecordField::synthesize(name, inferred_type(&value)));
				value
			}
		};
		self.values.insert(name.to_owned(), coerced);
	}

	pub fn get_field(&self, name: &str) -> Option<&RecordField> {
		self.schema.get_field(name).or_else(|| self.inactive.iter().find(|f| f.name == name))
	}

	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.schema.fields().map(|f| f.name.as_str())
	}

	pub fn to_map(&self) -> &RecordMap {
		&self.values
	}

	/// Promotes fields written via `updateValue` but absent from the
	/// original schema into the live schema.
	pub fn incorporate_inactive_fields(&mut self) {
		for field in self.inactive.drain(..).collect::<Vec<_>>() {
			self.schema.push_inactive(field);
		}
	}
}

fn inferred_type(value: &Value) -> DataType {
	match value {
		Value::Null => DataType::Scalar(ScalarKind::Null),
		Value::Bool(_) => DataType::Scalar(ScalarKind::Bool),
		Value::Int(_) => DataType::Scalar(ScalarKind::Int),
		Value::Long(_) => DataType::Scalar(ScalarKind::Long),
		Value::Float(_) => DataType::Scalar(ScalarKind::Float),
		Value::Double(_) => DataType::Scalar(ScalarKind::Double),
		Value::String(_) => DataType::Scalar(ScalarKind::String),
		Value::Bytes(_) => DataType::Scalar(ScalarKind::Bytes),
		Value::Date(_) => DataType::Scalar(ScalarKind::Date),
		Value::Array(items) => {
			DataType::Array(Box::new(items.first().map(inferred_type).unwrap_or(DataType::Scalar(ScalarKind::Null))))
		}
		Value::Map(_) => DataType::Map(Box::new(DataType::Scalar(ScalarKind::String))),
		Value::Record(r) => DataType::Record(r.schema.clone()),
	}
}

impl Display for Record {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "{}", self.values)
	}
}
