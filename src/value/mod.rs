//! The runtime value model.

pub mod coerce;
pub mod map;

pub use map::RecordMap;

use crate::schema::Record;
use chrono::{DateTime, Utc};
use std::fmt::{self, Display, Formatter};

/// A value held by a record, array slot, map entry, or produced by a
/// function call.
///
/// Numeric kinds promote through `Int -> Long -> Float -> Double` for
/// arithmetic and comparison; `Int` and `Long` share an `i64` representation
/// here since the distinction is schema-level, not representational.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Long(i64),
	Float(f32),
	Double(f64),
	String(String),
	Bytes(Vec<u8>),
	Date(DateTime<Utc>),
	Array(Vec<Value>),
	Map(RecordMap),
	Record(Record),
}

impl Default for Value {
	fn default() -> Self {
		Value::Null
	}
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn is_truthy(&self) -> bool {
		match self {
			Value::Null => false,
			Value::Bool(b) => *b,
			Value::String(s) => !s.is_empty(),
			Value::Array(a) => !a.is_empty(),
			_ => true,
		}
	}

	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Value::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&RecordMap> {
		match self {
			Value::Map(m) => Some(m),
			_ => None,
		}
	}

	pub fn as_record(&self) -> Option<&Record> {
		match self {
			Value::Record(r) => Some(r),
			_ => None,
		}
	}

	/// `true` for numeric kinds (`Int`, `Long`, `Float`, `Double`).
	pub fn is_numeric(&self) -> bool {
		matches!(self, Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_))
	}

	/// Best-effort conversion to `f64`, including numeric-string parsing.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int(n) | Value::Long(n) => Some(*n as f64),
			Value::Float(n) => Some(*n as f64),
			Value::Double(n) => Some(*n),
			Value::String(s) => s.trim().parse::<f64>().ok(),
			Value::Bool(b) => Some(if *b {
				1.0
			} else {
				0.0
			}),
			_ => None,
		}
	}

	/// Stringifies any value (used by `concat`, `join`, `replace`'s
	/// replacement argument, etc.).
	pub fn to_display_string(&self) -> String {
		match self {
			Value::String(s) => s.clone(),
			Value::Null => String::new(),
			other => other.to_string(),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		match self {
			Value::Null => f.write_str("NULL"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Int(n) | Value::Long(n) => write!(f, "{n}"),
			Value::Float(n) => write!(f, "{n}"),
			Value::Double(n) => write!(f, "{n}"),
			Value::String(s) => f.write_str(s),
			Value::Bytes(b) => write!(f, "{b:?}"),
			Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
			Value::Array(a) => {
				f.write_str("[")?;
				for (i, v) in a.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{v}")?;
				}
				f.write_str("]")
			}
			Value::Map(m) => write!(f, "{m}"),
			Value::Record(r) => write!(f, "{r}"),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Long(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(v as i64)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Double(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::String(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::String(v.to_owned())
	}
}

impl From<Vec<u8>> for Value {
	fn from(v: Vec<u8>) -> Self {
		Value::Bytes(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::Array(v)
	}
}
