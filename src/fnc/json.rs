//! `escapeJson`/`unescapeJson`, and the `mapOf` structural constructor.

use crate::err::{Error, Result};
use crate::schema::{DataType, Record, RecordField, RecordSchema, ScalarKind};
use crate::value::{RecordMap, Value};

fn as_string(v: &Value) -> String {
	match v {
		Value::Null => String::new(),
		other => other.to_display_string(),
	}
}

pub fn escape_json(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	Ok(Value::String(serde_json::to_string(&s).expect("strings always serialize")))
}

/// `unescapeJson(value, convertToRecord?, recurse?)`: parses a JSON string.
/// When `convertToRecord` is set, JSON objects become `Value::Record`s with
/// an inferred schema; `recurse` controls whether that conversion applies to
/// nested objects too (otherwise only the top-level object converts).
pub fn unescape_json(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let convert_to_record = args.get(1).map(Value::is_truthy).unwrap_or(false);
	let recurse = args.get(2).map(Value::is_truthy).unwrap_or(false);
	let parsed: serde_json::Value =
		serde_json::from_str(&s).map_err(|e| Error::eval(format!("unescapeJson: {e}")))?;
	Ok(from_json(parsed, convert_to_record, recurse, true))
}

fn from_json(v: serde_json::Value, convert_to_record: bool, recurse: bool, top_level: bool) -> Value {
	match v {
		serde_json::Value::Null => Value::Null,
		serde_json::Value::Bool(b) => Value::Bool(b),
		serde_json::Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				Value::Long(i)
			} else {
				Value::Double(n.as_f64().unwrap_or_default())
			}
		}
		serde_json::Value::String(s) => Value::String(s),
		serde_json::Value::Array(items) => Value::Array(
			items.into_iter().map(|v| from_json(v, convert_to_record, recurse, false)).collect(),
		),
		serde_json::Value::Object(map) => {
			let child_convert = convert_to_record && (top_level || recurse);
			let mut record_map = RecordMap::new();
			for (k, v) in map {
				record_map.insert(k, from_json(v, convert_to_record, recurse, false));
			}
			if child_convert {
				Value::Record(record_from_map(record_map))
			} else {
				Value::Map(record_map)
			}
		}
	}
}

fn record_from_map(map: RecordMap) -> Record {
	let fields: Vec<RecordField> =
		map.iter().map(|(k, v)| RecordField::synthesize(k, inferred_type_of(v))).collect();
	Record::new(RecordSchema::new(fields), map)
}

fn inferred_type_of(v: &Value) -> DataType {
	match v {
		Value::Null => DataType::Scalar(ScalarKind::Null),
		Value::Bool(_) => DataType::Scalar(ScalarKind::Bool),
		Value::Int(_) | Value::Long(_) => DataType::Scalar(ScalarKind::Long),
		Value::Float(_) => DataType::Scalar(ScalarKind::Float),
		Value::Double(_) => DataType::Scalar(ScalarKind::Double),
		Value::String(_) => DataType::Scalar(ScalarKind::String),
		Value::Bytes(_) => DataType::Scalar(ScalarKind::Bytes),
		Value::Date(_) => DataType::Scalar(ScalarKind::Date),
		Value::Array(items) => {
			DataType::Array(Box::new(items.first().map(inferred_type_of).unwrap_or(DataType::Scalar(ScalarKind::Null))))
		}
		Value::Map(_) => DataType::Map(Box::new(DataType::Scalar(ScalarKind::String))),
		Value::Record(r) => DataType::Record(r.schema().clone()),
	}
}

/// `mapOf(k1, v1, k2, v2, ...)`. Arity must be even; the parser rejects an
/// odd argument count before this ever runs.
pub fn map_of(args: &[Value]) -> Result<Value> {
	let mut map = RecordMap::new();
	for pair in args.chunks_exact(2) {
		map.insert(as_string(&pair[0]), pair[1].clone());
	}
	Ok(Value::Map(map))
}
