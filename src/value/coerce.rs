//! Schema-driven and best-effort type coercion.
//!
//! Two call sites, two policies:
//! - `updateValue` coercion is schema-driven: the target `DataType` decides
//!   how a string input should parse.
//! - Comparison coercion is best-effort: numeric-string to number, bytes to
//!   UTF-8 string when compared against a string, otherwise stringify.

use super::Value;
use crate::schema::DataType;
use chrono::DateTime;
use std::cmp::Ordering;

/// Coerces `value` towards `target`, following the schema's declared type.
/// Used by [`crate::fieldvalue::FieldValue::update_value`].
pub fn coerce_to(value: Value, target: &DataType) -> Value {
	match (target, &value) {
		(DataType::Scalar(_), Value::String(s)) => coerce_string_scalar(s, target).unwrap_or(value),
		(DataType::Array(elem), Value::Array(items)) => {
			Value::Array(items.iter().cloned().map(|v| coerce_to(v, elem)).collect())
		}
		_ => value,
	}
}

fn coerce_string_scalar(s: &str, target: &DataType) -> Option<Value> {
	match target {
		DataType::Scalar(crate::schema::ScalarKind::Int) => {
			s.trim().parse::<i64>().ok().map(Value::Int)
		}
		DataType::Scalar(crate::schema::ScalarKind::Long) => {
			s.trim().parse::<i64>().ok().map(Value::Long)
		}
		DataType::Scalar(crate::schema::ScalarKind::Float) => {
			s.trim().parse::<f32>().ok().map(Value::Float)
		}
		DataType::Scalar(crate::schema::ScalarKind::Double) => {
			s.trim().parse::<f64>().ok().map(Value::Double)
		}
		DataType::Scalar(crate::schema::ScalarKind::Date) => {
			DateTime::parse_from_rfc3339(s.trim()).ok().map(|d| Value::Date(d.into()))
		}
		_ => None,
	}
}

/// The outcome of comparing two values. `None` means "not comparable"; the
/// caller (the predicate evaluator) treats that as exclusion, never as an
/// error.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
	match (left, right) {
		(Value::Null, Value::Null) => Some(Ordering::Equal),
		(Value::Null, _) | (_, Value::Null) => None,
		(l, r) if l.is_numeric() && r.is_numeric() => {
			l.as_f64()?.partial_cmp(&r.as_f64()?)
		}
		(Value::String(l), Value::String(r)) => Some(l.cmp(r)),
		(Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
		// Mixed: coerce the right side towards the left side's kind.
		(Value::String(_), r) if r.is_numeric() => {
			let l = left.as_f64()?;
			let r = r.as_f64()?;
			l.partial_cmp(&r)
		}
		(l, Value::String(_)) if l.is_numeric() => {
			let l = l.as_f64()?;
			let r = right.as_f64()?;
			l.partial_cmp(&r)
		}
		(Value::Bytes(b), Value::String(s)) => {
			std::str::from_utf8(b).ok().map(|bs| bs.cmp(s.as_str()))
		}
		(Value::String(s), Value::Bytes(b)) => {
			std::str::from_utf8(b).ok().map(|bs| s.as_str().cmp(bs))
		}
		_ => None,
	}
}

/// `=`/`!=` have bespoke null handling (`null == null` is true,
/// `null == x` is false) that `compare`'s `Ordering` can't express on its
/// own for the `!=` case against incomparable kinds.
pub fn values_equal(left: &Value, right: &Value) -> bool {
	match (left, right) {
		(Value::Null, Value::Null) => true,
		(Value::Null, _) | (_, Value::Null) => false,
		_ => compare(left, right) == Some(Ordering::Equal),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn null_equality_rules() {
		assert!(values_equal(&Value::Null, &Value::Null));
		assert!(!values_equal(&Value::Null, &Value::Int(0)));
		assert!(!values_equal(&Value::Int(0), &Value::Null));
	}

	#[test]
	fn numeric_string_mixed_comparison() {
		assert_eq!(compare(&Value::String("10".into()), &Value::Int(9)), Some(Ordering::Greater));
	}

	#[test]
	fn uncomparable_kinds_are_none() {
		assert_eq!(compare(&Value::Array(vec![]), &Value::Int(1)), None);
	}
}
