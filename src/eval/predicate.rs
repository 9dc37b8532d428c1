//! Predicate evaluation: filter functions and comparisons.
//!
//! A relative path (`./x`) that doesn't resolve from the current field-value
//! is silently excluded, never an error: this file returns `Ok(false)`, not
//! `Err`, whenever a side of a comparison is absent.

use super::{eval_arg_stream, eval_function_stream};
use crate::err::Result;
use crate::fieldvalue::FieldValue;
use crate::path::ast::{CompareOp, Predicate, PredValue};
use crate::value::coerce::{compare, values_equal};
use crate::value::Value;
use std::cmp::Ordering;

pub fn predicate_matches(predicate: &Predicate, fv: &FieldValue, root: &FieldValue, depth: u32) -> Result<bool> {
	match predicate {
		Predicate::Filter(fc) => {
			let stream = eval_function_stream(fc, root, fv, depth + 1)?;
			Ok(stream.first().is_some_and(|result| result.value().is_truthy()))
		}
		Predicate::Comparison(left, op, right) => {
			let l = resolve(left, root, fv, depth)?;
			let r = resolve(right, root, fv, depth)?;
			match (l, r) {
				(Some(l), Some(r)) => {
					let matched = apply_op(*op, &l, &r);
					if !matched && compare(&l, &r).is_none() {
						tracing::debug!(field = %fv.field().name, "predicate absorbed an uncomparable type mismatch");
					}
					Ok(matched)
				}
				_ => {
					tracing::debug!(field = %fv.field().name, "predicate excluded a field-value missing its relative path");
					Ok(false)
				}
			}
		}
	}
}

fn resolve(value: &PredValue, root: &FieldValue, context: &FieldValue, depth: u32) -> Result<Option<Value>> {
	let stream = eval_arg_stream(value, root, context, depth + 1)?;
	Ok(stream.first().map(|fv| fv.value().clone()))
}

fn apply_op(op: CompareOp, l: &Value, r: &Value) -> bool {
	match op {
		CompareOp::Eq => values_equal(l, r),
		CompareOp::Ne => !values_equal(l, r),
		CompareOp::Lt => compare(l, r) == Some(Ordering::Less),
		CompareOp::Le => matches!(compare(l, r), Some(Ordering::Less) | Some(Ordering::Equal)),
		CompareOp::Gt => compare(l, r) == Some(Ordering::Greater),
		CompareOp::Ge => matches!(compare(l, r), Some(Ordering::Greater) | Some(Ordering::Equal)),
	}
}

#[cfg(test)]
mod tests {
	use test_log::test;

	use super::*;
	use crate::schema::{DataType, Record, RecordField, RecordSchema, ScalarKind};
	use crate::value::RecordMap;

	fn sample_root() -> FieldValue {
		let schema = RecordSchema::new(vec![RecordField::new("balance", DataType::Scalar(ScalarKind::Long), false)]);
		let mut values = RecordMap::new();
		values.insert("balance".into(), Value::Long(150));
		let record = Record::new(schema, values);
		FieldValue::root(Value::Record(record), RecordField::synthesize("", DataType::Scalar(ScalarKind::Null)))
	}

	#[test]
	fn missing_relative_path_is_excluded_not_errored() {
		crate::testutil::init_tracing();
		let root = sample_root();
		let expr = crate::path::parser::parse("/balance[./missing = 1]").unwrap();
		let results = crate::eval::eval_expr(&expr, &root, &root, 0).unwrap();
		assert!(results.is_empty());
	}

	#[test]
	fn comparison_against_absolute_reference() {
		let root = sample_root();
		let expr = crate::path::parser::parse("/balance[. > 100]").unwrap();
		let results = crate::eval::eval_expr(&expr, &root, &root, 0).unwrap();
		assert_eq!(results.len(), 1);
	}
}
