//! Evaluates a compiled path against a root field-value, producing the
//! ordered stream of field-values it selects.

pub mod predicate;

use crate::cnf::MAX_COMPUTATION_DEPTH;
use crate::err::{Error, Result};
use crate::fieldvalue::{AccessStep, FieldValue};
use crate::path::ast::*;
use crate::schema::{DataType, RecordField, ScalarKind};
use crate::value::Value;

fn synth_field(name: impl Into<String>) -> RecordField {
	RecordField::synthesize(name, DataType::Scalar(ScalarKind::Null))
}

fn check_depth(depth: u32) -> Result<()> {
	if depth > *MAX_COMPUTATION_DEPTH {
		Err(Error::eval("maximum computation depth exceeded"))
	} else {
		Ok(())
	}
}

/// Evaluates a top-level `Expr` (a path, or a bare function call) relative
/// to `root` and the current `context` (the two coincide unless we're inside
/// a relative sub-expression).
pub fn eval_expr(expr: &Expr, root: &FieldValue, context: &FieldValue, depth: u32) -> Result<Vec<FieldValue>> {
	check_depth(depth)?;
	match expr {
		Expr::Path(segments) => eval_path(segments, root, context, depth),
		Expr::Function(fc) => eval_function_stream(fc, root, context, depth),
	}
}

/// Evaluates a sequence of path segments. The first segment's axis decides
/// whether the walk starts from `root` (`/`, `//`) or `context` (`.`, `..`).
fn eval_path(segments: &[PathSegment], root: &FieldValue, context: &FieldValue, depth: u32) -> Result<Vec<FieldValue>> {
	let Some(first) = segments.first() else {
		return Ok(Vec::new());
	};
	let mut current = match first.axis {
		Axis::Child | Axis::Descendant => vec![root.clone()],
		Axis::Parent | Axis::SelfAxis => vec![context.clone()],
	};
	for segment in segments {
		check_depth(depth)?;
		current = apply_axis_step(segment.axis, segment.step.as_ref(), current, root, depth)?;
		for group in &segment.index_groups {
			current = apply_index_group(group, current, root, depth)?;
		}
	}
	Ok(current)
}

fn apply_axis_step(
	axis: Axis,
	step: Option<&Step>,
	current: Vec<FieldValue>,
	root: &FieldValue,
	depth: u32,
) -> Result<Vec<FieldValue>> {
	let mut out = Vec::new();
	match axis {
		Axis::SelfAxis => out = current,
		Axis::Parent => {
			for fv in &current {
				if let Some(p) = fv.parent().and_then(|p| p.parent_record()) {
					out.push(p.clone());
				}
			}
		}
		Axis::Child => {
			for fv in &current {
				apply_step_to(fv, step, root, depth, &mut out)?;
			}
		}
		Axis::Descendant => {
			for fv in &current {
				for descendant in descendants(fv) {
					apply_step_to(&descendant, step, root, depth, &mut out)?;
				}
			}
		}
	}
	Ok(out)
}

/// Applies a single step (name / wildcard / function) against one
/// field-value, pushing any results into `out`. Shared by the child and
/// descendant axes: a descendant walk just calls this once per visited node.
fn apply_step_to(fv: &FieldValue, step: Option<&Step>, root: &FieldValue, depth: u32, out: &mut Vec<FieldValue>) -> Result<()> {
	match step {
		None => out.push(fv.clone()),
		Some(Step::Function(fc)) => out.extend(eval_function_stream(fc, root, fv, depth)?),
		Some(Step::Name(name)) => {
			if let Value::Record(rec) = fv.value() {
				if let Some(v) = rec.value_of(name) {
					let field = rec.get_field(name).cloned().unwrap_or_else(|| synth_field(name.clone()));
					out.push(FieldValue::child(fv, v.clone(), field, None, AccessStep::Field(name.clone())));
				}
			}
		}
		Some(Step::Wildcard) => {
			if let Value::Record(rec) = fv.value() {
				for name in rec.field_names().map(str::to_owned).collect::<Vec<_>>() {
					let v = rec.value_of(&name).cloned().unwrap_or(Value::Null);
					let field = rec.get_field(&name).cloned().unwrap_or_else(|| synth_field(name.clone()));
					out.push(FieldValue::child(fv, v, field, None, AccessStep::Field(name)));
				}
			}
		}
	}
	Ok(())
}

/// DFS pre-order over every field-value nested under `fv` (not including
/// `fv` itself): record fields in schema order, array elements in order,
/// map entries in insertion order.
fn descendants(fv: &FieldValue) -> Vec<FieldValue> {
	let mut out = Vec::new();
	collect_descendants(fv, &mut out);
	out
}

fn collect_descendants(fv: &FieldValue, out: &mut Vec<FieldValue>) {
	match fv.value() {
		Value::Record(rec) => {
			for name in rec.field_names().map(str::to_owned).collect::<Vec<_>>() {
				let v = rec.value_of(&name).cloned().unwrap_or(Value::Null);
				let field = rec.get_field(&name).cloned().unwrap_or_else(|| synth_field(name.clone()));
				let child = FieldValue::child(fv, v, field, None, AccessStep::Field(name));
				out.push(child.clone());
				collect_descendants(&child, out);
			}
		}
		Value::Array(items) => {
			for (i, v) in items.iter().enumerate() {
				let field = fv.field().clone();
				let child = FieldValue::child(fv, v.clone(), field, Some(i), AccessStep::ArrayIndex(i));
				out.push(child.clone());
				collect_descendants(&child, out);
			}
		}
		Value::Map(map) => {
			for (k, v) in map.iter() {
				let field = synth_field(k);
				let child = FieldValue::child(fv, v.clone(), field, None, AccessStep::MapKey(k.to_owned()));
				out.push(child.clone());
				collect_descendants(&child, out);
			}
		}
		_ => {}
	}
}

fn resolve_index(idx: i64, len: usize) -> Option<usize> {
	let resolved = if idx < 0 {
		len as i64 + idx
	} else {
		idx
	};
	if resolved >= 0 && (resolved as usize) < len {
		Some(resolved as usize)
	} else {
		None
	}
}

/// Applies one `[...]` group to the current stream. Items within a group run
/// in the order they were written, and that written order, not array order,
/// governs the order of the emitted results (e.g. `[3,6,-1,-2]`).
fn apply_index_group(group: &[IndexItem], current: Vec<FieldValue>, root: &FieldValue, depth: u32) -> Result<Vec<FieldValue>> {
	let mut out = Vec::new();
	for fv in &current {
		for item in group {
			match item {
				IndexItem::Index(n) => {
					if let Value::Array(items) = fv.value() {
						if let Some(i) = resolve_index(*n, items.len()) {
							let field = fv.field().clone();
							out.push(FieldValue::child(fv, items[i].clone(), field, Some(i), AccessStep::ArrayIndex(i)));
						}
					}
				}
				IndexItem::Range(a, b) => {
					if let Value::Array(items) = fv.value() {
						let len = items.len();
						if let (Some(lo), Some(hi)) = (resolve_index(*a, len), resolve_index(*b, len)) {
							if lo <= hi {
								for i in lo..=hi {
									let field = fv.field().clone();
									out.push(FieldValue::child(
										fv,
										items[i].clone(),
										field,
										Some(i),
										AccessStep::ArrayIndex(i),
									));
								}
							}
						}
					}
				}
				IndexItem::Wildcard => match fv.value() {
					Value::Array(items) => {
						for (i, v) in items.iter().enumerate() {
							let field = fv.field().clone();
							out.push(FieldValue::child(fv, v.clone(), field, Some(i), AccessStep::ArrayIndex(i)));
						}
					}
					Value::Map(map) => {
						for (k, v) in map.iter() {
							let field = synth_field(k);
							out.push(FieldValue::child(fv, v.clone(), field, None, AccessStep::MapKey(k.to_owned())));
						}
					}
					_ => {}
				},
				IndexItem::Key(k) => {
					if let Value::Map(map) = fv.value() {
						if let Some(v) = map.get(k) {
							let field = synth_field(k.clone());
							out.push(FieldValue::child(fv, v.clone(), field, None, AccessStep::MapKey(k.clone())));
						}
					}
				}
				IndexItem::Predicate(p) => {
					if predicate::predicate_matches(p, fv, root, depth)? {
						out.push(fv.clone());
					}
				}
			}
		}
	}
	Ok(out)
}

/// Resolves one function argument to the field-value stream it denotes.
fn eval_arg_stream(arg: &PredValue, root: &FieldValue, context: &FieldValue, depth: u32) -> Result<Vec<FieldValue>> {
	match arg {
		PredValue::Literal(v) => Ok(vec![FieldValue::computed(v.clone(), synth_field("literal"))]),
		PredValue::Path(segments) => eval_path(segments, root, context, depth),
		PredValue::Function(fc) => eval_function_stream(fc, root, context, depth),
	}
}

/// Resolves one argument to its first value (`Value::Null` if its stream is
/// empty). This is what every scalar-shaped built-in receives.
fn first_value(arg: &PredValue, root: &FieldValue, context: &FieldValue, depth: u32) -> Result<Value> {
	let stream = eval_arg_stream(arg, root, context, depth)?;
	Ok(stream.first().map(|fv| fv.value().clone()).unwrap_or(Value::Null))
}

/// Evaluates a function call into the stream of field-values it produces.
/// Most built-ins are scalar: they resolve every argument to a single value
/// and return exactly one result. A few (`count`, `coalesce`, `fieldName`,
/// `anchored`) need the evaluated field-value stream itself, not just its
/// first value, so they're special-cased here rather than funnelled through
/// [`crate::fnc::run`].
pub(crate) fn eval_function_stream(fc: &FunctionCall, root: &FieldValue, context: &FieldValue, depth: u32) -> Result<Vec<FieldValue>> {
	check_depth(depth + 1)?;
	let name_field = || synth_field(fc.name.clone());
	match fc.name.as_str() {
		"count" => {
			let stream = eval_arg_stream(&fc.args[0], root, context, depth + 1)?;
			Ok(vec![FieldValue::computed(Value::Long(stream.len() as i64), name_field())])
		}
		"coalesce" => {
			for arg in &fc.args {
				let v = first_value(arg, root, context, depth + 1)?;
				if !v.is_null() {
					return Ok(vec![FieldValue::computed(v, name_field())]);
				}
			}
			Ok(Vec::new())
		}
		"fieldName" => {
			let stream = eval_arg_stream(&fc.args[0], root, context, depth + 1)?;
			Ok(stream
				.first()
				.map(|fv| FieldValue::computed(Value::String(fv.field().name.clone()), name_field()))
				.into_iter()
				.collect())
		}
		"anchored" => {
			// `anchored(anchor, path)`: evaluates `path` relative to each
			// value selected by `anchor`, concatenating every result.
			let anchors = eval_arg_stream(&fc.args[0], root, context, depth + 1)?;
			let PredValue::Path(segments) = &fc.args[1] else {
				return Err(Error::eval("anchored: second argument must be a path"));
			};
			let mut out = Vec::new();
			for anchor in &anchors {
				out.extend(eval_path(segments, root, anchor, depth + 1)?);
			}
			Ok(out)
		}
		name => {
			let mut values = Vec::with_capacity(fc.args.len());
			for arg in &fc.args {
				values.push(first_value(arg, root, context, depth + 1)?);
			}
			let result = crate::fnc::run(name, &values)?;
			Ok(vec![FieldValue::computed(result, name_field())])
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{Record, RecordSchema};
	use crate::value::RecordMap;

	fn root_fv(record: Record) -> FieldValue {
		FieldValue::root(Value::Record(record), synth_field(""))
	}

	fn flat_person() -> Record {
		let schema = RecordSchema::new(vec![
			RecordField::new("name", DataType::Scalar(ScalarKind::String), false),
			RecordField::new(
				"numbers",
				DataType::Array(Box::new(DataType::Scalar(ScalarKind::Long))),
				false,
			),
		]);
		let mut values = RecordMap::new();
		values.insert("name".into(), Value::String("Ada".into()));
		values.insert("numbers".into(), Value::Array((0..10).map(Value::Long).collect()));
		Record::new(schema, values)
	}

	#[test]
	fn child_multi_index_preserves_listed_order() {
		let record = flat_person();
		let root = root_fv(record);
		let expr = crate::path::parser::parse("/numbers[3,6,-1,-2]").unwrap();
		let results = eval_expr(&expr, &root, &root, 0).unwrap();
		let values: Vec<_> = results.iter().map(|fv| fv.value().clone()).collect();
		assert_eq!(values, vec![Value::Long(3), Value::Long(6), Value::Long(9), Value::Long(8)]);
	}

	#[test]
	fn wildcard_child_visits_fields_in_schema_order() {
		let record = flat_person();
		let root = root_fv(record);
		let expr = crate::path::parser::parse("/*").unwrap();
		let results = eval_expr(&expr, &root, &root, 0).unwrap();
		assert_eq!(results[0].field().name, "name");
		assert_eq!(results[1].field().name, "numbers");
	}

	#[test]
	fn descendant_search_finds_nested_field_by_name() {
		let inner_schema = RecordSchema::new(vec![RecordField::new("id", DataType::Scalar(ScalarKind::Long), false)]);
		let mut inner_values = RecordMap::new();
		inner_values.insert("id".into(), Value::Long(7));
		let inner = Record::new(inner_schema, inner_values);

		let outer_schema = RecordSchema::new(vec![RecordField::new(
			"child",
			DataType::Record(RecordSchema::default()),
			false,
		)]);
		let mut outer_values = RecordMap::new();
		outer_values.insert("child".into(), Value::Record(inner));
		let outer = Record::new(outer_schema, outer_values);

		let root = root_fv(outer);
		let expr = crate::path::parser::parse("//id").unwrap();
		let results = eval_expr(&expr, &root, &root, 0).unwrap();
		assert_eq!(results.len(), 1);
		assert_eq!(results[0].value(), &Value::Long(7));
	}

	#[test]
	fn parent_axis_skips_the_array_wrapper() {
		let record = flat_person();
		let root = root_fv(record);
		let expr = crate::path::parser::parse("/numbers[0]/..").unwrap();
		let results = eval_expr(&expr, &root, &root, 0).unwrap();
		assert_eq!(results.len(), 1);
		assert!(matches!(results[0].value(), Value::Record(_)));
	}

	#[test]
	fn count_reports_stream_length() {
		let record = flat_person();
		let root = root_fv(record);
		let expr = crate::path::parser::parse("count(/numbers)").unwrap();
		let results = eval_expr(&expr, &root, &root, 0).unwrap();
		assert_eq!(results[0].value(), &Value::Long(1));
	}

	#[test]
	fn coalesce_skips_null_arguments() {
		let record = flat_person();
		let root = root_fv(record);
		let expr = crate::path::parser::parse("coalesce(/missing, /name)").unwrap();
		let results = eval_expr(&expr, &root, &root, 0).unwrap();
		assert_eq!(results[0].value(), &Value::String("Ada".into()));
	}

	#[test]
	fn field_name_returns_the_selected_fields_name() {
		let record = flat_person();
		let root = root_fv(record);
		let expr = crate::path::parser::parse("fieldName(/numbers)").unwrap();
		let results = eval_expr(&expr, &root, &root, 0).unwrap();
		assert_eq!(results[0].value(), &Value::String("numbers".into()));
	}
}
