//! The field-value model: a runtime wrapper around a selected [`Value`],
//! carrying the schema field it came from and a back-link to its parent.
//!
//! Rather than threading live borrows of the original record through a
//! lazily-evaluated stream, which the borrow checker makes unpleasant for a
//! tree with back-links, each [`FieldValue`] is a reference-counted node in a
//! short-lived evaluation arena (`Rc`), holding an owned `Value` plus a recorded
//! "access path" from the root. `update_value` replays that access path
//! against a caller-supplied `&mut Record`, which is why its signature takes
//! the root explicitly rather than mutating through a buried pointer.

use crate::err::{Error, Result};
use crate::schema::{Record, RecordField};
use crate::value::Value;
use std::rc::Rc;

/// One step of the path from the evaluation root down to a field-value,
/// recorded so `update_value` can re-descend into the root and mutate the
/// right slot.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AccessStep {
	Field(String),
	ArrayIndex(usize),
	MapKey(String),
}

#[derive(Debug)]
struct Inner {
	value: Value,
	field: RecordField,
	array_index: Option<usize>,
	parent: Option<FieldValue>,
	access: Vec<AccessStep>,
	mutable: bool,
}

/// A selected value, its schema field, and a back-link to its parent.
///
/// Field-values are comparable by `value()` only (Invariant: "identity is
/// not meaningful").
#[derive(Clone, Debug)]
pub struct FieldValue(Rc<Inner>);

impl PartialEq for FieldValue {
	fn eq(&self, other: &Self) -> bool {
		self.0.value == other.0.value
	}
}

impl FieldValue {
	/// The root field-value: its `parent()` is empty, and `update_value`
	/// rejects it since there is no parent container to write back into.
	pub fn root(value: Value, field: RecordField) -> Self {
		FieldValue(Rc::new(Inner {
			value,
			field,
			array_index: None,
			parent: None,
			access: Vec::new(),
			mutable: false,
		}))
	}

	pub(crate) fn child(
		parent: &FieldValue,
		value: Value,
		field: RecordField,
		array_index: Option<usize>,
		step: AccessStep,
	) -> Self {
		let mut access = parent.0.access.clone();
		access.push(step);
		FieldValue(Rc::new(Inner {
			value,
			field,
			array_index,
			parent: Some(parent.clone()),
			access,
			mutable: true,
		}))
	}

	/// A field-value produced by a function call: pure, unparented, and
	/// never mutable (Invariant 5).
	pub fn computed(value: Value, field: RecordField) -> Self {
		FieldValue(Rc::new(Inner {
			value,
			field,
			array_index: None,
			parent: None,
			access: Vec::new(),
			mutable: false,
		}))
	}

	pub fn value(&self) -> &Value {
		&self.0.value
	}

	pub fn into_value(self) -> Value {
		match Rc::try_unwrap(self.0) {
			Ok(inner) => inner.value,
			Err(rc) => rc.value.clone(),
		}
	}

	pub fn field(&self) -> &RecordField {
		&self.0.field
	}

	pub fn parent(&self) -> Option<&FieldValue> {
		self.0.parent.as_ref()
	}

	/// The nearest ancestor (including `self`) whose value is a `Record`.
	pub fn parent_record(&self) -> Option<&FieldValue> {
		let mut cur = Some(self);
		while let Some(fv) = cur {
			if matches!(fv.value(), Value::Record(_)) {
				return Some(fv);
			}
			cur = fv.parent();
		}
		None
	}

	/// Only defined for array-slot field-values.
	pub fn array_index(&self) -> Option<usize> {
		self.0.array_index
	}

	/// Mutates the container this field-value was selected from, through
	/// its recorded access path against `root`.
	///
	/// - parent is a Record: sets the named field, coercing via the
	///   schema's `DataType`; inactive fields are recorded for later
	///   `incorporate_inactive_fields`.
	/// - parent is an Array: replaces the element at `array_index`;
	///   out-of-bounds is a no-op.
	/// - parent is a Map: sets the string-keyed entry.
	/// - root or function-derived field-values: `Error::NotMutable`.
	pub fn update_value(&self, root: &mut Record, new: Value) -> Result<()> {
		if !self.0.mutable || self.0.access.is_empty() {
			return Err(Error::NotMutable);
		}
		set_along_path(root, &self.0.access, new)
	}
}

fn set_along_path(root: &mut Record, steps: &[AccessStep], new: Value) -> Result<()> {
	match steps {
		[] => Err(Error::NotMutable),
		[AccessStep::Field(name)] => {
			root.set_value(name, new);
			Ok(())
		}
		[AccessStep::Field(name), rest @ ..] => {
			let container = root_container_mut(root, name)?;
			set_in_value(container, rest, new)
		}
		_ => Err(Error::NotMutable),
	}
}

fn root_container_mut<'a>(root: &'a mut Record, name: &str) -> Result<&'a mut Value> {
	root.value_of_mut(name).ok_or(Error::NotMutable)
}

fn set_in_value(container: &mut Value, steps: &[AccessStep], new: Value) -> Result<()> {
	match steps {
		[] => {
			*container = new;
			Ok(())
		}
		[AccessStep::Field(name)] => match container {
			Value::Record(rec) => {
				rec.set_value(name, new);
				Ok(())
			}
			_ => Err(Error::NotMutable),
		},
		[AccessStep::ArrayIndex(i)] => match container {
			Value::Array(items) => {
				if let Some(slot) = items.get_mut(*i) {
					*slot = new;
				}
				Ok(())
			}
			_ => Err(Error::NotMutable),
		},
		[AccessStep::MapKey(k)] => match container {
			Value::Map(map) => {
				map.insert(k.clone(), new);
				Ok(())
			}
			_ => Err(Error::NotMutable),
		},
		[step, rest @ ..] => {
			let next = match (step, container) {
				(AccessStep::Field(name), Value::Record(rec)) => {
					rec.value_of_mut(name).ok_or(Error::NotMutable)?
				}
				(AccessStep::ArrayIndex(i), Value::Array(items)) => {
					items.get_mut(*i).ok_or(Error::NotMutable)?
				}
				(AccessStep::MapKey(k), Value::Map(map)) => map.get_mut_or_insert(k),
				_ => return Err(Error::NotMutable),
			};
			set_in_value(next, rest, new)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{DataType, RecordSchema, ScalarKind};
	use crate::value::RecordMap;

	fn sample() -> Record {
		let schema = RecordSchema::new(vec![crate::schema::RecordField::new(
			"numbers",
			DataType::Array(Box::new(DataType::Scalar(ScalarKind::Long))),
			false,
		)]);
		let mut values = RecordMap::new();
		values.insert("numbers".into(), Value::Array((0..10).map(Value::Long).collect()));
		Record::new(schema, values)
	}

	#[test]
	fn root_is_not_mutable() {
		let mut record = sample();
		let field = RecordField::synthesize("numbers", DataType::Array(Box::new(DataType::Scalar(ScalarKind::Long))));
		let root = FieldValue::root(Value::Record(record.clone()), field);
		assert_eq!(root.update_value(&mut record, Value::Null), Err(Error::NotMutable));
	}

	#[test]
	fn array_index_update_mutates_root() {
		let mut record = sample();
		let root_field = RecordField::synthesize("", DataType::Scalar(ScalarKind::Null));
		let root = FieldValue::root(Value::Record(record.clone()), root_field);
		let arr_field = RecordField::synthesize(
			"numbers",
			DataType::Array(Box::new(DataType::Scalar(ScalarKind::Long))),
		);
		let arr_fv =
			FieldValue::child(&root, Value::Null, arr_field.clone(), None, AccessStep::Field("numbers".into()));
		let slot_field = RecordField::synthesize("numbers", DataType::Scalar(ScalarKind::Long));
		let slot = FieldValue::child(
			&arr_fv,
			Value::Long(3),
			slot_field,
			Some(3),
			AccessStep::ArrayIndex(3),
		);
		slot.update_value(&mut record, Value::Long(99)).unwrap();
		match record.value_of("numbers").unwrap() {
			Value::Array(items) => assert_eq!(items[3], Value::Long(99)),
			_ => panic!("expected array"),
		}
	}
}
