//! Focused checks of quantified invariants that are practical to assert
//! without a property-testing harness.

use recordpath::{compile, DataType, Record, RecordField, RecordMap, RecordSchema, ScalarKind, Value};

fn balances_record() -> Record {
	let schema = RecordSchema::new(vec![RecordField::new(
		"balance",
		DataType::Scalar(ScalarKind::Long),
		false,
	)]);
	let mut values = RecordMap::new();
	values.insert("balance".into(), Value::Long(10));
	Record::new(schema, values)
}

/// Invariant 2: every emitted field-value other than the root `/` case has
/// a non-empty parent; the root case's parent is empty.
#[test]
fn non_root_field_values_always_have_a_parent() {
	let record = balances_record();

	let root = compile("/").unwrap().evaluate(&record).unwrap();
	assert_eq!(root.len(), 1);
	assert!(root[0].parent().is_none());

	let child = compile("/balance").unwrap().evaluate(&record).unwrap();
	assert_eq!(child.len(), 1);
	assert!(child[0].parent().is_some());
}

/// Invariant 3: an array-element field-value's `array_index` is in bounds
/// for the array it was selected from.
#[test]
fn array_element_index_is_in_bounds() {
	let schema = RecordSchema::new(vec![RecordField::new(
		"numbers",
		DataType::Array(Box::new(DataType::Scalar(ScalarKind::Long))),
		false,
	)]);
	let mut values = RecordMap::new();
	values.insert("numbers".into(), Value::Array((0..5).map(Value::Long).collect()));
	let record = Record::new(schema, values);

	let selected = compile("/numbers[*]").unwrap().evaluate(&record).unwrap();
	assert_eq!(selected.len(), 5);
	for fv in &selected {
		let idx = fv.array_index().unwrap();
		assert!(idx < 5);
	}
}

/// Invariant 5: `//x` enumerates exactly the multiset a manual depth-first
/// walk collecting children named `x` would produce.
#[test]
fn descendant_search_matches_a_manual_dfs_walk() {
	fn leaf(id: i64) -> Record {
		let schema = RecordSchema::new(vec![RecordField::new("id", DataType::Scalar(ScalarKind::Long), false)]);
		let mut values = RecordMap::new();
		values.insert("id".into(), Value::Long(id));
		Record::new(schema, values)
	}

	let mid_schema = RecordSchema::new(vec![
		RecordField::new("id", DataType::Scalar(ScalarKind::Long), false),
		RecordField::new("child", DataType::Record(RecordSchema::default()), false),
	]);
	let mut mid_values = RecordMap::new();
	mid_values.insert("id".into(), Value::Long(2));
	mid_values.insert("child".into(), Value::Record(leaf(3)));
	let mid = Record::new(mid_schema, mid_values);

	let root_schema = RecordSchema::new(vec![
		RecordField::new("id", DataType::Scalar(ScalarKind::Long), false),
		RecordField::new("child", DataType::Record(RecordSchema::default()), false),
	]);
	let mut root_values = RecordMap::new();
	root_values.insert("id".into(), Value::Long(1));
	root_values.insert("child".into(), Value::Record(mid));
	let root = Record::new(root_schema, root_values);

	let results = compile("//id").unwrap().evaluate(&root).unwrap();
	let values: Vec<_> = results.iter().map(|fv| fv.value().clone()).collect();
	// Manual depth-first, schema-declared-order walk collecting every `id`.
	assert_eq!(values, vec![Value::Long(1), Value::Long(2), Value::Long(3)]);
}

/// Invariant 4: `updateValue` followed by re-evaluation returns the same
/// value at the same position.
#[test]
fn update_then_reevaluate_is_idempotent() {
	let mut record = balances_record();
	let compiled = compile("/balance").unwrap();

	let first = compiled.evaluate(&record).unwrap();
	first[0].update_value(&mut record, Value::Long(42)).unwrap();

	let second = compiled.evaluate(&record).unwrap();
	assert_eq!(second[0].value(), &Value::Long(42));

	second[0].update_value(&mut record, Value::Long(42)).unwrap();
	let third = compiled.evaluate(&record).unwrap();
	assert_eq!(third[0].value(), &Value::Long(42));
}

/// Invariant 6: `base64Decode(base64Encode(s)) == s`, and
/// `toString(toBytes(s, c), c) == s` for a supported charset.
#[test]
fn base64_and_charset_round_trip() {
	let record = balances_record();

	let via_base64 =
		compile("toString(base64Decode(base64Encode('round trip me')), 'utf-8')").unwrap().evaluate(&record).unwrap();
	assert_eq!(via_base64[0].value(), &Value::String("round trip me".into()));

	let via_utf16 = compile("toString(toBytes('héllo', 'utf-16'), 'utf-16')").unwrap().evaluate(&record).unwrap();
	assert_eq!(via_utf16[0].value(), &Value::String("héllo".into()));
}

/// `[./x = ./x]` is equivalent to "keeps all field-values that possess
/// field `x`": a field missing `x` is excluded, not compared false.
#[test]
fn reflexive_predicate_keeps_exactly_the_fields_that_have_the_referenced_path() {
	fn with_balance(balance: i64) -> Record {
		let schema = RecordSchema::new(vec![RecordField::new("balance", DataType::Scalar(ScalarKind::Long), false)]);
		let mut values = RecordMap::new();
		values.insert("balance".into(), Value::Long(balance));
		Record::new(schema, values)
	}
	fn without_balance() -> Record {
		let schema = RecordSchema::new(vec![RecordField::new("name", DataType::Scalar(ScalarKind::String), false)]);
		let mut values = RecordMap::new();
		values.insert("name".into(), Value::String("no-balance".into()));
		Record::new(schema, values)
	}

	let outer_schema = RecordSchema::new(vec![
		RecordField::new("a", DataType::Record(RecordSchema::default()), false),
		RecordField::new("b", DataType::Record(RecordSchema::default()), false),
	]);
	let mut outer_values = RecordMap::new();
	outer_values.insert("a".into(), Value::Record(with_balance(5)));
	outer_values.insert("b".into(), Value::Record(without_balance()));
	let outer = Record::new(outer_schema, outer_values);

	let compiled = compile("/*[./balance = ./balance]").unwrap();
	let results = compiled.evaluate(&outer).unwrap();
	assert_eq!(results.len(), 1);
	assert_eq!(results[0].field().name, "a");
}
