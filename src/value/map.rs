//! An insertion-ordered string-keyed map.
//!
//! `Value::Map` must iterate in insertion order: wildcard selection visits
//! entries in the order they were declared or inserted, so a `BTreeMap` is
//! the wrong collection for this despite being a common default elsewhere.

use super::Value;
use std::fmt::{self, Display, Formatter};

/// Invariant: keys are unique within a `RecordMap`.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct RecordMap(pub(crate) Vec<(String, Value)>);

impl RecordMap {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
		self.0.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Returns a mutable reference to `key`'s value, inserting `Value::Null`
	/// first if the key is absent.
	pub fn get_mut_or_insert(&mut self, key: &str) -> &mut Value {
		if self.get(key).is_none() {
			self.0.push((key.to_owned(), Value::Null));
		}
		self.get_mut(key).expect("just inserted")
	}

	pub fn insert(&mut self, key: String, value: Value) {
		if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
			slot.1 = value;
		} else {
			self.0.push((key, value));
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(k, _)| k.as_str())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<(String, Value)> for RecordMap {
	fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
		let mut map = RecordMap::new();
		for (k, v) in iter {
			map.insert(k, v);
		}
		map
	}
}

impl Display for RecordMap {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		f.write_str("{")?;
		for (i, (k, v)) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{k:?}: {v}")?;
		}
		f.write_str("}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn preserves_insertion_order() {
		let mut m = RecordMap::new();
		m.insert("z".into(), Value::Int(1));
		m.insert("a".into(), Value::Int(2));
		m.insert("z".into(), Value::Int(3));
		let keys: Vec<_> = m.keys().collect();
		assert_eq!(keys, vec!["z", "a"]);
		assert_eq!(m.get("z"), Some(&Value::Int(3)));
	}
}
