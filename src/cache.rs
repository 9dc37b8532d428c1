//! A bounded compile cache so repeatedly-used path strings are parsed once.
//!
//! FIFO eviction under a single `Mutex`: compilation is cheap and paths are
//! short-lived, so a plain mutex beats the complexity of a concurrent map
//! for this crate's scale.

use crate::err::Result;
use crate::path::{compile, CompiledPath};
use std::collections::HashMap;
use std::sync::Mutex;

struct Inner {
	capacity: usize,
	map: HashMap<String, CompiledPath>,
	order: Vec<String>,
}

/// A shared, bounded cache from source string to [`CompiledPath`].
pub struct PathCache {
	inner: Mutex<Inner>,
}

impl PathCache {
	pub fn new(capacity: usize) -> Self {
		Self {
			inner: Mutex::new(Inner {
				capacity,
				map: HashMap::new(),
				order: Vec::new(),
			}),
		}
	}

	/// Returns the cached compilation of `source`, compiling and inserting it
	/// on a miss. Propagates `Error::PathSyntax` from a failed compile.
	pub fn get_or_compile(&self, source: &str) -> Result<CompiledPath> {
		let mut inner = self.inner.lock().expect("path cache mutex poisoned");
		if let Some(hit) = inner.map.get(source) {
			tracing::debug!(path = source, "path cache hit");
			return Ok(hit.clone());
		}
		tracing::debug!(path = source, "path cache miss");
		let compiled = compile(source)?;
		if inner.order.len() >= inner.capacity {
			if let Some(evicted) = inner.order.first().cloned() {
				inner.order.remove(0);
				inner.map.remove(&evicted);
				tracing::debug!(path = evicted, "path cache eviction");
			}
		}
		inner.order.push(source.to_owned());
		inner.map.insert(source.to_owned(), compiled.clone());
		Ok(compiled)
	}

	pub fn len(&self) -> usize {
		self.inner.lock().expect("path cache mutex poisoned").map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for PathCache {
	fn default() -> Self {
		Self::new(*crate::cnf::DEFAULT_CACHE_CAPACITY)
	}
}

#[cfg(test)]
mod tests {
	use test_log::test;

	use super::*;

	#[test]
	fn repeated_source_hits_the_cache() {
		let cache = PathCache::new(2);
		let a = cache.get_or_compile("/name").unwrap();
		let b = cache.get_or_compile("/name").unwrap();
		assert_eq!(a, b);
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn capacity_evicts_the_oldest_entry() {
		let cache = PathCache::new(1);
		cache.get_or_compile("/a").unwrap();
		cache.get_or_compile("/b").unwrap();
		assert_eq!(cache.len(), 1);
		assert!(cache.get_or_compile("/b").is_ok());
	}

	#[test]
	fn invalid_source_is_not_cached() {
		let cache = PathCache::new(4);
		assert!(cache.get_or_compile("/name[substring(., 1, 2)]").is_err());
		assert!(cache.is_empty());
	}
}
