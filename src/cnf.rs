//! Process-wide tunables, read once from the environment.
//!
//! Mirrors the `lazy_env_parse!` convention: a `Lazy` static that parses an
//! environment variable into the target type, falling back to a default if
//! the variable is absent or fails to parse.

use once_cell::sync::Lazy;

macro_rules! lazy_env_parse {
	($key:expr, $t:ty, $default:expr) => {
		Lazy::new(|| {
			std::env::var($key)
				.ok()
				.and_then(|s| s.parse::<$t>().ok())
				.unwrap_or($default)
		})
	};
}

/// Recursion guard for descendant traversal and nested predicate evaluation.
pub static MAX_COMPUTATION_DEPTH: Lazy<u32> =
	lazy_env_parse!("RECORDPATH_MAX_COMPUTATION_DEPTH", u32, 120);

/// Output size guard for `concat`/`join`/`repeat`-shaped functions, in bytes.
pub static FUNCTION_ALLOCATION_LIMIT: Lazy<usize> =
	lazy_env_parse!("RECORDPATH_FUNCTION_ALLOCATION_LIMIT", usize, 16 * 1024 * 1024);

/// Default capacity of a [`crate::cache::PathCache`] when not overridden by
/// the caller.
pub static DEFAULT_CACHE_CAPACITY: Lazy<usize> =
	lazy_env_parse!("RECORDPATH_CACHE_CAPACITY", usize, 25);
