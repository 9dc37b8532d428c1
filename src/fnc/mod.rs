//! The built-in function library.
//!
//! `run` dispatches by name to a pure `&[Value] -> Result<Value>` for every
//! scalar-shaped function. A handful of functions need the evaluated
//! field-value *stream*, not just its first resolved value (`count`,
//! `coalesce`, `fieldName`, `anchored`); those are implemented directly in
//! [`crate::eval`], which calls here for everything else.

pub mod datetime;
pub mod encoding;
pub mod hashing;
pub mod json;
pub mod strings;

use crate::err::{Error, Result};
use crate::value::Value;

macro_rules! dispatch {
	($name:expr, $args:expr, { $($fn_name:literal => $handler:path),+ $(,)? }) => {
		match $name {
			$($fn_name => $handler($args),)+
			other => Err(Error::eval(format!("unknown function `{other}`"))),
		}
	};
}

/// Runs a scalar-shaped built-in by name against its already-resolved
/// arguments.
pub fn run(name: &str, args: &[Value]) -> Result<Value> {
	dispatch!(name, args, {
		"substring" => strings::substring,
		"substringBefore" => strings::substring_before,
		"substringBeforeLast" => strings::substring_before_last,
		"substringAfter" => strings::substring_after,
		"substringAfterLast" => strings::substring_after_last,
		"contains" => strings::contains,
		"startsWith" => strings::starts_with,
		"endsWith" => strings::ends_with,
		"containsRegex" => strings::contains_regex,
		"matchesRegex" => strings::matches_regex,
		"replace" => strings::replace,
		"replaceRegex" => strings::replace_regex,
		"replaceNull" => strings::replace_null,
		"not" => strings::not_fn,
		"trim" => strings::trim,
		"toUpperCase" => strings::to_uppercase,
		"toLowerCase" => strings::to_lowercase,
		"concat" => strings::concat,
		"join" => strings::join,
		"padLeft" => strings::pad_left,
		"padRight" => strings::pad_right,
		"isEmpty" => strings::is_empty,
		"isBlank" => strings::is_blank,
		"mapOf" => json::map_of,
		"hash" => hashing::hash,
		"uuid5" => hashing::uuid5,
		"toDate" => datetime::to_date,
		"format" => datetime::format,
		"base64Encode" => encoding::base64_encode,
		"base64Decode" => encoding::base64_decode,
		"toString" => encoding::to_string,
		"toBytes" => encoding::to_bytes,
		"escapeJson" => json::escape_json,
		"unescapeJson" => json::unescape_json,
	})
}

/// Names handled outside `run`, directly against a field-value stream.
pub const STREAM_FUNCTIONS: &[&str] = &["count", "coalesce", "fieldName", "anchored"];

pub fn is_stream_function(name: &str) -> bool {
	STREAM_FUNCTIONS.contains(&name)
}

/// Functions that require an even argument count, checked at compile time:
/// an odd count is a `PathSyntax` error.
pub fn requires_even_arity(name: &str) -> bool {
	name == "mapOf"
}
