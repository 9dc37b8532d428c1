//! String-shaped built-ins: substring family, case, trim, padding, simple
//! and regex replace/match, and concatenation/joining.

use crate::cnf::FUNCTION_ALLOCATION_LIMIT;
use crate::err::{Error, Result};
use crate::value::Value;
use regex::Regex;

fn limit(name: &str, n: usize) -> Result<()> {
	if n > *FUNCTION_ALLOCATION_LIMIT {
		Err(Error::eval(format!("{name}: output must not exceed {} bytes", *FUNCTION_ALLOCATION_LIMIT)))
	} else {
		Ok(())
	}
}

fn as_string(v: &Value) -> String {
	match v {
		Value::Null => String::new(),
		other => other.to_display_string(),
	}
}

fn as_int(v: &Value, name: &str) -> Result<i64> {
	v.as_f64().map(|n| n as i64).ok_or_else(|| Error::type_error(format!("{name}: expected a number argument")))
}

/// Java-style substring. A negative `end` counts back from `len`
/// (`substring(name, 0, -5)` on `"John Smith"` yields `"John"`), via
/// `len + end` clamped into `[begin, len]`.
pub fn substring(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let chars: Vec<char> = s.chars().collect();
	let len = chars.len() as i64;
	let begin = as_int(&args[1], "substring")?.clamp(0, len);
	let raw_end = as_int(&args[2], "substring")?;
	let end = if raw_end < 0 {
		len + raw_end
	} else {
		raw_end
	};
	let end = end.clamp(begin, len);
	if begin >= end {
		return Ok(Value::String(String::new()));
	}
	Ok(Value::String(chars[begin as usize..end as usize].iter().collect()))
}

pub fn substring_before(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let sub = as_string(&args[1]);
	if sub.is_empty() {
		return Ok(Value::String(s));
	}
	match s.find(&sub) {
		Some(idx) => Ok(Value::String(s[..idx].to_owned())),
		None => Ok(Value::String(s)),
	}
}

pub fn substring_before_last(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let sub = as_string(&args[1]);
	if sub.is_empty() {
		return Ok(Value::String(s));
	}
	match s.rfind(&sub) {
		Some(idx) => Ok(Value::String(s[..idx].to_owned())),
		None => Ok(Value::String(s)),
	}
}

pub fn substring_after(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let sub = as_string(&args[1]);
	if sub.is_empty() {
		return Ok(Value::String(s));
	}
	match s.find(&sub) {
		Some(idx) => Ok(Value::String(s[idx + sub.len()..].to_owned())),
		None => Ok(Value::String(s)),
	}
}

pub fn substring_after_last(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let sub = as_string(&args[1]);
	if sub.is_empty() {
		return Ok(Value::String(s));
	}
	match s.rfind(&sub) {
		Some(idx) => Ok(Value::String(s[idx + sub.len()..].to_owned())),
		None => Ok(Value::String(s)),
	}
}

/// Filter function: empty needle is always contained.
pub fn contains(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let needle = as_string(&args[1]);
	Ok(Value::Bool(needle.is_empty() || s.contains(&needle)))
}

pub fn starts_with(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let needle = as_string(&args[1]);
	Ok(Value::Bool(needle.is_empty() || s.starts_with(&needle)))
}

pub fn ends_with(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let needle = as_string(&args[1]);
	Ok(Value::Bool(needle.is_empty() || s.ends_with(&needle)))
}

fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|e| Error::eval(format!("invalid regular expression: {e}")))
}

pub fn contains_regex(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let re = compile_regex(&as_string(&args[1]))?;
	Ok(Value::Bool(re.is_match(&s)))
}

pub fn matches_regex(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let re = compile_regex(&as_string(&args[1]))?;
	match re.find(&s) {
		Some(m) => Ok(Value::Bool(m.start() == 0 && m.end() == s.len())),
		None => Ok(Value::Bool(false)),
	}
}

pub fn replace(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let find = as_string(&args[1]);
	let repl = as_string(&args[2]);
	if find.is_empty() || !s.contains(&find) {
		return Ok(Value::String(s));
	}
	limit("replace", s.len() + s.matches(&find).count() * repl.len())?;
	Ok(Value::String(s.replace(&find, &repl)))
}

pub fn replace_regex(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let re = compile_regex(&as_string(&args[1]))?;
	let repl = as_string(&args[2]);
	Ok(Value::String(re.replace_all(&s, repl.as_str()).into_owned()))
}

pub fn replace_null(args: &[Value]) -> Result<Value> {
	Ok(if args[0].is_null() {
		args[1].clone()
	} else {
		args[0].clone()
	})
}

pub fn not_fn(args: &[Value]) -> Result<Value> {
	Ok(Value::Bool(!args[0].is_truthy()))
}

pub fn trim(args: &[Value]) -> Result<Value> {
	match &args[0] {
		Value::Array(items) => Ok(Value::Array(
			items.iter().map(|v| Value::String(as_string(v).trim().to_owned())).collect(),
		)),
		other => Ok(Value::String(as_string(other).trim().to_owned())),
	}
}

pub fn to_uppercase(args: &[Value]) -> Result<Value> {
	Ok(Value::String(as_string(&args[0]).to_uppercase()))
}

pub fn to_lowercase(args: &[Value]) -> Result<Value> {
	Ok(Value::String(as_string(&args[0]).to_lowercase()))
}

pub fn concat(args: &[Value]) -> Result<Value> {
	let parts: Vec<String> = args.iter().map(as_string).collect();
	limit("concat", parts.iter().map(String::len).sum())?;
	Ok(Value::String(parts.concat()))
}

/// `join(sep, ...)`: arrays among the remaining args are flattened in order.
pub fn join(args: &[Value]) -> Result<Value> {
	let sep = as_string(&args[0]);
	let mut parts = Vec::new();
	for v in &args[1..] {
		match v {
			Value::Array(items) => parts.extend(items.iter().map(as_string)),
			other => parts.push(as_string(other)),
		}
	}
	limit("join", parts.iter().map(String::len).sum::<usize>() + parts.len().saturating_mul(sep.len()))?;
	Ok(Value::String(parts.join(&sep)))
}

/// Pads to `n` characters. The default pad is `"_"`; a pad string longer
/// than the remaining width is truncated so the result is exactly `n` long.
pub fn pad_left(args: &[Value]) -> Result<Value> {
	pad(args, true)
}

pub fn pad_right(args: &[Value]) -> Result<Value> {
	pad(args, false)
}

fn pad(args: &[Value], left: bool) -> Result<Value> {
	if args[0].is_null() {
		return Ok(Value::Null);
	}
	let s = as_string(&args[0]);
	let n = as_int(&args[1], "pad")?.max(0) as usize;
	let pad_str = args.get(2).map(as_string).filter(|s| !s.is_empty()).unwrap_or_else(|| "_".to_owned());
	let len = s.chars().count();
	if n <= len {
		return Ok(Value::String(s));
	}
	let needed = n - len;
	let mut filler = String::new();
	while filler.chars().count() < needed {
		filler.push_str(&pad_str);
	}
	let filler: String = filler.chars().take(needed).collect();
	Ok(Value::String(if left {
		format!("{filler}{s}")
	} else {
		format!("{s}{filler}")
	}))
}

pub fn is_empty(args: &[Value]) -> Result<Value> {
	let empty = match &args[0] {
		Value::Null => true,
		Value::String(s) => s.is_empty(),
		Value::Array(a) => a.is_empty(),
		Value::Map(m) => m.is_empty(),
		_ => false,
	};
	Ok(Value::Bool(empty))
}

pub fn is_blank(args: &[Value]) -> Result<Value> {
	let blank = match &args[0] {
		Value::Null => true,
		Value::String(s) => s.trim().is_empty(),
		_ => false,
	};
	Ok(Value::Bool(blank))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn substring_negative_end_matches_worked_example() {
		let v = substring(&[Value::String("John Smith".into()), Value::Long(0), Value::Long(-5)]).unwrap();
		assert_eq!(v, Value::String("John".into()));
	}

	#[test]
	fn substring_begin_after_end_is_empty() {
		let v = substring(&[Value::String("abcdef".into()), Value::Long(4), Value::Long(2)]).unwrap();
		assert_eq!(v, Value::String(String::new()));
	}

	#[test]
	fn pad_left_truncates_long_pad_string() {
		let v = pad_left(&[Value::String("MyString".into()), Value::Long(10), Value::String("aVeryLongPadding".into())])
			.unwrap();
		assert_eq!(v, Value::String("aVMyString".into()));
	}

	#[test]
	fn pad_left_repeats_short_pad_string() {
		let v = pad_left(&[Value::String("MyString".into()), Value::Long(20), Value::String("few".into())]).unwrap();
		assert_eq!(v, Value::String("fewfewfewfewMyString".into()));
	}

	#[test]
	fn substring_before_not_found_returns_unchanged() {
		let v = substring_before(&[Value::String("hello".into()), Value::String("z".into())]).unwrap();
		assert_eq!(v, Value::String("hello".into()));
	}

	#[test]
	fn contains_empty_needle_is_true() {
		let v = contains(&[Value::String("hello".into()), Value::String(String::new())]).unwrap();
		assert_eq!(v, Value::Bool(true));
	}
}
