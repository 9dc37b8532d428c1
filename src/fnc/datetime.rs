//! `toDate`/`format`. Both are permissive passthroughs: non-date input, or a
//! pattern that fails to apply, is returned unchanged rather than erroring.

use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::fmt::Write;

/// Parses an optional third `tz` argument into a `FixedOffset`. Accepts
/// `"Z"`/`"UTC"` and `+HH:MM`/`-HH:MM`-style offsets (chrono's own
/// `%:z`/`%#z` formats); anything else fails to parse and the caller treats
/// the timezone as absent rather than erroring (`spec.md` §4.7's
/// `toDate`/`format` are both permissive-passthrough functions).
fn parse_tz(args: &[Value]) -> Option<FixedOffset> {
	let Value::String(tz) = args.get(2)? else {
		return None;
	};
	if tz.eq_ignore_ascii_case("Z") || tz.eq_ignore_ascii_case("UTC") {
		return Some(FixedOffset::east_opt(0).unwrap());
	}
	DateTime::parse_from_str(&format!("2000-01-01T00:00:00{tz}"), "%Y-%m-%dT%H:%M:%S%:z")
		.or_else(|_| DateTime::parse_from_str(&format!("2000-01-01T00:00:00{tz}"), "%Y-%m-%dT%H:%M:%S%#z"))
		.ok()
		.map(|d| *d.offset())
}

/// `toDate(value, pattern [, tz])`: parses a string against a strftime-style
/// pattern. Non-string input or an unparseable string is returned unchanged.
/// When `tz` is given, the parsed naive timestamp is taken to be local to
/// that offset and converted to UTC; an unparseable `tz` is ignored and the
/// timestamp is treated as UTC.
pub fn to_date(args: &[Value]) -> crate::err::Result<Value> {
	let Value::String(s) = &args[0] else {
		return Ok(args[0].clone());
	};
	let Value::String(pattern) = &args[1] else {
		return Ok(args[0].clone());
	};
	match NaiveDateTime::parse_from_str(s, pattern) {
		Ok(naive) => match parse_tz(args) {
			Some(offset) => match offset.from_local_datetime(&naive).earliest() {
				Some(local) => Ok(Value::Date(local.with_timezone(&Utc))),
				None => Ok(Value::Date(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))),
			},
			None => Ok(Value::Date(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))),
		},
		Err(_) => Ok(args[0].clone()),
	}
}

/// `format(value, pattern [, tz])`: formats a `Date` through a strftime-style
/// pattern. Non-date input, or a pattern chrono can't render, is returned
/// unchanged. When `tz` is given, the instant is shifted into that offset
/// before formatting; an unparseable `tz` formats in UTC.
pub fn format(args: &[Value]) -> crate::err::Result<Value> {
	let Value::Date(d) = &args[0] else {
		return Ok(args[0].clone());
	};
	let Value::String(pattern) = &args[1] else {
		return Ok(args[0].clone());
	};
	let mut out = String::new();
	let result = match parse_tz(args) {
		Some(offset) => write!(out, "{}", d.with_timezone(&offset).format(pattern)),
		None => write!(out, "{}", d.format(pattern)),
	};
	match result {
		Ok(()) => Ok(Value::String(out)),
		Err(_) => Ok(args[0].clone()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn to_date_parses_iso_like_pattern() {
		let v = to_date(&[Value::String("2024-03-05".into()), Value::String("%Y-%m-%d".into())]).unwrap();
		assert!(matches!(v, Value::Date(_)));
	}

	#[test]
	fn to_date_passes_through_unparseable_input() {
		let v = to_date(&[Value::String("not a date".into()), Value::String("%Y-%m-%d".into())]).unwrap();
		assert_eq!(v, Value::String("not a date".into()));
	}

	#[test]
	fn format_passes_through_non_date_input() {
		let v = format(&[Value::Long(5), Value::String("%Y".into())]).unwrap();
		assert_eq!(v, Value::Long(5));
	}

	#[test]
	fn to_date_honors_a_fixed_offset_timezone() {
		let v = to_date(&[
			Value::String("2024-03-05 10:00:00".into()),
			Value::String("%Y-%m-%d %H:%M:%S".into()),
			Value::String("+02:00".into()),
		])
		.unwrap();
		match v {
			Value::Date(d) => assert_eq!(d.format("%H:%M").to_string(), "08:00"),
			other => panic!("expected a date, found {other:?}"),
		}
	}

	#[test]
	fn format_renders_in_the_given_timezone() {
		let parsed =
			to_date(&[Value::String("2024-03-05 08:00:00".into()), Value::String("%Y-%m-%d %H:%M:%S".into())])
				.unwrap();
		let v = format(&[parsed, Value::String("%H:%M".into()), Value::String("+02:00".into())]).unwrap();
		assert_eq!(v, Value::String("10:00".into()));
	}

	#[test]
	fn unparseable_timezone_is_ignored_and_treated_as_utc() {
		let v = to_date(&[
			Value::String("2024-03-05".into()),
			Value::String("%Y-%m-%d".into()),
			Value::String("not-a-tz".into()),
		])
		.unwrap();
		assert!(matches!(v, Value::Date(_)));
	}
}
