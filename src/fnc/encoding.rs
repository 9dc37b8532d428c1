//! Byte/string conversions: base64 and charset-aware `toString`/`toBytes`.

use crate::err::{Error, Result};
use crate::value::Value;
use base64::{engine::general_purpose::STANDARD, Engine};

fn as_bytes(v: &Value) -> Vec<u8> {
	match v {
		Value::Bytes(b) => b.clone(),
		other => other.to_display_string().into_bytes(),
	}
}

fn as_string(v: &Value) -> String {
	match v {
		Value::Null => String::new(),
		other => other.to_display_string(),
	}
}

pub fn base64_encode(args: &[Value]) -> Result<Value> {
	Ok(Value::String(STANDARD.encode(as_bytes(&args[0]))))
}

pub fn base64_decode(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	STANDARD
		.decode(s.as_bytes())
		.map(Value::Bytes)
		.map_err(|e| Error::eval(format!("base64Decode: {e}")))
}

/// `toString(bytes, charset)`: `utf-8`, `utf-16` (little-endian) and
/// `ascii` are supported; anything else is `Error::PathEval`.
pub fn to_string(args: &[Value]) -> Result<Value> {
	let bytes = as_bytes(&args[0]);
	let charset = args.get(1).map(as_string).unwrap_or_else(|| "utf-8".to_owned());
	match charset.to_lowercase().as_str() {
		"utf-8" | "utf8" => {
			String::from_utf8(bytes).map(Value::String).map_err(|e| Error::eval(format!("toString: {e}")))
		}
		"utf-16" | "utf16" => {
			if bytes.len() % 2 != 0 {
				return Err(Error::eval("toString: utf-16 input has an odd byte length"));
			}
			let units: Vec<u16> = bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect();
			String::from_utf16(&units).map(Value::String).map_err(|e| Error::eval(format!("toString: {e}")))
		}
		"ascii" => {
			if bytes.iter().any(|b| !b.is_ascii()) {
				return Err(Error::eval("toString: input is not valid ASCII"));
			}
			Ok(Value::String(bytes.iter().map(|&b| b as char).collect()))
		}
		other => Err(Error::eval(format!("toString: unsupported charset {other:?}"))),
	}
}

pub fn to_bytes(args: &[Value]) -> Result<Value> {
	let s = as_string(&args[0]);
	let charset = args.get(1).map(as_string).unwrap_or_else(|| "utf-8".to_owned());
	match charset.to_lowercase().as_str() {
		"utf-8" | "utf8" => Ok(Value::Bytes(s.into_bytes())),
		"utf-16" | "utf16" => {
			let mut out = Vec::with_capacity(s.len() * 2);
			for unit in s.encode_utf16() {
				out.extend_from_slice(&unit.to_le_bytes());
			}
			Ok(Value::Bytes(out))
		}
		"ascii" => {
			if !s.is_ascii() {
				return Err(Error::eval("toBytes: input is not valid ASCII"));
			}
			Ok(Value::Bytes(s.into_bytes()))
		}
		other => Err(Error::eval(format!("toBytes: unsupported charset {other:?}"))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base64_round_trips() {
		let encoded = base64_encode(&[Value::String("hello".into())]).unwrap();
		assert_eq!(encoded, Value::String("aGVsbG8=".into()));
		let decoded = base64_decode(&[encoded]).unwrap();
		assert_eq!(decoded, Value::Bytes(b"hello".to_vec()));
	}

	#[test]
	fn utf16_round_trips() {
		let bytes = to_bytes(&[Value::String("hi".into()), Value::String("utf-16".into())]).unwrap();
		let back = to_string(&[bytes, Value::String("utf-16".into())]).unwrap();
		assert_eq!(back, Value::String("hi".into()));
	}

	#[test]
	fn unsupported_charset_is_an_eval_error() {
		let err = to_bytes(&[Value::String("hi".into()), Value::String("latin1".into())]).unwrap_err();
		assert!(matches!(err, Error::PathEval { .. }));
	}
}
