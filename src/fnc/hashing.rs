//! Digests and name-based UUIDs.

use crate::err::{Error, Result};
use crate::value::Value;
use md5::{Digest, Md5};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use uuid::Uuid;

fn as_string(v: &Value) -> String {
	match v {
		Value::Null => String::new(),
		other => other.to_display_string(),
	}
}

/// `hash(value, algorithm)`: `md5`, `sha1`, `sha256`, `sha512`, returning a
/// lowercase hex digest.
pub fn hash(args: &[Value]) -> Result<Value> {
	let input = as_string(&args[0]);
	let algo = as_string(&args[1]).to_lowercase();
	let hex = match algo.as_str() {
		"md5" => {
			let mut h = Md5::new();
			h.update(input.as_bytes());
			let val = h.finalize();
			format!("{val:x}")
		}
		"sha1" | "sha-1" => {
			let mut h = Sha1::new();
			h.update(input.as_bytes());
			let val = h.finalize();
			format!("{val:x}")
		}
		"sha256" | "sha-256" => {
			let mut h = Sha256::new();
			h.update(input.as_bytes());
			let val = h.finalize();
			format!("{val:x}")
		}
		"sha512" | "sha-512" => {
			let mut h = Sha512::new();
			h.update(input.as_bytes());
			let val = h.finalize();
			format!("{val:x}")
		}
		other => return Err(Error::eval(format!("hash: unsupported algorithm {other:?}"))),
	};
	Ok(Value::String(hex))
}

/// `uuid5(input, namespace?)`: the namespace defaults to the DNS namespace
/// when omitted, and may otherwise be any UUID-shaped string.
pub fn uuid5(args: &[Value]) -> Result<Value> {
	let input = as_string(&args[0]);
	let namespace = match args.get(1) {
		Some(v) if !v.is_null() => {
			let s = as_string(v);
			Uuid::parse_str(&s).map_err(|e| Error::eval(format!("uuid5: invalid namespace: {e}")))?
		}
		_ => Uuid::NAMESPACE_DNS,
	};
	Ok(Value::String(Uuid::new_v5(&namespace, input.as_bytes()).to_string()))
}
