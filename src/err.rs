//! Errors raised while compiling or evaluating a RecordPath expression.

use thiserror::Error;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The exhaustive error taxonomy for this crate.
///
/// Compile failures ([`Error::PathSyntax`]) are raised eagerly, before any
/// record is touched. Runtime type mismatches inside predicates are never
/// surfaced as errors (see [`crate::eval::predicate`]); only function-level
/// failures and mutation failures propagate.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
	/// A compile-time grammar or arity error.
	#[error("invalid RecordPath syntax at offset {offset}: {message}")]
	PathSyntax {
		offset: usize,
		message: String,
	},

	/// A runtime function failure: bad charset, regex, algorithm, or JSON parse.
	#[error("RecordPath evaluation error: {message}")]
	PathEval {
		message: String,
	},

	/// A function received a value of the wrong kind.
	#[error("RecordPath type error: {message}")]
	TypeError {
		message: String,
	},

	/// `updateValue` was called on a root or function-derived field-value.
	#[error("field-value is not mutable")]
	NotMutable,
}

impl Error {
	pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Error {
		Error::PathSyntax {
			offset,
			message: message.into(),
		}
	}

	/// Constructs a [`Error::PathEval`], logging it at `debug` level at the
	/// single point every runtime function failure passes through (bad
	/// charset, regex, hash algorithm, JSON parse, …), per this crate's
	/// ambient-logging convention for function-level failures.
	pub(crate) fn eval(message: impl Into<String>) -> Error {
		let message = message.into();
		tracing::debug!(%message, "RecordPath function raised PathEval");
		Error::PathEval {
			message,
		}
	}

	pub(crate) fn type_error(message: impl Into<String>) -> Error {
		let message = message.into();
		tracing::debug!(%message, "RecordPath function raised TypeError");
		Error::TypeError {
			message,
		}
	}
}

#[cfg(test)]
mod tests {
	use test_log::test;

	use super::*;

	#[test]
	fn eval_error_constructor_logs_and_carries_the_message() {
		let err = Error::eval("bad charset");
		assert!(matches!(err, Error::PathEval { ref message } if message == "bad charset"));
	}
}
