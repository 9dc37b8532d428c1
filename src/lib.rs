//! RecordPath: a query language, parser and evaluator for navigating,
//! filtering and transforming schema-bearing records.
//!
//! The public surface is small: [`compile`] a path once, [`CompiledPath`]
//! carries no reference to any particular record, and [`CompiledPath::evaluate`]
//! runs it against one.

pub mod cache;
pub mod cnf;
pub mod err;
pub mod eval;
pub mod fieldvalue;
pub mod fnc;
pub mod path;
pub mod schema;
pub mod value;

pub use cache::PathCache;
pub use err::{Error, Result};
pub use fieldvalue::FieldValue;
pub use path::{compile, CompiledPath};
pub use schema::{DataType, Record, RecordField, RecordSchema, ScalarKind};
pub use value::{RecordMap, Value};

/// Test-only tracing bootstrap, grounded on the teacher's own
/// `tracing_subscriber::fmt()...init()` test helper convention. Safe to call
/// from more than one test in the same binary: `try_init` is a no-op once a
/// global default subscriber is already installed.
#[cfg(test)]
pub(crate) mod testutil {
	pub(crate) fn init_tracing() {
		let _ = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).try_init();
	}
}
