//! The public compile/evaluate surface.

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::err::Result;
use crate::eval;
use crate::fieldvalue::FieldValue;
use crate::schema::{DataType, Record, RecordField, ScalarKind};
use crate::value::Value;
use ast::Expr;

/// A parsed, ready-to-evaluate RecordPath expression.
///
/// Compiling is pure and side-effect free: [`compile`] never touches a
/// record, so a [`CompiledPath`] can be shared across many evaluations (see
/// [`crate::cache::PathCache`]).
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledPath {
	source: String,
	expr: Expr,
}

/// Parses `source` into a [`CompiledPath`], or an `Error::PathSyntax` naming
/// the offending offset.
pub fn compile(source: &str) -> Result<CompiledPath> {
	let expr = parser::parse(source)?;
	Ok(CompiledPath {
		source: source.to_owned(),
		expr,
	})
}

fn root_field() -> RecordField {
	RecordField::synthesize("", DataType::Scalar(ScalarKind::Null))
}

impl CompiledPath {
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Evaluates this path against `record`, returning the ordered stream of
	/// field-values it selects.
	pub fn evaluate(&self, record: &Record) -> Result<Vec<FieldValue>> {
		let root = FieldValue::root(Value::Record(record.clone()), root_field());
		eval::eval_expr(&self.expr, &root, &root, 0)
	}

	/// Evaluates this path relative to `context`, with `root` still backing
	/// any absolute (`/...`) sub-references inside predicates. Used when a
	/// path is itself evaluated as a predicate's relative side.
	pub fn evaluate_with_context(&self, root: &FieldValue, context: &FieldValue) -> Result<Vec<FieldValue>> {
		eval::eval_expr(&self.expr, root, context, 0)
	}
}
