//! The compiled path tree.
//!
//! Tagged variants with a single evaluation dispatch: no v-tables, no
//! `PathSegment`/`Predicate`/`Operator` class hierarchy, just enums the
//! evaluator matches on.

use crate::value::Value;

/// A compiled RecordPath expression: either a path (a sequence of steps) or
/// a bare function call used as a whole expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
	Path(Vec<PathSegment>),
	Function(FunctionCall),
}

/// The direction of traversal from the current context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
	/// `/name`, `/*`: direct children.
	Child,
	/// `//name`, `//*`: depth-first descendants.
	Descendant,
	/// `..`: the parent link.
	Parent,
	/// `.`: identity.
	SelfAxis,
}

/// What a segment selects once the axis has placed it in a container.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
	Name(String),
	Wildcard,
	Function(FunctionCall),
}

/// One component of a path between slashes: an axis, an optional step (`.`
/// and `..` carry no step), and zero or more trailing `[...]` index groups.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSegment {
	pub axis: Axis,
	pub step: Option<Step>,
	pub index_groups: Vec<Vec<IndexItem>>,
}

/// One element of a comma-separated `[...]` group.
#[derive(Clone, Debug, PartialEq)]
pub enum IndexItem {
	Index(i64),
	Range(i64, i64),
	Wildcard,
	Key(String),
	Predicate(Predicate),
}

/// A bracketed predicate: either a filter function standing as the whole
/// predicate, or a comparison between two values.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
	Filter(FunctionCall),
	Comparison(PredValue, CompareOp, PredValue),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	Ne,
	Lt,
	Le,
	Gt,
	Ge,
}

/// One side of a comparison, or a function argument.
#[derive(Clone, Debug, PartialEq)]
pub enum PredValue {
	Path(Vec<PathSegment>),
	Function(FunctionCall),
	Literal(Value),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
	pub name: String,
	pub args: Vec<PredValue>,
}

/// Functions whose return value may stand as a whole predicate on its own
/// (truthiness), as opposed to value functions that must appear inside a
/// comparison.
pub const FILTER_FUNCTIONS: &[&str] = &[
	"contains",
	"startsWith",
	"endsWith",
	"isEmpty",
	"isBlank",
	"matchesRegex",
	"containsRegex",
	"not",
];

pub fn is_filter_function(name: &str) -> bool {
	FILTER_FUNCTIONS.contains(&name)
}
