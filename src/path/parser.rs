//! The hand-written recursive-descent parser.
//!
//! Distinguishes filter functions (may stand as a whole predicate) from
//! value functions (may only appear inside a comparison) at parse time:
//! using a value function as a bare predicate is a compile-time error.

use super::ast::*;
use super::lexer::{lex, Token, TokenKind};
use crate::err::{Error, Result};
use crate::value::Value as RtValue;

pub fn parse(source: &str) -> Result<Expr> {
	let tokens = lex(source)?;
	let mut p = Parser {
		tokens,
		pos: 0,
	};
	let expr = p.parse_expr()?;
	p.expect_eof()?;
	Ok(expr)
}

struct Parser {
	tokens: Vec<Token>,
	pos: usize,
}

impl Parser {
	fn peek(&self) -> &Token {
		&self.tokens[self.pos]
	}

	fn peek_at(&self, offset: usize) -> &Token {
		self.tokens.get(self.pos + offset).unwrap_or_else(|| self.tokens.last().unwrap())
	}

	fn advance(&mut self) -> Token {
		let t = self.tokens[self.pos].clone();
		if self.pos + 1 < self.tokens.len() {
			self.pos += 1;
		}
		t
	}

	fn offset(&self) -> usize {
		self.peek().offset
	}

	fn expect_eof(&self) -> Result<()> {
		if matches!(self.peek().kind, TokenKind::Eof) {
			Ok(())
		} else {
			Err(Error::syntax(self.offset(), format!("unexpected trailing token {:?}", self.peek().kind)))
		}
	}

	fn is_path_start(&self) -> bool {
		matches!(
			self.peek().kind,
			TokenKind::Slash | TokenKind::DoubleSlash | TokenKind::Dot | TokenKind::DoubleDot
		)
	}

	fn is_function_call_start(&self) -> bool {
		matches!(self.peek().kind, TokenKind::Ident(_)) && matches!(self.peek_at(1).kind, TokenKind::LParen)
	}

	/// `Expr := Path | FunctionCall`
	fn parse_expr(&mut self) -> Result<Expr> {
		if self.is_function_call_start() {
			Ok(Expr::Function(self.parse_function_call()?))
		} else if self.is_path_start() {
			Ok(Expr::Path(self.parse_path()?))
		} else {
			Err(Error::syntax(self.offset(), "expected a path or a function call"))
		}
	}

	/// `Value := Path | FunctionCall | Literal`
	fn parse_value(&mut self) -> Result<PredValue> {
		if self.is_function_call_start() {
			Ok(PredValue::Function(self.parse_function_call()?))
		} else if self.is_path_start() {
			Ok(PredValue::Path(self.parse_path()?))
		} else {
			Ok(PredValue::Literal(self.parse_literal()?))
		}
	}

	fn parse_literal(&mut self) -> Result<RtValue> {
		let offset = self.offset();
		match self.advance().kind {
			TokenKind::Number(n) => Ok(RtValue::Double(n)),
			TokenKind::StringLiteral(s) => Ok(RtValue::String(s)),
			TokenKind::Ident(ref s) if s == "true" => Ok(RtValue::Bool(true)),
			TokenKind::Ident(ref s) if s == "false" => Ok(RtValue::Bool(false)),
			TokenKind::Ident(ref s) if s == "null" => Ok(RtValue::Null),
			other => Err(Error::syntax(offset, format!("expected a literal, found {other:?}"))),
		}
	}

	/// `Path := ('/' | '//') Step (('/' | '//') Step)* | ('.' | '..') ('/' Step)*`
	///
	/// A `/` or `//` separator may itself introduce a `.` or `..` step rather
	/// than a name (e.g. `/arr[0]/..`): in that case the segment's axis is
	/// overridden to `SelfAxis`/`Parent` and it carries no name step.
	fn parse_path(&mut self) -> Result<Vec<PathSegment>> {
		let mut segments = Vec::new();
		let mut first = true;
		loop {
			let mut axis = match self.peek().kind {
				TokenKind::Slash => Axis::Child,
				TokenKind::DoubleSlash => Axis::Descendant,
				TokenKind::Dot if first => Axis::SelfAxis,
				TokenKind::DoubleDot if first => Axis::Parent,
				_ => break,
			};
			self.advance();
			let step = if axis == Axis::SelfAxis || axis == Axis::Parent {
				// `.` / `..` carry no step name themselves, but may be
				// immediately followed by `[...]` (e.g. `.['key']`).
				None
			} else if matches!(self.peek().kind, TokenKind::Dot) {
				axis = Axis::SelfAxis;
				self.advance();
				None
			} else if matches!(self.peek().kind, TokenKind::DoubleDot) {
				axis = Axis::Parent;
				self.advance();
				None
			} else if matches!(self.peek().kind, TokenKind::LBracket) {
				None
			} else if first && axis == Axis::Child && matches!(self.peek().kind, TokenKind::Eof) {
				// A bare `/` selects the root record itself (spec.md
				// Invariant 2): no step follows the single slash.
				None
			} else {
				Some(self.parse_step()?)
			};
			let index_groups = self.parse_trailing_index_groups()?;
			segments.push(PathSegment {
				axis,
				step,
				index_groups,
			});
			first = false;
			if axis == Axis::SelfAxis || axis == Axis::Parent {
				// Only `/Step` continuations are allowed after `.`/`..`.
				if !matches!(self.peek().kind, TokenKind::Slash | TokenKind::DoubleSlash) {
					break;
				}
			}
		}
		if segments.is_empty() {
			return Err(Error::syntax(self.offset(), "expected a path"));
		}
		Ok(segments)
	}

	/// `Step := Name | '*' | FunctionCall`
	fn parse_step(&mut self) -> Result<Step> {
		if self.is_function_call_start() {
			return Ok(Step::Function(self.parse_function_call()?));
		}
		let offset = self.offset();
		match self.advance().kind {
			TokenKind::Star => Ok(Step::Wildcard),
			TokenKind::Ident(name) => Ok(Step::Name(name)),
			TokenKind::StringLiteral(name) => Ok(Step::Name(name)),
			other => Err(Error::syntax(offset, format!("expected a name, '*' or function call, found {other:?}"))),
		}
	}

	fn parse_trailing_index_groups(&mut self) -> Result<Vec<Vec<IndexItem>>> {
		let mut groups = Vec::new();
		while matches!(self.peek().kind, TokenKind::LBracket) {
			groups.push(self.parse_index_group()?);
		}
		Ok(groups)
	}

	/// `Index := '[' IndexItem (',' IndexItem)* ']'`
	fn parse_index_group(&mut self) -> Result<Vec<IndexItem>> {
		self.advance(); // '['
		let mut items = vec![self.parse_index_item()?];
		while matches!(self.peek().kind, TokenKind::Comma) {
			self.advance();
			items.push(self.parse_index_item()?);
		}
		match self.peek().kind {
			TokenKind::RBracket => {
				self.advance();
				Ok(items)
			}
			_ => Err(Error::syntax(self.offset(), "expected ']'")),
		}
	}

	/// `IndexItem := NUMBER | NUMBER '..' NUMBER | '*' | STRING_LITERAL | Predicate`
	fn parse_index_item(&mut self) -> Result<IndexItem> {
		match self.peek().kind.clone() {
			TokenKind::Number(n) => {
				self.advance();
				let start = n as i64;
				if matches!(self.peek().kind, TokenKind::DoubleDot) {
					self.advance();
					let end_offset = self.offset();
					match self.advance().kind {
						TokenKind::Number(end) => Ok(IndexItem::Range(start, end as i64)),
						other => Err(Error::syntax(end_offset, format!("expected a number, found {other:?}"))),
					}
				} else {
					Ok(IndexItem::Index(start))
				}
			}
			TokenKind::Star => {
				self.advance();
				Ok(IndexItem::Wildcard)
			}
			TokenKind::StringLiteral(s) => {
				self.advance();
				Ok(IndexItem::Key(s))
			}
			_ => Ok(IndexItem::Predicate(self.parse_predicate()?)),
		}
	}

	/// `Predicate := FilterFunction | Comparison`
	fn parse_predicate(&mut self) -> Result<Predicate> {
		let left = self.parse_value()?;
		if let Some(op) = self.try_parse_operator() {
			let right = self.parse_value()?;
			return Ok(Predicate::Comparison(left, op, right));
		}
		match left {
			PredValue::Function(fc) if is_filter_function(&fc.name) => Ok(Predicate::Filter(fc)),
			PredValue::Function(fc) => Err(Error::syntax(
				self.offset(),
				format!("function `{}` is a value function and cannot stand as a whole predicate", fc.name),
			)),
			_ => Err(Error::syntax(self.offset(), "expected a comparison or a filter function")),
		}
	}

	fn try_parse_operator(&mut self) -> Option<CompareOp> {
		let op = match self.peek().kind {
			TokenKind::Eq => CompareOp::Eq,
			TokenKind::Ne => CompareOp::Ne,
			TokenKind::Lt => CompareOp::Lt,
			TokenKind::Le => CompareOp::Le,
			TokenKind::Gt => CompareOp::Gt,
			TokenKind::Ge => CompareOp::Ge,
			_ => return None,
		};
		self.advance();
		Some(op)
	}

	fn parse_function_call(&mut self) -> Result<FunctionCall> {
		let name = match self.advance().kind {
			TokenKind::Ident(name) => name,
			_ => unreachable!("checked by is_function_call_start"),
		};
		self.advance(); // '('
		let mut args = Vec::new();
		if !matches!(self.peek().kind, TokenKind::RParen) {
			args.push(self.parse_value()?);
			while matches!(self.peek().kind, TokenKind::Comma) {
				self.advance();
				args.push(self.parse_value()?);
			}
		}
		match self.peek().kind {
			TokenKind::RParen => {
				self.advance();
				if crate::fnc::requires_even_arity(&name) && args.len() % 2 != 0 {
					return Err(Error::syntax(
						self.offset(),
						format!("`{name}` requires an even number of arguments, found {}", args.len()),
					));
				}
				Ok(FunctionCall {
					name,
					args,
				})
			}
			_ => Err(Error::syntax(self.offset(), "expected ')'")),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_child_multi_index() {
		let expr = parse("/numbers[3,6,-1,-2]").unwrap();
		match expr {
			Expr::Path(segs) => {
				assert_eq!(segs.len(), 1);
				assert_eq!(segs[0].axis, Axis::Child);
				assert_eq!(segs[0].step, Some(Step::Name("numbers".into())));
				assert_eq!(
					segs[0].index_groups[0],
					vec![IndexItem::Index(3), IndexItem::Index(6), IndexItem::Index(-1), IndexItem::Index(-2)]
				);
			}
			_ => panic!("expected a path"),
		}
	}

	#[test]
	fn bare_slash_selects_the_root_with_no_step() {
		let expr = parse("/").unwrap();
		match expr {
			Expr::Path(segs) => {
				assert_eq!(segs.len(), 1);
				assert_eq!(segs[0].axis, Axis::Child);
				assert_eq!(segs[0].step, None);
			}
			_ => panic!("expected a path"),
		}
	}

	#[test]
	fn parses_descendant_segment() {
		let expr = parse("//id").unwrap();
		match expr {
			Expr::Path(segs) => {
				assert_eq!(segs[0].axis, Axis::Descendant);
				assert_eq!(segs[0].step, Some(Step::Name("id".into())));
			}
			_ => panic!("expected a path"),
		}
	}

	#[test]
	fn slash_introduces_a_parent_step() {
		let expr = parse("/numbers[0]/..").unwrap();
		match expr {
			Expr::Path(segs) => {
				assert_eq!(segs.len(), 2);
				assert_eq!(segs[1].axis, Axis::Parent);
				assert_eq!(segs[1].step, None);
			}
			_ => panic!("expected a path"),
		}
	}

	#[test]
	fn value_function_as_bare_predicate_is_a_syntax_error() {
		let err = parse("/name[substring(., 1, 2)]").unwrap_err();
		assert!(matches!(err, Error::PathSyntax { .. }));
	}

	#[test]
	fn value_function_inside_a_comparison_is_legal() {
		let expr = parse("/name[substring(., 1, 2) = 'e']").unwrap();
		assert!(matches!(expr, Expr::Path(_)));
	}

	#[test]
	fn filter_function_as_bare_predicate_is_legal() {
		let expr = parse("/name[contains(., 'x')]").unwrap();
		assert!(matches!(expr, Expr::Path(_)));
	}

	#[test]
	fn parses_absolute_reference_predicate() {
		let expr = parse("/*[./state = /details/preferredState]").unwrap();
		match expr {
			Expr::Path(segs) => {
				assert_eq!(segs[0].step, Some(Step::Wildcard));
				let group = &segs[0].index_groups[0];
				assert_eq!(group.len(), 1);
				assert!(matches!(group[0], IndexItem::Predicate(Predicate::Comparison(..))));
			}
			_ => panic!("expected a path"),
		}
	}

	#[test]
	fn map_of_with_odd_arity_is_a_syntax_error() {
		let err = parse("mapOf('a', 1, 'b')").unwrap_err();
		assert!(matches!(err, Error::PathSyntax { .. }));
	}

	#[test]
	fn top_level_function_call() {
		let expr = parse("count(/numbers)").unwrap();
		match expr {
			Expr::Function(fc) => {
				assert_eq!(fc.name, "count");
				assert_eq!(fc.args.len(), 1);
			}
			_ => panic!("expected a function call"),
		}
	}
}
