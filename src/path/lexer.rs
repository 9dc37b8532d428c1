//! Tokenizes a RecordPath source string into a flat token sequence.
//!
//! A lazy, one-token-at-a-time reader suits an ambiguous, keyword-heavy SQL
//! grammar; RecordPath sources are short path expressions, so tokenizing
//! eagerly into a `Vec<Token>` up front is simpler and costs nothing
//! measurable.

use crate::err::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
	Slash,
	DoubleSlash,
	Dot,
	DoubleDot,
	LBracket,
	RBracket,
	LParen,
	RParen,
	Comma,
	Star,
	Number(f64),
	StringLiteral(String),
	Ident(String),
	Eq,
	Ne,
	Lt,
	Le,
	Gt,
	Ge,
	Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
	pub kind: TokenKind,
	/// Byte offset of the first character of this token in the source.
	pub offset: usize,
}

/// Tokenizes `source`, skipping whitespace between tokens (but not inside
/// string literals). Unterminated strings and unknown characters fail with
/// `Error::PathSyntax` carrying the offending offset.
pub fn lex(source: &str) -> Result<Vec<Token>, Error> {
	let chars: Vec<char> = source.chars().collect();
	let mut tokens = Vec::new();
	let mut i = 0usize;

	while i < chars.len() {
		let c = chars[i];
		if c.is_whitespace() {
			i += 1;
			continue;
		}
		let start = i;
		match c {
			'/' => {
				if chars.get(i + 1) == Some(&'/') {
					tokens.push(Token {
						kind: TokenKind::DoubleSlash,
						offset: start,
					});
					i += 2;
				} else {
					tokens.push(Token {
						kind: TokenKind::Slash,
						offset: start,
					});
					i += 1;
				}
			}
			'.' => {
				if chars.get(i + 1) == Some(&'.') {
					tokens.push(Token {
						kind: TokenKind::DoubleDot,
						offset: start,
					});
					i += 2;
				} else {
					tokens.push(Token {
						kind: TokenKind::Dot,
						offset: start,
					});
					i += 1;
				}
			}
			'[' => {
				tokens.push(Token {
					kind: TokenKind::LBracket,
					offset: start,
				});
				i += 1;
			}
			']' => {
				tokens.push(Token {
					kind: TokenKind::RBracket,
					offset: start,
				});
				i += 1;
			}
			'(' => {
				tokens.push(Token {
					kind: TokenKind::LParen,
					offset: start,
				});
				i += 1;
			}
			')' => {
				tokens.push(Token {
					kind: TokenKind::RParen,
					offset: start,
				});
				i += 1;
			}
			',' => {
				tokens.push(Token {
					kind: TokenKind::Comma,
					offset: start,
				});
				i += 1;
			}
			'*' => {
				tokens.push(Token {
					kind: TokenKind::Star,
					offset: start,
				});
				i += 1;
			}
			'=' => {
				tokens.push(Token {
					kind: TokenKind::Eq,
					offset: start,
				});
				i += 1;
			}
			'!' if chars.get(i + 1) == Some(&'=') => {
				tokens.push(Token {
					kind: TokenKind::Ne,
					offset: start,
				});
				i += 2;
			}
			'<' => {
				if chars.get(i + 1) == Some(&'=') {
					tokens.push(Token {
						kind: TokenKind::Le,
						offset: start,
					});
					i += 2;
				} else {
					tokens.push(Token {
						kind: TokenKind::Lt,
						offset: start,
					});
					i += 1;
				}
			}
			'>' => {
				if chars.get(i + 1) == Some(&'=') {
					tokens.push(Token {
						kind: TokenKind::Ge,
						offset: start,
					});
					i += 2;
				} else {
					tokens.push(Token {
						kind: TokenKind::Gt,
						offset: start,
					});
					i += 1;
				}
			}
			'\'' | '"' => {
				let (s, consumed) = lex_string(&chars, i)?;
				tokens.push(Token {
					kind: TokenKind::StringLiteral(s),
					offset: start,
				});
				i = consumed;
			}
			c if c.is_ascii_digit() || (c == '-' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())) => {
				let (n, consumed) = lex_number(&chars, i);
				tokens.push(Token {
					kind: TokenKind::Number(n),
					offset: start,
				});
				i = consumed;
			}
			c if is_ident_start(c) => {
				let (s, consumed) = lex_ident(&chars, i);
				tokens.push(Token {
					kind: TokenKind::Ident(s),
					offset: start,
				});
				i = consumed;
			}
			other => {
				return Err(Error::syntax(start, format!("unexpected character {other:?}")));
			}
		}
	}

	tokens.push(Token {
		kind: TokenKind::Eof,
		offset: chars.len(),
	});
	Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
	c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

fn lex_ident(chars: &[char], start: usize) -> (String, usize) {
	let mut i = start + 1;
	while i < chars.len() && is_ident_continue(chars[i]) {
		i += 1;
	}
	(chars[start..i].iter().collect(), i)
}

fn lex_number(chars: &[char], start: usize) -> (f64, usize) {
	let mut i = start;
	if chars[i] == '-' {
		i += 1;
	}
	while i < chars.len() && chars[i].is_ascii_digit() {
		i += 1;
	}
	// A `.` here is only part of the number if it's not the start of a `..`
	// range token, i.e. it must be followed by another digit.
	if chars.get(i) == Some(&'.') && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()) {
		i += 1;
		while i < chars.len() && chars[i].is_ascii_digit() {
			i += 1;
		}
	}
	let text: String = chars[start..i].iter().collect();
	(text.parse().unwrap_or(0.0), i)
}

fn lex_string(chars: &[char], start: usize) -> Result<(String, usize), Error> {
	let quote = chars[start];
	let mut i = start + 1;
	let mut out = String::new();
	loop {
		match chars.get(i) {
			None => return Err(Error::syntax(start, "unterminated string literal")),
			Some(&'\\') => match chars.get(i + 1) {
				Some(&'\\') => {
					out.push('\\');
					i += 2;
				}
				Some(&'\'') => {
					out.push('\'');
					i += 2;
				}
				Some(&'"') => {
					out.push('"');
					i += 2;
				}
				Some(&'n') => {
					out.push('\n');
					i += 2;
				}
				Some(&'t') => {
					out.push('\t');
					i += 2;
				}
				Some(&'r') => {
					out.push('\r');
					i += 2;
				}
				Some(&other) => {
					return Err(Error::syntax(i, format!("invalid escape character {other:?}")));
				}
				None => return Err(Error::syntax(start, "unterminated string literal")),
			},
			Some(&c) if c == quote => {
				i += 1;
				break;
			}
			Some(&c) => {
				out.push(c);
				i += 1;
			}
		}
	}
	Ok((out, i))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lexes_a_simple_child_path() {
		let tokens = lex("/numbers[3,6,-1,-2]").unwrap();
		assert_eq!(
			tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
			vec![
				TokenKind::Slash,
				TokenKind::Ident("numbers".into()),
				TokenKind::LBracket,
				TokenKind::Number(3.0),
				TokenKind::Comma,
				TokenKind::Number(6.0),
				TokenKind::Comma,
				TokenKind::Number(-1.0),
				TokenKind::Comma,
				TokenKind::Number(-2.0),
				TokenKind::RBracket,
				TokenKind::Eof,
			]
		);
	}

	#[test]
	fn lexes_quoted_string_with_escapes() {
		let tokens = lex(r#"['a\'b']"#).unwrap();
		assert_eq!(tokens[1].kind, TokenKind::StringLiteral("a'b".into()));
	}

	#[test]
	fn unterminated_string_is_syntax_error() {
		let err = lex("['abc").unwrap_err();
		assert!(matches!(err, Error::PathSyntax { .. }));
	}

	#[test]
	fn range_token_inside_brackets() {
		let tokens = lex("[0..-1]").unwrap();
		assert_eq!(
			tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
			vec![
				TokenKind::LBracket,
				TokenKind::Number(0.0),
				TokenKind::DoubleDot,
				TokenKind::Number(-1.0),
				TokenKind::RBracket,
				TokenKind::Eof,
			]
		);
	}
}
