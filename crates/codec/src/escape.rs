//! Escaping and the escape-aware segment tokenizer.
//!
//! Every occurrence of the separator, null or escape character inside a
//! segment is prefixed with the escape character. Escaping happens once per
//! segment before joining; unescaping happens once per token after
//! splitting.

use crate::error::{CodecError, Result};

/// The three control characters of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
	pub separator: char,
	pub null: char,
	pub escape: char,
}

impl Charset {
	fn is_control(&self, c: char) -> bool {
		c == self.separator || c == self.null || c == self.escape
	}

	/// Escapes every control character in `raw`.
	pub fn escape(&self, raw: &str) -> String {
		let mut out = String::with_capacity(raw.len());
		for c in raw.chars() {
			if self.is_control(c) {
				out.push(self.escape);
			}
			out.push(c);
		}
		out
	}

	/// Splits `text` on unescaped separators. Tokens keep their escapes.
	///
	/// Fails if `text` ends in an escape character with nothing to escape.
	pub fn split<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
		let mut tokens = Vec::new();
		let mut start = 0;
		let mut chars = text.char_indices();
		while let Some((i, c)) = chars.next() {
			if c == self.escape {
				if chars.next().is_none() {
					return Err(CodecError::Malformed(format!("dangling escape at offset {i}")));
				}
			} else if c == self.separator {
				tokens.push(&text[start..i]);
				start = i + c.len_utf8();
			}
		}
		tokens.push(&text[start..]);
		Ok(tokens)
	}

	/// Splits off the first token at the first unescaped separator.
	///
	/// Returns the token with its escapes and the text after the separator.
	/// Never fails: a dangling escape stays in the token.
	pub fn split_first<'a>(&self, text: &'a str) -> (&'a str, Option<&'a str>) {
		let mut chars = text.char_indices();
		while let Some((i, c)) = chars.next() {
			if c == self.escape {
				chars.next();
			} else if c == self.separator {
				return (&text[..i], Some(&text[i + c.len_utf8()..]));
			}
		}
		(text, None)
	}

	/// Removes one level of escaping from a token produced by [`split`](Self::split).
	pub fn unescape(&self, token: &str) -> String {
		let mut out = String::with_capacity(token.len());
		let mut chars = token.chars();
		while let Some(c) = chars.next() {
			if c == self.escape {
				if let Some(next) = chars.next() {
					out.push(next);
				}
			} else {
				out.push(c);
			}
		}
		out
	}

	/// Returns true if `token` is the bare null marker.
	pub fn is_null(&self, token: &str) -> bool {
		let mut chars = token.chars();
		chars.next() == Some(self.null) && chars.next().is_none()
	}
}
