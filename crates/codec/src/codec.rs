//! The identifier codec.
//!
//! Wire layout, with `|` standing for the separator:
//!
//! ```text
//! [version][increment]cookie|field0|field1|...
//! ```
//!
//! `version` is one character (the integer encoding of the configured
//! version), `increment` is `increment_len` characters of counter bytes.
//! Both are fixed width and unescaped. The cookie and every field segment
//! are escaped; an absent field is the bare null character.

use std::sync::atomic::{AtomicU64, Ordering};

use latch_convert::{ConverterRegistry, FieldSchema, FieldValues, bytes_to_latin1, decode_int, encode_int};

use crate::config::CodecConfig;
use crate::error::{CodecError, ConfigError, Result};
use crate::escape::Charset;
use crate::lookup::{Component, HandlerLookup};

/// Encodes component state into identifiers and decodes it back.
///
/// The only mutable state is the increment counter, so one codec is shared by
/// every task of a process.
#[derive(Debug)]
pub struct IdCodec {
	config: CodecConfig,
	charset: Charset,
	version_prefix: String,
	counter: AtomicU64,
}

impl IdCodec {
	/// Builds a codec, validating `config`.
	pub fn from_config(config: CodecConfig) -> std::result::Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::with_valid_config(config))
	}

	fn with_valid_config(config: CodecConfig) -> Self {
		let version_prefix = config
			.version()
			.map(|v| bytes_to_latin1(&encode_int(i64::from(v))))
			.unwrap_or_default();
		Self {
			charset: Charset {
				separator: config.separator,
				null: config.null,
				escape: config.escape,
			},
			version_prefix,
			counter: AtomicU64::new(0),
			config,
		}
	}

	pub fn config(&self) -> &CodecConfig {
		&self.config
	}

	pub fn charset(&self) -> Charset {
		self.charset
	}

	/// See [`Charset::escape`].
	pub fn escape(&self, raw: &str) -> String {
		self.charset.escape(raw)
	}

	/// See [`Charset::split`].
	pub fn split<'a>(&self, text: &'a str) -> Result<Vec<&'a str>> {
		self.charset.split(text)
	}

	/// See [`Charset::unescape`].
	pub fn unescape(&self, token: &str) -> String {
		self.charset.unescape(token)
	}

	fn next_increment(&self) -> String {
		let len = usize::from(self.config.increment_len);
		if len == 0 {
			return String::new();
		}
		let n = self.counter.fetch_add(1, Ordering::Relaxed);
		bytes_to_latin1(&n.to_le_bytes()[..len])
	}

	/// Encodes `values` for the component `cookie` with field layout `schema`.
	///
	/// Fields are written in schema order; a field missing from `values` is
	/// written as absent, and names in `values` outside the schema are
	/// skipped. Every call advances the increment counter.
	pub async fn serialize(
		&self,
		converters: &ConverterRegistry,
		cookie: &str,
		schema: &FieldSchema,
		values: &FieldValues,
	) -> Result<String> {
		let mut out = String::new();
		out.push_str(&self.version_prefix);
		out.push_str(&self.next_increment());
		out.push_str(&self.charset.escape(cookie));

		for field in schema {
			out.push(self.charset.separator);
			match values.get(field.name()) {
				None => out.push(self.charset.null),
				Some(value) => {
					let text = converters.to_str(field.hint(), value).await?;
					out.push_str(&self.charset.escape(&text));
				}
			}
		}

		for name in values.names().filter(|name| schema.get(name).is_none()) {
			tracing::trace!(%cookie, field = name, "value has no schema field; skipped");
		}

		let length = out.chars().count();
		if length > self.config.max_len {
			return Err(CodecError::IdentifierTooLong {
				cookie: cookie.to_owned(),
				length,
				limit: self.config.max_len,
			});
		}
		Ok(out)
	}

	/// Checks the version and strips the fixed-width head.
	///
	/// A head that is cut short is not an error yet: the body is left empty
	/// and the reason kept, so that a foreign identifier is still reported
	/// by its cookie.
	fn strip_head<'a>(&self, identifier: &'a str) -> Result<Head<'a>> {
		let mut rest = identifier;
		if let Some(expected) = self.config.version() {
			let mut chars = rest.chars();
			let Some(c) = chars.next() else {
				return Ok(Head::truncated("empty identifier".to_owned()));
			};
			let found = u8::try_from(c)
				.ok()
				.and_then(|b| decode_int(&[b]))
				.unwrap_or(i64::from(u32::from(c)));
			if found != i64::from(expected) {
				return Err(CodecError::VersionMismatch { expected, found });
			}
			rest = chars.as_str();
		}

		let increment_len = usize::from(self.config.increment_len);
		let mut chars = rest.chars();
		for _ in 0..increment_len {
			if chars.next().is_none() {
				return Ok(Head::truncated(format!(
					"identifier shorter than its {increment_len}-character increment"
				)));
			}
		}
		Ok(Head {
			body: chars.as_str(),
			truncated: None,
		})
	}

	/// Decodes only the cookie of `identifier`.
	///
	/// Checks the version but consults no registry, so it also names the
	/// cookie of identifiers whose component is not registered. Field
	/// segments are not inspected.
	pub fn peek_cookie(&self, identifier: &str) -> Result<String> {
		let head = self.strip_head(identifier)?;
		if let Some(reason) = head.truncated {
			return Err(CodecError::Malformed(reason));
		}
		let (cookie, _) = self.charset.split_first(head.body);
		Ok(self.charset.unescape(cookie))
	}

	/// Decodes `identifier` into its component and typed field values.
	///
	/// The cookie is looked up before the rest of the identifier is
	/// validated: an unregistered cookie is always [`CodecError::UnknownCookie`],
	/// and [`CodecError::Malformed`] is reserved for registered components.
	/// Absent fields are omitted from the returned map. Missing trailing
	/// segments count as absent; surplus segments are ignored.
	pub async fn deserialize<L: HandlerLookup>(
		&self,
		converters: &ConverterRegistry,
		identifier: &str,
		handlers: &L,
	) -> Result<(L::Handler, FieldValues)> {
		let head = self.strip_head(identifier)?;
		let (cookie, _) = self.charset.split_first(head.body);
		let cookie = self.charset.unescape(cookie);

		let Some(handler) = handlers.lookup(&cookie) else {
			return Err(CodecError::UnknownCookie { cookie });
		};
		if let Some(reason) = head.truncated {
			return Err(CodecError::Malformed(reason));
		}
		let tokens = self.charset.split(head.body)?;
		let segments = tokens.split_first().map_or(&[][..], |(_, rest)| rest);
		let schema = handler.schema();

		if segments.len() > schema.len() {
			tracing::debug!(
				%cookie,
				expected = schema.len(),
				found = segments.len(),
				"ignoring surplus identifier segments"
			);
		}

		let mut values = FieldValues::new();
		for (field, token) in schema.iter().zip(segments) {
			if self.charset.is_null(token) {
				continue;
			}
			let raw = self.charset.unescape(token);
			let value = converters.from_str(field.hint(), &raw).await?;
			values.insert(field.name(), value);
		}
		Ok((handler, values))
	}
}

/// Identifier body after the version and increment.
struct Head<'a> {
	body: &'a str,
	truncated: Option<String>,
}

impl Head<'_> {
	fn truncated(reason: String) -> Self {
		Self {
			body: "",
			truncated: Some(reason),
		}
	}
}

impl Default for IdCodec {
	fn default() -> Self {
		Self::with_valid_config(CodecConfig::default())
	}
}

#[cfg(test)]
mod tests;
