//! Codec and configuration errors.

use latch_convert::{ConvertError, ConverterNotFound};
use thiserror::Error;

/// Errors raised while encoding or decoding an identifier.
#[derive(Debug, Error)]
pub enum CodecError {
	/// A field converter failed or could not be resolved.
	#[error(transparent)]
	Convert(#[from] ConvertError),
	/// The encoded identifier exceeds the platform limit.
	#[error(
		"identifier for component `{cookie}` is {length} characters, limit is {limit}; \
		 reduce the number of fields or use terser field types"
	)]
	IdentifierTooLong {
		cookie: String,
		length: usize,
		limit: usize,
	},
	/// No handler is registered for the decoded cookie.
	#[error("no component registered with cookie `{cookie}`")]
	UnknownCookie { cookie: String },
	/// The identifier was produced by an incompatible codec revision.
	#[error("cannot decode identifier version {found}, expected version {expected}")]
	VersionMismatch { expected: u8, found: i64 },
	/// The identifier is not well formed.
	#[error("malformed identifier: {0}")]
	Malformed(String),
}

impl CodecError {
	/// Returns true for identifiers this codec did not produce.
	///
	/// Dispatchers ignore these: not every inbound identifier belongs to the
	/// application, and outdated ones outlive a version bump.
	pub fn is_foreign(&self) -> bool {
		matches!(self, Self::UnknownCookie { .. } | Self::VersionMismatch { .. })
	}
}

impl From<ConverterNotFound> for CodecError {
	fn from(err: ConverterNotFound) -> Self {
		Self::Convert(err.into())
	}
}

/// Errors raised while building a codec configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to parse codec config: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("control character {0:?} is used for more than one role")]
	DuplicateControlChar(char),
	#[error("version {0} does not encode to a single character")]
	VersionTooWide(u8),
	#[error("increment length {0} exceeds 8 bytes")]
	IncrementTooWide(u8),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
