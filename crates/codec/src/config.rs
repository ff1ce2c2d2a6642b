//! Codec configuration.

use latch_convert::encode_int;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifier length limit of the reference platform, in characters.
pub const DEFAULT_MAX_LEN: usize = 100;

/// Wire format parameters of an [`IdCodec`](crate::IdCodec).
///
/// Every parameter is part of the format: two codecs only interoperate when
/// their configurations are equal.
///
/// ```toml
/// separator = "\u0001"
/// null = "\u0000"
/// escape = "\\"
/// increment_len = 1
/// version = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
	/// Delimits the cookie and field segments.
	pub separator: char,
	/// A field segment consisting of only this character is an absent field.
	pub null: char,
	/// Makes the following character literal.
	pub escape: char,
	/// Width in bytes of the anti-collision counter token. `0` disables it.
	pub increment_len: u8,
	/// Format version written before the cookie and checked on decode.
	pub version: u8,
	/// Whether the version is written and checked at all.
	pub versioned: bool,
	/// Maximum identifier length in characters.
	pub max_len: usize,
}

impl Default for CodecConfig {
	fn default() -> Self {
		Self {
			separator: '\u{1}',
			null: '\u{0}',
			escape: '\\',
			increment_len: 0,
			version: 0,
			versioned: true,
			max_len: DEFAULT_MAX_LEN,
		}
	}
}

impl CodecConfig {
	/// Parses and validates a TOML document. Missing keys take their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Sets the format version, or disables versioning with `None`.
	pub fn with_version(mut self, version: Option<u8>) -> Self {
		self.versioned = version.is_some();
		self.version = version.unwrap_or_default();
		self
	}

	pub fn with_increment_len(mut self, len: u8) -> Self {
		self.increment_len = len;
		self
	}

	pub fn with_control_chars(mut self, separator: char, null: char, escape: char) -> Self {
		self.separator = separator;
		self.null = null;
		self.escape = escape;
		self
	}

	/// The active version, if versioning is enabled.
	pub fn version(&self) -> Option<u8> {
		self.versioned.then_some(self.version)
	}

	/// Checks that the configuration describes a decodable format.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.null == self.separator || self.null == self.escape {
			return Err(ConfigError::DuplicateControlChar(self.null));
		}
		if self.separator == self.escape {
			return Err(ConfigError::DuplicateControlChar(self.separator));
		}
		if let Some(version) = self.version()
			&& encode_int(i64::from(version)).len() != 1
		{
			return Err(ConfigError::VersionTooWide(version));
		}
		if self.increment_len > 8 {
			return Err(ConfigError::IncrementTooWide(self.increment_len));
		}
		Ok(())
	}
}
