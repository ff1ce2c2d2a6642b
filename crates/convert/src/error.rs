//! Error types for value conversion.

use thiserror::Error;

use crate::ty::TypeHint;

/// No registered converter resolves a type hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not find converter for type `{ty}`")]
pub struct ConverterNotFound {
	/// The unresolved hint, rendered.
	pub ty: String,
}

impl ConverterNotFound {
	pub(crate) fn new(hint: &TypeHint) -> Self {
		Self { ty: hint.to_string() }
	}
}

/// Errors raised while converting between values and strings.
#[derive(Debug, Error)]
pub enum ConvertError {
	/// No converter for the field type.
	#[error(transparent)]
	NotFound(#[from] ConverterNotFound),
	/// The encoded text is not a valid rendering of the type.
	#[error("cannot decode `{ty}`: {reason}")]
	Malformed {
		/// Target type name.
		ty: String,
		/// What was wrong with the input.
		reason: String,
	},
	/// The value handed to a converter is of the wrong kind.
	#[error("expected a `{expected}` value, got {found}")]
	TypeMismatch {
		/// Type the converter serves.
		expected: String,
		/// [`Value::kind`](crate::Value::kind) of the offending value.
		found: &'static str,
	},
	/// Failure inside an application converter.
	#[error("converter failed: {0}")]
	Custom(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ConvertError {
	pub(crate) fn malformed(ty: impl ToString, reason: impl Into<String>) -> Self {
		Self::Malformed {
			ty: ty.to_string(),
			reason: reason.into(),
		}
	}

	/// Wraps an application converter failure.
	pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		Self::Custom(err.into())
	}
}

/// Errors raised while building a [`FieldSchema`](crate::FieldSchema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
	/// Two fields share a name.
	#[error("duplicate field `{0}` in schema")]
	DuplicateField(String),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
