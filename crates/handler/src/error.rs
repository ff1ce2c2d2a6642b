use latch_convert::{ConvertError, ConverterNotFound, SchemaError};
use thiserror::Error;

/// Errors raised while registering handlers.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// The cookie is taken and the registry rejects duplicates.
	#[error("component cookie `{0}` is already registered")]
	DuplicateCookie(String),
	#[error(transparent)]
	Schema(#[from] SchemaError),
	/// A schema field has no converter.
	#[error("field `{field}` of component `{cookie}` cannot be converted: {source}")]
	Converter {
		cookie: String,
		field: String,
		#[source]
		source: ConverterNotFound,
	},
}

/// Errors raised while reading callback arguments.
#[derive(Debug, Error)]
pub enum ArgError {
	/// The field was absent and has no default.
	#[error("argument `{0}` is missing and has no default")]
	Missing(String),
	#[error(transparent)]
	Convert(#[from] ConvertError),
}
