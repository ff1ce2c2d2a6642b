//! Semantic value types and the converter registry.
//!
//! Component state is carried on the wire as text. This crate supplies the
//! pieces that turn typed field values into that text and back:
//! - [`ValueType`] / [`TypeHint`]: what a field is declared as
//! - [`Value`] / [`FieldValues`]: what a field holds
//! - [`Converter`]: one bidirectional value/text codec
//! - [`ConverterRegistry`]: type-keyed converter lookup with subtype fallback
//! - [`FieldSchema`]: the ordered field list of one component

mod converter;
mod error;
mod registry;
mod schema;
mod ty;
mod value;

pub use converter::{
	BoolConverter, Converter, ConverterFactory, EnumConverter, FloatConverter, IntConverter, StrConverter,
	bytes_to_latin1, decode_int, encode_int, latin1_to_bytes,
};
pub use error::{ConvertError, ConverterNotFound, Result, SchemaError};
pub use registry::ConverterRegistry;
pub use schema::{FieldSchema, FieldSchemaBuilder, FieldSpec};
pub use ty::{TypeHint, ValueType};
pub use value::{CustomValue, EnumValue, FieldValues, FromValue, Value};
