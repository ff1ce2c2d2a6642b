//! The converter contract and the built-in converters.
//!
//! Byte-oriented encodings (integers, floats) are rendered one byte per
//! character in the Latin-1 range (`U+0000..=U+00FF`). The platform counts
//! identifier length in characters, so this is the densest rendering that is
//! still a valid string.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ConvertError, Result};
use crate::ty::{TypeHint, ValueType};
use crate::value::{EnumValue, Value};

/// Bidirectional value/string codec for one semantic type.
///
/// `from_str(to_str(v))` must yield `v`. Both directions are async so that
/// application converters may consult external services.
#[async_trait]
pub trait Converter: Send + Sync + 'static {
	/// Renders `value` as text.
	async fn to_str(&self, value: &Value) -> Result<String>;

	/// Parses text produced by [`Converter::to_str`].
	async fn from_str(&self, raw: &str) -> Result<Value>;
}

/// Produces a converter bound to the hint it was resolved for.
///
/// Binding lets one registration serve many concrete types; the enum
/// converter, for instance, needs to know which enumeration to rebuild.
pub trait ConverterFactory: Send + Sync + 'static {
	fn bind(&self, hint: &TypeHint) -> Arc<dyn Converter>;
}

impl<F> ConverterFactory for F
where
	F: Fn(&TypeHint) -> Arc<dyn Converter> + Send + Sync + 'static,
{
	fn bind(&self, hint: &TypeHint) -> Arc<dyn Converter> {
		self(hint)
	}
}

/// Renders bytes as Latin-1 characters.
pub fn bytes_to_latin1(bytes: &[u8]) -> String {
	bytes.iter().copied().map(char::from).collect()
}

/// Inverse of [`bytes_to_latin1`]. Fails on any character above `U+00FF`.
pub fn latin1_to_bytes(text: &str) -> Option<Vec<u8>> {
	text.chars().map(|c| u8::try_from(c).ok()).collect()
}

/// Minimal little-endian two's-complement encoding of `value`.
///
/// Length is `bit_length / 8 + 1` bytes, where the bit length is taken of
/// `value` for non-negative input and of `!value` otherwise. The top bit of
/// the last byte is therefore always the sign bit.
pub fn encode_int(value: i64) -> Vec<u8> {
	let magnitude = (if value < 0 { !value } else { value }) as u64;
	let bit_length = u64::BITS - magnitude.leading_zeros();
	let len = (bit_length / 8 + 1) as usize;
	value.to_le_bytes()[..len].to_vec()
}

/// Inverse of [`encode_int`]. Accepts 1 to 8 bytes and sign-extends.
pub fn decode_int(bytes: &[u8]) -> Option<i64> {
	let last = *bytes.last()?;
	if bytes.len() > 8 {
		return None;
	}
	let fill = if last & 0x80 != 0 { 0xff } else { 0x00 };
	let mut buf = [fill; 8];
	buf[..bytes.len()].copy_from_slice(bytes);
	Some(i64::from_le_bytes(buf))
}

pub(crate) fn int_to_str(value: i64) -> String {
	bytes_to_latin1(&encode_int(value))
}

pub(crate) fn int_from_str(ty: &TypeHint, raw: &str) -> Result<i64> {
	let bytes = latin1_to_bytes(raw).ok_or_else(|| ConvertError::malformed(ty, "character outside the byte range"))?;
	decode_int(&bytes).ok_or_else(|| ConvertError::malformed(ty, format!("expected 1 to 8 bytes, got {}", bytes.len())))
}

fn mismatch(ty: &TypeHint, value: &Value) -> ConvertError {
	ConvertError::TypeMismatch {
		expected: ty.to_string(),
		found: value.kind(),
	}
}

/// Integers, variable-length binary.
///
/// Booleans are accepted on encode as 0 and 1, since `bool` derives from
/// `int`. They decode as integers.
#[derive(Debug, Clone)]
pub struct IntConverter {
	ty: TypeHint,
}

impl IntConverter {
	pub fn new(ty: TypeHint) -> Self {
		Self { ty }
	}
}

#[async_trait]
impl Converter for IntConverter {
	async fn to_str(&self, value: &Value) -> Result<String> {
		let v = match value {
			Value::Bool(b) => i64::from(*b),
			other => other.as_int().ok_or_else(|| mismatch(&self.ty, other))?,
		};
		Ok(int_to_str(v))
	}

	async fn from_str(&self, raw: &str) -> Result<Value> {
		int_from_str(&self.ty, raw).map(Value::Int)
	}
}

/// Floats, fixed 8-byte little-endian IEEE-754.
#[derive(Debug, Clone)]
pub struct FloatConverter {
	ty: TypeHint,
}

impl FloatConverter {
	pub fn new(ty: TypeHint) -> Self {
		Self { ty }
	}
}

#[async_trait]
impl Converter for FloatConverter {
	async fn to_str(&self, value: &Value) -> Result<String> {
		let v = value.as_float().ok_or_else(|| mismatch(&self.ty, value))?;
		Ok(bytes_to_latin1(&v.to_le_bytes()))
	}

	async fn from_str(&self, raw: &str) -> Result<Value> {
		let bytes = latin1_to_bytes(raw).ok_or_else(|| ConvertError::malformed(&self.ty, "character outside the byte range"))?;
		let bytes: [u8; 8] = bytes
			.try_into()
			.map_err(|b: Vec<u8>| ConvertError::malformed(&self.ty, format!("expected 8 bytes, got {}", b.len())))?;
		Ok(Value::Float(f64::from_le_bytes(bytes)))
	}
}

/// Text, passed through unchanged.
#[derive(Debug, Clone)]
pub struct StrConverter {
	ty: TypeHint,
}

impl StrConverter {
	pub fn new(ty: TypeHint) -> Self {
		Self { ty }
	}
}

#[async_trait]
impl Converter for StrConverter {
	async fn to_str(&self, value: &Value) -> Result<String> {
		value.as_str().map(str::to_owned).ok_or_else(|| mismatch(&self.ty, value))
	}

	async fn from_str(&self, raw: &str) -> Result<Value> {
		Ok(Value::Str(raw.to_owned()))
	}
}

/// Booleans as `"0"` / `"1"`.
///
/// Decoding accepts any decimal integer; nonzero is true.
#[derive(Debug, Clone)]
pub struct BoolConverter {
	ty: TypeHint,
}

impl BoolConverter {
	pub fn new(ty: TypeHint) -> Self {
		Self { ty }
	}
}

#[async_trait]
impl Converter for BoolConverter {
	async fn to_str(&self, value: &Value) -> Result<String> {
		let v = value.as_bool().ok_or_else(|| mismatch(&self.ty, value))?;
		Ok(if v { "1" } else { "0" }.to_owned())
	}

	async fn from_str(&self, raw: &str) -> Result<Value> {
		let n: i64 = raw.parse().map_err(|e| ConvertError::malformed(&self.ty, format!("{e}")))?;
		Ok(Value::Bool(n != 0))
	}
}

/// Enumerations, encoded as the variant's integer value.
#[derive(Debug, Clone)]
pub struct EnumConverter {
	hint: TypeHint,
	ty: ValueType,
}

impl EnumConverter {
	/// Binds to the enumeration named by `hint`.
	pub fn new(hint: TypeHint) -> Self {
		let ty = hint.origin().cloned().unwrap_or_else(ValueType::enumeration_base);
		Self { hint, ty }
	}
}

#[async_trait]
impl Converter for EnumConverter {
	async fn to_str(&self, value: &Value) -> Result<String> {
		let v = value.as_enum().ok_or_else(|| mismatch(&self.hint, value))?;
		if !v.ty().is_subtype_of(&self.ty) {
			return Err(ConvertError::TypeMismatch {
				expected: self.ty.to_string(),
				found: "enum",
			});
		}
		Ok(int_to_str(v.value()))
	}

	async fn from_str(&self, raw: &str) -> Result<Value> {
		let n = int_from_str(&self.hint, raw)?;
		EnumValue::new(&self.ty, n)
			.map(Value::Enum)
			.ok_or_else(|| ConvertError::malformed(&self.ty, format!("{n} is not a variant")))
	}
}

/// Factory for a built-in converter type.
pub(crate) fn builtin<C, F>(make: F) -> Arc<dyn ConverterFactory>
where
	C: Converter,
	F: Fn(TypeHint) -> C + Send + Sync + 'static,
{
	Arc::new(move |hint: &TypeHint| Arc::new(make(hint.clone())) as Arc<dyn Converter>)
}
