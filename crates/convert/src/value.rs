//! Dynamically typed field values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::ConvertError;
use crate::ty::ValueType;

/// A member of an enumeration type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue {
	ty: ValueType,
	value: i64,
}

impl EnumValue {
	/// Builds a member of `ty`, checking that `value` is one of its variants.
	pub fn new(ty: &ValueType, value: i64) -> Option<Self> {
		ty.variant_by_value(value)
	}

	pub(crate) fn new_unchecked(ty: ValueType, value: i64) -> Self {
		Self { ty, value }
	}

	/// The enumeration type.
	pub fn ty(&self) -> &ValueType {
		&self.ty
	}

	/// The wire value.
	pub fn value(&self) -> i64 {
		self.value
	}

	/// The variant name.
	pub fn name(&self) -> &str {
		self.ty.variant_name(self.value).unwrap_or_default()
	}
}

/// A type-erased application value handled by an application converter.
///
/// Equality is identity: two `CustomValue`s are equal only when they share
/// the same allocation.
#[derive(Clone)]
pub struct CustomValue {
	type_name: &'static str,
	inner: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
	/// Wraps `value`.
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self {
			type_name: std::any::type_name::<T>(),
			inner: Arc::new(value),
		}
	}

	/// The Rust type name of the wrapped value.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Borrows the wrapped value as `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.inner.downcast_ref()
	}
}

impl PartialEq for CustomValue {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for CustomValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("CustomValue").field(&self.type_name).finish()
	}
}

/// A decoded or to-be-encoded field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Int(i64),
	Float(f64),
	Str(String),
	Bool(bool),
	Enum(EnumValue),
	Custom(CustomValue),
}

impl Value {
	/// Wraps an application value.
	pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
		Self::Custom(CustomValue::new(value))
	}

	/// Short name of the variant, used in mismatch diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "str",
			Self::Bool(_) => "bool",
			Self::Enum(_) => "enum",
			Self::Custom(_) => "custom",
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_enum(&self) -> Option<&EnumValue> {
		match self {
			Self::Enum(v) => Some(v),
			_ => None,
		}
	}

	/// Borrows a [`Value::Custom`] payload as `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		match self {
			Self::Custom(v) => v.downcast_ref(),
			_ => None,
		}
	}
}

macro_rules! impl_from_int {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(v: $ty) -> Self {
					Self::Int(i64::from(v))
				}
			}
		)*
	};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Self::Float(v)
	}
}

impl From<f32> for Value {
	fn from(v: f32) -> Self {
		Self::Float(f64::from(v))
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Self::Str(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Self::Str(v.to_owned())
	}
}

impl From<EnumValue> for Value {
	fn from(v: EnumValue) -> Self {
		Self::Enum(v)
	}
}

impl From<CustomValue> for Value {
	fn from(v: CustomValue) -> Self {
		Self::Custom(v)
	}
}

/// Extraction of a strongly typed Rust value from a [`Value`].
pub trait FromValue: Sized {
	fn from_value(value: &Value) -> Result<Self, ConvertError>;
}

fn mismatch(expected: &str, value: &Value) -> ConvertError {
	ConvertError::TypeMismatch {
		expected: expected.to_owned(),
		found: value.kind(),
	}
}

macro_rules! impl_from_value_int {
	($($ty:ty),*) => {
		$(
			impl FromValue for $ty {
				fn from_value(value: &Value) -> Result<Self, ConvertError> {
					let v = value.as_int().ok_or_else(|| mismatch(stringify!($ty), value))?;
					<$ty>::try_from(v).map_err(|_| ConvertError::Malformed {
						ty: stringify!($ty).to_owned(),
						reason: format!("{v} is out of range"),
					})
				}
			}
		)*
	};
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
	fn from_value(value: &Value) -> Result<Self, ConvertError> {
		value.as_float().ok_or_else(|| mismatch("f64", value))
	}
}

impl FromValue for bool {
	fn from_value(value: &Value) -> Result<Self, ConvertError> {
		value.as_bool().ok_or_else(|| mismatch("bool", value))
	}
}

impl FromValue for String {
	fn from_value(value: &Value) -> Result<Self, ConvertError> {
		value.as_str().map(str::to_owned).ok_or_else(|| mismatch("String", value))
	}
}

impl FromValue for EnumValue {
	fn from_value(value: &Value) -> Result<Self, ConvertError> {
		value.as_enum().cloned().ok_or_else(|| mismatch("enum", value))
	}
}

impl FromValue for Value {
	fn from_value(value: &Value) -> Result<Self, ConvertError> {
		Ok(value.clone())
	}
}

/// Field name to value map.
///
/// Keeps insertion order for display; equality ignores order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldValues(IndexMap<String, Value>);

impl FieldValues {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(name, value);
		self
	}

	/// Inserts a value, returning the previous one.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(name.into(), value.into())
	}

	/// Removes a value.
	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.0.shift_remove(name)
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Iterates over field names in insertion order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FieldValues {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

impl IntoIterator for FieldValues {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

#[cfg(test)]
mod tests;
