//! Semantic value types and the type hints that select converters.
//!
//! A [`ValueType`] is a named node in a single-inheritance tree. Subtyping is
//! what lets a converter registered for a base (e.g. [`ValueType::enumeration_base`])
//! serve every type derived from it. A [`TypeHint`] is what a field schema
//! declares: a plain type, a union, or a parametrized generic.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use crate::value::EnumValue;

struct TypeInner {
	name: Cow<'static, str>,
	base: Option<ValueType>,
	variants: Vec<(Cow<'static, str>, i64)>,
}

/// A named semantic type.
///
/// Identity is the name: two `ValueType`s with the same name compare equal
/// and hash identically, so names must be unique within one process.
#[derive(Clone)]
pub struct ValueType(Arc<TypeInner>);

struct Builtins {
	none: ValueType,
	int: ValueType,
	float: ValueType,
	str: ValueType,
	bool: ValueType,
	literal: ValueType,
	enumeration: ValueType,
}

static BUILTINS: LazyLock<Builtins> = LazyLock::new(|| {
	let int = ValueType::new("int");
	Builtins {
		none: ValueType::new("none"),
		bool: ValueType::subtype("bool", &int),
		int,
		float: ValueType::new("float"),
		str: ValueType::new("str"),
		literal: ValueType::new("literal"),
		enumeration: ValueType::new("enum"),
	}
});

impl ValueType {
	/// Creates a root type with no base.
	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self(Arc::new(TypeInner {
			name: name.into(),
			base: None,
			variants: Vec::new(),
		}))
	}

	/// Creates a type deriving from `base`.
	pub fn subtype(name: impl Into<Cow<'static, str>>, base: &ValueType) -> Self {
		Self(Arc::new(TypeInner {
			name: name.into(),
			base: Some(base.clone()),
			variants: Vec::new(),
		}))
	}

	/// Creates an enumeration deriving from [`ValueType::enumeration_base`].
	///
	/// Each variant carries the integer value that is placed on the wire.
	pub fn enumeration<N>(name: impl Into<Cow<'static, str>>, variants: impl IntoIterator<Item = (N, i64)>) -> Self
	where
		N: Into<Cow<'static, str>>,
	{
		Self(Arc::new(TypeInner {
			name: name.into(),
			base: Some(Self::enumeration_base()),
			variants: variants.into_iter().map(|(n, v)| (n.into(), v)).collect(),
		}))
	}

	/// The absent type. Skipped when resolving unions; never has a converter.
	pub fn none() -> Self {
		BUILTINS.none.clone()
	}

	/// Signed 64-bit integers.
	pub fn int() -> Self {
		BUILTINS.int.clone()
	}

	/// 64-bit IEEE-754 floats.
	pub fn float() -> Self {
		BUILTINS.float.clone()
	}

	/// Text.
	pub fn str() -> Self {
		BUILTINS.str.clone()
	}

	/// Booleans. A subtype of [`ValueType::int`]; `int` fields accept
	/// [`Value::Bool`](crate::Value::Bool) as 0 or 1.
	pub fn bool() -> Self {
		BUILTINS.bool.clone()
	}

	/// A field restricted to a fixed set of strings. Carried as plain text.
	pub fn literal() -> Self {
		BUILTINS.literal.clone()
	}

	/// Base of every type built with [`ValueType::enumeration`].
	pub fn enumeration_base() -> Self {
		BUILTINS.enumeration.clone()
	}

	/// Returns the type name.
	pub fn name(&self) -> &str {
		&self.0.name
	}

	/// Returns the direct base type, if any.
	pub fn base(&self) -> Option<&ValueType> {
		self.0.base.as_ref()
	}

	/// Returns true for [`ValueType::none`].
	pub fn is_none(&self) -> bool {
		*self == BUILTINS.none
	}

	/// Iterates over this type followed by each of its bases, nearest first.
	pub fn ancestry(&self) -> impl Iterator<Item = &ValueType> {
		std::iter::successors(Some(self), |ty| ty.base())
	}

	/// Returns true if `self` is `other` or derives from it.
	pub fn is_subtype_of(&self, other: &ValueType) -> bool {
		self.ancestry().any(|ty| ty == other)
	}

	/// Returns the declared variants of an enumeration type.
	pub fn variants(&self) -> impl Iterator<Item = (&str, i64)> {
		self.0.variants.iter().map(|(n, v)| (n.as_ref(), *v))
	}

	/// Looks up an enumeration variant by name.
	pub fn variant(&self, name: &str) -> Option<EnumValue> {
		self.0
			.variants
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| EnumValue::new_unchecked(self.clone(), *v))
	}

	/// Looks up an enumeration variant by its wire value.
	pub fn variant_by_value(&self, value: i64) -> Option<EnumValue> {
		self.0
			.variants
			.iter()
			.any(|(_, v)| *v == value)
			.then(|| EnumValue::new_unchecked(self.clone(), value))
	}

	pub(crate) fn variant_name(&self, value: i64) -> Option<&str> {
		self.0.variants.iter().find(|(_, v)| *v == value).map(|(n, _)| n.as_ref())
	}
}

impl PartialEq for ValueType {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
	}
}

impl Eq for ValueType {}

impl Hash for ValueType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.name.hash(state);
	}
}

impl fmt::Debug for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ValueType").field(&self.name()).finish()
	}
}

impl fmt::Display for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// The declared type of a schema field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeHint {
	/// A plain semantic type.
	Type(ValueType),
	/// A union. Resolution uses the leftmost alternative that is not [`ValueType::none`].
	Union(Vec<TypeHint>),
	/// A parametrized type. Resolution looks up `origin`; the converter still
	/// receives the full hint.
	Generic {
		/// The unparametrized type.
		origin: ValueType,
		/// Type arguments.
		args: Vec<TypeHint>,
	},
}

impl TypeHint {
	/// `ty | none`.
	pub fn optional(ty: impl Into<TypeHint>) -> Self {
		Self::Union(vec![ty.into(), Self::Type(ValueType::none())])
	}

	/// A union of the given alternatives, in declaration order.
	pub fn union<I, T>(alternatives: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<TypeHint>,
	{
		Self::Union(alternatives.into_iter().map(Into::into).collect())
	}

	/// `origin[args..]`.
	pub fn generic<I, T>(origin: ValueType, args: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<TypeHint>,
	{
		Self::Generic {
			origin,
			args: args.into_iter().map(Into::into).collect(),
		}
	}

	/// Strips unions down to their leftmost non-none alternative.
	///
	/// Returns `None` for a union with no such alternative.
	pub fn leftmost(&self) -> Option<&TypeHint> {
		match self {
			Self::Union(alternatives) => alternatives.iter().find_map(|alt| match alt {
				Self::Type(ty) if ty.is_none() => None,
				other => other.leftmost(),
			}),
			other => Some(other),
		}
	}

	/// Returns the type used for registry lookup: the type itself, or the
	/// origin of a generic. Unions have no origin until stripped with
	/// [`TypeHint::leftmost`].
	pub fn origin(&self) -> Option<&ValueType> {
		match self {
			Self::Type(ty) => Some(ty),
			Self::Generic { origin, .. } => Some(origin),
			Self::Union(_) => None,
		}
	}
}

impl From<ValueType> for TypeHint {
	fn from(ty: ValueType) -> Self {
		Self::Type(ty)
	}
}

impl From<&ValueType> for TypeHint {
	fn from(ty: &ValueType) -> Self {
		Self::Type(ty.clone())
	}
}

impl fmt::Display for TypeHint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Type(ty) => write!(f, "{ty}"),
			Self::Union(alternatives) => {
				for (i, alt) in alternatives.iter().enumerate() {
					if i > 0 {
						f.write_str(" | ")?;
					}
					write!(f, "{alt}")?;
				}
				Ok(())
			}
			Self::Generic { origin, args } => {
				write!(f, "{origin}[")?;
				for (i, arg) in args.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{arg}")?;
				}
				f.write_str("]")
			}
		}
	}
}
