//! Ordered field schemas.

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::ty::TypeHint;
use crate::value::Value;

/// One declared field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
	name: String,
	hint: TypeHint,
	default: Option<Value>,
}

impl FieldSpec {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn hint(&self) -> &TypeHint {
		&self.hint
	}

	/// Value handed to the callback when the field is absent.
	pub fn default(&self) -> Option<&Value> {
		self.default.as_ref()
	}
}

/// Ordered field-name to type mapping of one component.
///
/// Order is positional on the wire: field `i` is encoded as segment `i`
/// after the cookie.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSchema {
	fields: IndexMap<String, FieldSpec>,
}

impl FieldSchema {
	/// Starts a schema.
	pub fn builder() -> FieldSchemaBuilder {
		FieldSchemaBuilder::default()
	}

	/// A schema with no fields.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<&FieldSpec> {
		self.fields.get(name)
	}

	/// Wire position of `name`.
	pub fn position(&self, name: &str) -> Option<usize> {
		self.fields.get_index_of(name)
	}

	/// Iterates in wire order.
	pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldSpec> {
		self.fields.values()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}
}

impl<'a> IntoIterator for &'a FieldSchema {
	type Item = &'a FieldSpec;
	type IntoIter = indexmap::map::Values<'a, String, FieldSpec>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.values()
	}
}

/// Builder for [`FieldSchema`]. Duplicate names are reported by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct FieldSchemaBuilder {
	fields: Vec<FieldSpec>,
}

impl FieldSchemaBuilder {
	/// Appends a field with no default.
	pub fn field(mut self, name: impl Into<String>, hint: impl Into<TypeHint>) -> Self {
		self.fields.push(FieldSpec {
			name: name.into(),
			hint: hint.into(),
			default: None,
		});
		self
	}

	/// Appends a field that falls back to `default` when absent.
	pub fn field_with_default(
		mut self,
		name: impl Into<String>,
		hint: impl Into<TypeHint>,
		default: impl Into<Value>,
	) -> Self {
		self.fields.push(FieldSpec {
			name: name.into(),
			hint: hint.into(),
			default: Some(default.into()),
		});
		self
	}

	pub fn build(self) -> Result<FieldSchema, SchemaError> {
		let mut fields = IndexMap::with_capacity(self.fields.len());
		for spec in self.fields {
			if fields.contains_key(&spec.name) {
				return Err(SchemaError::DuplicateField(spec.name));
			}
			fields.insert(spec.name.clone(), spec);
		}
		Ok(FieldSchema { fields })
	}
}
