//! Type-keyed converter registry with subtype fallback and a resolution cache.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::converter::{
	BoolConverter, Converter, ConverterFactory, EnumConverter, FloatConverter, IntConverter, StrConverter, builtin,
};
use crate::error::{ConverterNotFound, Result};
use crate::ty::{TypeHint, ValueType};
use crate::value::Value;

struct Entry {
	factory: Arc<dyn ConverterFactory>,
	supports_subclass: bool,
}

#[derive(Default)]
struct State {
	/// Registration order is the subtype scan order.
	entries: IndexMap<ValueType, Entry>,
	cache: FxHashMap<TypeHint, Arc<dyn Converter>>,
	/// Bumped on every registration so stale resolutions are not cached.
	generation: u64,
}

/// Maps semantic types to converters.
///
/// Registration is expected at startup; resolution happens on every encode
/// and decode and is memoized per distinct [`TypeHint`].
pub struct ConverterRegistry {
	state: RwLock<State>,
}

impl ConverterRegistry {
	/// Creates a registry with no converters.
	pub fn empty() -> Self {
		Self {
			state: RwLock::new(State::default()),
		}
	}

	/// Creates a registry holding the built-in converters.
	///
	/// `float`, `int`, `str` and `enum` also serve their subtypes; `bool` is
	/// exact (it would otherwise be shadowed by `int`, its base), as is
	/// `literal`, which is text on the wire.
	pub fn with_builtins() -> Self {
		let registry = Self::empty();
		registry.register_factory(ValueType::float(), builtin(FloatConverter::new), true);
		registry.register_factory(ValueType::int(), builtin(IntConverter::new), true);
		registry.register_factory(ValueType::str(), builtin(StrConverter::new), true);
		registry.register_factory(ValueType::enumeration_base(), builtin(EnumConverter::new), true);
		registry.register_factory(ValueType::bool(), builtin(BoolConverter::new), false);
		registry.register_factory(ValueType::literal(), builtin(StrConverter::new), false);
		registry
	}

	/// Registers a converter factory for `ty`.
	///
	/// Re-registering a type replaces its factory silently. Clears the
	/// resolution cache.
	pub fn register_factory(&self, ty: ValueType, factory: Arc<dyn ConverterFactory>, supports_subclass: bool) {
		let mut state = self.state.write();
		tracing::trace!(ty = %ty, supports_subclass, "registering converter");
		state.entries.insert(
			ty,
			Entry {
				factory,
				supports_subclass,
			},
		);
		state.cache.clear();
		state.generation += 1;
	}

	/// Registers a binding-independent converter instance for `ty`.
	pub fn register<C: Converter>(&self, ty: ValueType, converter: C, supports_subclass: bool) {
		let converter: Arc<dyn Converter> = Arc::new(converter);
		self.register_factory(ty, Arc::new(move |_: &TypeHint| Arc::clone(&converter)), supports_subclass);
	}

	/// Returns true if `ty` has an exact registration.
	pub fn contains(&self, ty: &ValueType) -> bool {
		self.state.read().entries.contains_key(ty)
	}

	/// Number of registered types.
	pub fn len(&self) -> usize {
		self.state.read().entries.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.state.read().entries.is_empty()
	}

	/// Resolves the converter for `hint`.
	///
	/// Unions reduce to their leftmost non-none alternative, generics to their
	/// origin. An exact registration wins; otherwise the first
	/// subclass-enabled registration that is a base of the type is used.
	pub fn resolve(&self, hint: &TypeHint) -> std::result::Result<Arc<dyn Converter>, ConverterNotFound> {
		let generation = {
			let state = self.state.read();
			if let Some(converter) = state.cache.get(hint) {
				return Ok(Arc::clone(converter));
			}
			state.generation
		};

		let converter = {
			let state = self.state.read();
			Self::lookup(&state.entries, hint)?
		};
		tracing::trace!(hint = %hint, "converter cache miss");

		let mut state = self.state.write();
		if state.generation == generation {
			state.cache.insert(hint.clone(), Arc::clone(&converter));
		}
		Ok(converter)
	}

	fn lookup(
		entries: &IndexMap<ValueType, Entry>,
		hint: &TypeHint,
	) -> std::result::Result<Arc<dyn Converter>, ConverterNotFound> {
		let not_found = || ConverterNotFound::new(hint);
		let target = hint.leftmost().ok_or_else(not_found)?;
		let origin = target.origin().ok_or_else(not_found)?;

		if let Some(entry) = entries.get(origin) {
			return Ok(entry.factory.bind(target));
		}

		entries
			.iter()
			.find(|(base, entry)| entry.supports_subclass && origin.is_subtype_of(base))
			.map(|(_, entry)| entry.factory.bind(target))
			.ok_or_else(not_found)
	}

	/// Resolves the converter for `hint` and renders `value`.
	pub async fn to_str(&self, hint: &TypeHint, value: &Value) -> Result<String> {
		let converter = self.resolve(hint)?;
		converter.to_str(value).await
	}

	/// Resolves the converter for `hint` and parses `raw`.
	pub async fn from_str(&self, hint: &TypeHint, raw: &str) -> Result<Value> {
		let converter = self.resolve(hint)?;
		converter.from_str(raw).await
	}
}

impl Default for ConverterRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}

impl std::fmt::Debug for ConverterRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.read();
		f.debug_struct("ConverterRegistry")
			.field("types", &state.entries.keys().collect::<Vec<_>>())
			.field("cached", &state.cache.len())
			.finish()
	}
}
