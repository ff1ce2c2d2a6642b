//! What a component callback receives.

use std::any::Any;
use std::sync::Arc;

use latch_convert::{FieldSchema, FieldValues, FromValue, Value};

use crate::error::ArgError;

/// Kind of component that produced an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
	Button,
	SelectMenu,
	ModalSubmit,
}

/// An inbound component interaction, as delivered by the platform client.
pub trait Interaction: Any + Send + Sync {
	/// The identifier attached to the component.
	fn custom_id(&self) -> &str;

	/// Selected options of a select menu. Empty for other components.
	fn values(&self) -> &[String] {
		&[]
	}

	fn kind(&self) -> InteractionKind;
}

/// Per-interaction context handed to a callback.
#[derive(Clone)]
pub struct Context {
	interaction: Arc<dyn Interaction>,
	cookie: String,
}

impl Context {
	pub fn new(interaction: Arc<dyn Interaction>, cookie: impl Into<String>) -> Self {
		Self {
			interaction,
			cookie: cookie.into(),
		}
	}

	/// The raw interaction.
	pub fn interaction(&self) -> &dyn Interaction {
		&*self.interaction
	}

	/// Borrows the raw interaction as the platform client's concrete type.
	pub fn downcast_ref<T: Interaction>(&self) -> Option<&T> {
		let any: &dyn Any = &*self.interaction;
		any.downcast_ref()
	}

	pub fn custom_id(&self) -> &str {
		self.interaction.custom_id()
	}

	/// Cookie of the component that was interacted with.
	pub fn cookie(&self) -> &str {
		&self.cookie
	}

	pub fn values(&self) -> &[String] {
		self.interaction.values()
	}

	pub fn kind(&self) -> InteractionKind {
		self.interaction.kind()
	}
}

impl std::fmt::Debug for Context {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Context")
			.field("cookie", &self.cookie)
			.field("custom_id", &self.custom_id())
			.field("kind", &self.kind())
			.finish()
	}
}

/// Decoded field values with schema defaults applied on read.
#[derive(Clone, Debug, PartialEq)]
pub struct Args {
	decoded: FieldValues,
	defaults: FieldValues,
}

impl Args {
	pub fn new(schema: &FieldSchema, decoded: FieldValues) -> Self {
		let defaults = schema
			.iter()
			.filter_map(|field| Some((field.name(), field.default()?.clone())))
			.collect();
		Self { decoded, defaults }
	}

	/// The decoded value of `name`, or its default.
	pub fn value(&self, name: &str) -> Option<&Value> {
		self.decoded.get(name).or_else(|| self.defaults.get(name))
	}

	/// Typed [`value`](Self::value). `Ok(None)` if absent without default.
	pub fn get<T: FromValue>(&self, name: &str) -> Result<Option<T>, ArgError> {
		self.value(name).map(T::from_value).transpose().map_err(ArgError::from)
	}

	/// Typed [`value`](Self::value) that must be present.
	pub fn require<T: FromValue>(&self, name: &str) -> Result<T, ArgError> {
		self.get(name)?.ok_or_else(|| ArgError::Missing(name.to_owned()))
	}

	/// Returns true if `name` was carried by the identifier.
	pub fn is_present(&self, name: &str) -> bool {
		self.decoded.contains(name)
	}

	/// Values carried by the identifier, defaults excluded.
	pub fn decoded(&self) -> &FieldValues {
		&self.decoded
	}

	pub fn into_decoded(self) -> FieldValues {
		self.decoded
	}
}
