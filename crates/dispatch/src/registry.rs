use std::sync::Arc;

use latch_codec::{CodecError, IdCodec};
use latch_convert::{ConverterRegistry, FieldValues};
use latch_handler::{Args, DuplicatePolicy, HandlerDef, HandlerRegistry, InsertAction, RegistryError};

/// Converters and handlers of one application.
///
/// Constructed once at startup and shared by reference. Tests build their own
/// instead of touching process-wide state.
#[derive(Debug, Default)]
pub struct Registry {
	converters: ConverterRegistry,
	handlers: HandlerRegistry,
}

/// A decoded identifier that has not been dispatched.
#[derive(Debug, Clone)]
pub struct Decoded {
	pub handler: Arc<HandlerDef>,
	pub args: Args,
}

impl Registry {
	/// Built-in converters, no handlers, last-registration-wins cookies.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			converters: ConverterRegistry::with_builtins(),
			handlers: HandlerRegistry::with_policy(policy),
		}
	}

	pub fn converters(&self) -> &ConverterRegistry {
		&self.converters
	}

	pub fn handlers(&self) -> &HandlerRegistry {
		&self.handlers
	}

	/// Registers `def`, checking first that every field has a converter.
	pub fn register(&self, def: HandlerDef) -> Result<InsertAction, RegistryError> {
		self.handlers.register_validated(def, &self.converters)
	}

	/// Encodes `values` for `handler`.
	pub async fn encode(&self, codec: &IdCodec, handler: &HandlerDef, values: &FieldValues) -> Result<String, CodecError> {
		codec
			.serialize(&self.converters, handler.cookie(), handler.schema(), values)
			.await
	}

	/// Decodes `identifier` without invoking its callback.
	///
	/// Used to rebuild a component from one already attached to a message.
	pub async fn decode(&self, codec: &IdCodec, identifier: &str) -> Result<Decoded, CodecError> {
		let (handler, values) = codec.deserialize(&self.converters, identifier, &self.handlers).await?;
		let args = handler.args(values);
		Ok(Decoded { handler, args })
	}
}
