//! Inbound interaction routing.

use std::sync::Arc;

use anyhow::Context as _;
use latch_codec::{CodecError, IdCodec};
use latch_convert::FieldValues;
use latch_handler::{Context, HandlerDef, Interaction};

use crate::error::{DispatchError, Result};
use crate::registry::Registry;

/// Why an interaction was not routed to a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
	/// No component is registered under the decoded cookie.
	UnknownCookie { cookie: String },
	/// The identifier was written by a different codec version.
	VersionMismatch { expected: u8, found: i64 },
}

/// Result of a successful [`Dispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
	/// The callback of the component with this cookie ran to completion.
	Handled { cookie: String },
	/// The identifier was not produced by this application.
	Ignored(IgnoreReason),
}

impl DispatchOutcome {
	pub fn is_handled(&self) -> bool {
		matches!(self, Self::Handled { .. })
	}
}

/// Decodes interaction identifiers and invokes the matching callback.
///
/// Cheap to clone; every clone shares the registry and the codec's
/// increment counter.
#[derive(Debug, Clone)]
pub struct Dispatcher {
	registry: Arc<Registry>,
	codec: Arc<IdCodec>,
}

impl Dispatcher {
	pub fn new(registry: Arc<Registry>, codec: Arc<IdCodec>) -> Self {
		Self { registry, codec }
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	pub fn codec(&self) -> &IdCodec {
		&self.codec
	}

	/// Identifier to attach to a component built from `handler`.
	///
	/// Identifiers are immutable once sent; call again whenever `values`
	/// change.
	pub async fn custom_id(&self, handler: &HandlerDef, values: &FieldValues) -> Result<String> {
		Ok(self.registry.encode(&self.codec, handler, values).await?)
	}

	/// Routes `interaction` to its component's callback.
	///
	/// Identifiers with an unknown cookie or another codec version are
	/// logged and ignored. Every other decode failure and every callback
	/// failure is returned.
	pub async fn dispatch(&self, interaction: Arc<dyn Interaction>) -> Result<DispatchOutcome> {
		let identifier = interaction.custom_id();
		let decoded = match self.registry.decode(&self.codec, identifier).await {
			Ok(decoded) => decoded,
			Err(CodecError::UnknownCookie { cookie }) => {
				return Ok(ignored(identifier, IgnoreReason::UnknownCookie { cookie }));
			}
			Err(CodecError::VersionMismatch { expected, found }) => {
				return Ok(ignored(identifier, IgnoreReason::VersionMismatch { expected, found }));
			}
			Err(err) => return Err(err.into()),
		};

		let cookie = decoded.handler.cookie().to_owned();
		tracing::trace!(cookie = %cookie.escape_debug(), "dispatching interaction");

		let ctx = Context::new(Arc::clone(&interaction), cookie.as_str());
		decoded
			.handler
			.invoke(ctx, decoded.args)
			.await
			.with_context(|| format!("callback of component `{}` failed", cookie.escape_debug()))
			.map_err(DispatchError::Callback)?;

		Ok(DispatchOutcome::Handled { cookie })
	}
}

fn ignored(identifier: &str, reason: IgnoreReason) -> DispatchOutcome {
	tracing::debug!(identifier = %identifier.escape_debug(), ?reason, "ignoring foreign identifier");
	DispatchOutcome::Ignored(reason)
}

#[cfg(test)]
mod tests;
