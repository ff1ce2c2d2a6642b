//! Stateless component dispatch.
//!
//! Ties the workspace together: a [`Registry`] holds converters and
//! component handlers, a [`Dispatcher`] pairs it with an
//! [`IdCodec`](latch_codec::IdCodec) to hand out component identifiers and
//! to route inbound interactions back to their callbacks.
//!
//! ```ignore
//! let registry = Arc::new(Registry::new());
//! let schema = FieldSchema::builder().field("n", ValueType::int()).build()?;
//! let counter = define_component(schema, |ctx, args| async move {
//! 	let n: i64 = args.require("n")?;
//! 	// respond with a new component carrying n + 1
//! 	Ok(())
//! })
//! .cookie("counter")
//! .build();
//! registry.register(counter)?;
//!
//! let dispatcher = Dispatcher::new(registry, Arc::new(IdCodec::default()));
//! let outcome = dispatcher.dispatch(interaction).await?;
//! ```

mod dispatcher;
mod error;
pub mod logging;
mod registry;

pub use dispatcher::{DispatchOutcome, Dispatcher, IgnoreReason};
pub use error::{DispatchError, Result};
pub use latch_codec::{CodecConfig, CodecError, IdCodec};
pub use latch_convert::{ConverterRegistry, EnumValue, FieldSchema, FieldValues, TypeHint, Value, ValueType};
pub use latch_handler::{
	Args, Context, DuplicatePolicy, HandlerDef, HandlerRegistry, Interaction, InteractionKind, define_component,
	derive_cookie,
};
pub use registry::{Decoded, Registry};
