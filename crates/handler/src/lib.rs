//! Component handlers.
//!
//! A [`HandlerDef`] binds a cookie and a field schema to an async callback.
//! [`HandlerRegistry`] maps cookies to definitions and is the
//! [`HandlerLookup`](latch_codec::HandlerLookup) the codec decodes against.

mod context;
mod def;
mod error;
mod registry;

pub use context::{Args, Context, Interaction, InteractionKind};
pub use def::{
	BoxFutureStatic, Callback, ComponentBuilder, DERIVED_COOKIE_LEN, HandlerDef, define_component, derive_cookie,
};
pub use error::{ArgError, RegistryError};
pub use registry::{Collision, DuplicatePolicy, HandlerRegistry, InsertAction};
