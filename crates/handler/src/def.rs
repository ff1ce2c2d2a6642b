//! Handler definitions and the component builder.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use latch_codec::Component;
use latch_convert::{FieldSchema, FieldValues, bytes_to_latin1};
use sha2::{Digest, Sha256};

use crate::context::{Args, Context};

/// A pinned, boxed future that is required to be Send and 'static.
pub type BoxFutureStatic<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Type-erased component callback.
pub type Callback = Arc<dyn Fn(Context, Args) -> BoxFutureStatic<anyhow::Result<()>> + Send + Sync>;

/// Number of digest bytes in a derived cookie.
pub const DERIVED_COOKIE_LEN: usize = 8;

/// Derives a stable cookie from a qualified callback name.
///
/// The first [`DERIVED_COOKIE_LEN`] bytes of the SHA-256 digest of `name`,
/// one Latin-1 character per byte. Every process computes the same cookie
/// for the same name.
pub fn derive_cookie(name: &str) -> String {
	let digest = Sha256::digest(name.as_bytes());
	bytes_to_latin1(&digest[..DERIVED_COOKIE_LEN])
}

/// A registered component: cookie, field layout and callback.
#[derive(Clone)]
pub struct HandlerDef {
	cookie: String,
	schema: FieldSchema,
	callback: Callback,
}

impl HandlerDef {
	pub fn cookie(&self) -> &str {
		&self.cookie
	}

	pub fn schema(&self) -> &FieldSchema {
		&self.schema
	}

	/// Wraps decoded values for this handler's callback.
	pub fn args(&self, decoded: FieldValues) -> Args {
		Args::new(&self.schema, decoded)
	}

	/// Runs the callback.
	pub async fn invoke(&self, ctx: Context, args: Args) -> anyhow::Result<()> {
		(self.callback)(ctx, args).await
	}
}

impl Component for HandlerDef {
	fn schema(&self) -> &FieldSchema {
		&self.schema
	}
}

impl std::fmt::Debug for HandlerDef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HandlerDef")
			.field("cookie", &self.cookie)
			.field("fields", &self.schema.names().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

enum CookieSource {
	Explicit(String),
	Derived(String),
}

/// Builder returned by [`define_component`].
pub struct ComponentBuilder {
	schema: FieldSchema,
	callback: Callback,
	cookie: CookieSource,
}

/// Starts a component definition.
///
/// Without [`cookie`](ComponentBuilder::cookie) or
/// [`qualified_name`](ComponentBuilder::qualified_name), the cookie is
/// derived from the callback's type name. That name is stable for `fn` items
/// but shared by closures declared in the same function, so closures should
/// be given a name.
pub fn define_component<F, Fut>(schema: FieldSchema, callback: F) -> ComponentBuilder
where
	F: Fn(Context, Args) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
	let name = std::any::type_name::<F>().to_owned();
	ComponentBuilder {
		schema,
		callback: Arc::new(move |ctx: Context, args: Args| -> BoxFutureStatic<anyhow::Result<()>> {
			Box::pin(callback(ctx, args))
		}),
		cookie: CookieSource::Derived(name),
	}
}

impl ComponentBuilder {
	/// Uses `cookie` verbatim.
	pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
		self.cookie = CookieSource::Explicit(cookie.into());
		self
	}

	/// Derives the cookie from `name` with [`derive_cookie`].
	pub fn qualified_name(mut self, name: impl Into<String>) -> Self {
		self.cookie = CookieSource::Derived(name.into());
		self
	}

	pub fn build(self) -> HandlerDef {
		let cookie = match self.cookie {
			CookieSource::Explicit(cookie) => cookie,
			CookieSource::Derived(name) => derive_cookie(&name),
		};
		HandlerDef {
			cookie,
			schema: self.schema,
			callback: self.callback,
		}
	}
}
