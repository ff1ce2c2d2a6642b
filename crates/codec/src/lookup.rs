use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use latch_convert::FieldSchema;

/// A decodable component: anything that knows its field schema.
pub trait Component {
	fn schema(&self) -> &FieldSchema;
}

impl Component for FieldSchema {
	fn schema(&self) -> &FieldSchema {
		self
	}
}

impl<T: Component + ?Sized> Component for Arc<T> {
	fn schema(&self) -> &FieldSchema {
		(**self).schema()
	}
}

/// Cookie to component lookup consulted while decoding.
pub trait HandlerLookup {
	type Handler: Component;

	fn lookup(&self, cookie: &str) -> Option<Self::Handler>;
}

impl<T, S> HandlerLookup for HashMap<String, T, S>
where
	T: Component + Clone,
	S: BuildHasher,
{
	type Handler = T;

	fn lookup(&self, cookie: &str) -> Option<T> {
		self.get(cookie).cloned()
	}
}
