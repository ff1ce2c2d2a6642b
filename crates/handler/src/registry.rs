//! Cookie-keyed handler registry.
//!
//! Reads load an immutable snapshot; writes clone the snapshot, apply the
//! change and publish it with compare-and-swap, retrying on contention.

use std::sync::Arc;

use arc_swap::ArcSwap;
use latch_codec::HandlerLookup;
use latch_convert::ConverterRegistry;
use rustc_hash::FxHashMap as HashMap;

use crate::def::HandlerDef;
use crate::error::RegistryError;

/// Policy for a cookie that is already registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
	/// Keep the first definition registered under a cookie.
	FirstWins,
	/// Overwrite with the last definition registered.
	#[default]
	LastWins,
	/// Fail with [`RegistryError::DuplicateCookie`].
	Reject,
}

/// Result of a successful registration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertAction {
	/// Cookie was new; definition inserted.
	InsertedNew,
	/// Cookie existed; kept the existing definition.
	KeptExisting,
	/// Cookie existed; replaced with the new definition.
	ReplacedExisting,
}

/// Records a cookie collision resolved by policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	/// The contested cookie.
	pub cookie: String,
	/// What action was taken.
	pub action: InsertAction,
}

#[derive(Clone, Default)]
struct Snapshot {
	by_cookie: HashMap<String, Arc<HandlerDef>>,
	collisions: Vec<Collision>,
}

/// Maps cookies to handler definitions.
pub struct HandlerRegistry {
	snap: ArcSwap<Snapshot>,
	policy: DuplicatePolicy,
}

impl HandlerRegistry {
	/// Creates an empty registry with [`DuplicatePolicy::LastWins`].
	pub fn new() -> Self {
		Self::with_policy(DuplicatePolicy::default())
	}

	pub fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			snap: ArcSwap::from_pointee(Snapshot::default()),
			policy,
		}
	}

	pub fn policy(&self) -> DuplicatePolicy {
		self.policy
	}

	/// Registers `def` under its cookie.
	pub fn register(&self, def: HandlerDef) -> Result<InsertAction, RegistryError> {
		self.register_arc(Arc::new(def))
	}

	/// Registers a shared definition under its cookie.
	pub fn register_arc(&self, def: Arc<HandlerDef>) -> Result<InsertAction, RegistryError> {
		loop {
			let cur = self.snap.load_full();
			let mut next = (*cur).clone();

			let action = match next.by_cookie.get(def.cookie()) {
				None => InsertAction::InsertedNew,
				Some(existing) if Arc::ptr_eq(existing, &def) => return Ok(InsertAction::KeptExisting),
				Some(_) => match self.policy {
					DuplicatePolicy::Reject => return Err(RegistryError::DuplicateCookie(def.cookie().to_owned())),
					DuplicatePolicy::FirstWins => InsertAction::KeptExisting,
					DuplicatePolicy::LastWins => InsertAction::ReplacedExisting,
				},
			};

			if action != InsertAction::KeptExisting {
				next.by_cookie.insert(def.cookie().to_owned(), Arc::clone(&def));
			}
			if action != InsertAction::InsertedNew {
				next.collisions.push(Collision {
					cookie: def.cookie().to_owned(),
					action,
				});
			}

			let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				if action != InsertAction::InsertedNew {
					tracing::warn!(
						cookie = %def.cookie().escape_debug(),
						?action,
						policy = ?self.policy,
						"component cookie registered twice"
					);
				}
				return Ok(action);
			}
		}
	}

	/// Registers `def` after checking that every field has a converter.
	pub fn register_validated(
		&self,
		def: HandlerDef,
		converters: &ConverterRegistry,
	) -> Result<InsertAction, RegistryError> {
		for field in def.schema() {
			converters.resolve(field.hint()).map_err(|source| RegistryError::Converter {
				cookie: def.cookie().to_owned(),
				field: field.name().to_owned(),
				source,
			})?;
		}
		self.register(def)
	}

	pub fn lookup(&self, cookie: &str) -> Option<Arc<HandlerDef>> {
		self.snap.load().by_cookie.get(cookie).cloned()
	}

	pub fn contains(&self, cookie: &str) -> bool {
		self.snap.load().by_cookie.contains_key(cookie)
	}

	/// Collisions seen since construction or the last [`clear`](Self::clear).
	pub fn collisions(&self) -> Vec<Collision> {
		self.snap.load().collisions.clone()
	}

	pub fn cookies(&self) -> Vec<String> {
		self.snap.load().by_cookie.keys().cloned().collect()
	}

	/// Removes every definition and collision record.
	pub fn clear(&self) {
		self.snap.store(Arc::new(Snapshot::default()));
	}

	pub fn len(&self) -> usize {
		self.snap.load().by_cookie.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.load().by_cookie.is_empty()
	}
}

impl Default for HandlerRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for HandlerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("HandlerRegistry")
			.field("policy", &self.policy)
			.field("handlers", &snap.by_cookie.len())
			.field("collisions", &snap.collisions.len())
			.finish()
	}
}

impl HandlerLookup for HandlerRegistry {
	type Handler = Arc<HandlerDef>;

	fn lookup(&self, cookie: &str) -> Option<Arc<HandlerDef>> {
		HandlerRegistry::lookup(self, cookie)
	}
}
