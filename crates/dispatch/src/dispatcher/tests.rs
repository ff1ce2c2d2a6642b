use std::sync::Mutex;

use latch_codec::CodecConfig;
use latch_convert::{FieldSchema, ValueType};
use latch_handler::{InteractionKind, define_component};
use pretty_assertions::assert_eq;

use super::*;

struct Click(String);

impl Interaction for Click {
	fn custom_id(&self) -> &str {
		&self.0
	}

	fn kind(&self) -> InteractionKind {
		InteractionKind::Button
	}
}

fn click(id: impl Into<String>) -> Arc<dyn Interaction> {
	Arc::new(Click(id.into()))
}

fn counter(log: Arc<Mutex<Vec<i64>>>) -> HandlerDef {
	let schema = FieldSchema::builder().field("n", ValueType::int()).build().unwrap();
	define_component(schema, move |_, args| {
		let log = Arc::clone(&log);
		async move {
			let n: i64 = args.require("n")?;
			if n < 0 {
				anyhow::bail!("negative count");
			}
			log.lock().unwrap().push(n);
			Ok(())
		}
	})
	.cookie("counter_button.mod")
	.build()
}

fn dispatcher(log: &Arc<Mutex<Vec<i64>>>) -> Dispatcher {
	let registry = Registry::new();
	registry.register(counter(Arc::clone(log))).unwrap();
	Dispatcher::new(Arc::new(registry), Arc::new(IdCodec::default()))
}

#[tokio::test]
async fn test_dispatch_invokes_callback() {
	let log = Arc::default();
	let dispatcher = dispatcher(&log);
	let handler = dispatcher.registry().handlers().lookup("counter_button.mod").unwrap();

	let id = dispatcher
		.custom_id(&handler, &FieldValues::new().with("n", 5))
		.await
		.unwrap();
	let outcome = dispatcher.dispatch(click(id)).await.unwrap();

	assert_eq!(
		outcome,
		DispatchOutcome::Handled {
			cookie: "counter_button.mod".into()
		}
	);
	assert_eq!(*log.lock().unwrap(), [5]);
}

#[tokio::test]
async fn test_foreign_identifiers_are_ignored() {
	let log = Arc::default();
	let dispatcher = dispatcher(&log);

	let outcome = dispatcher.dispatch(click("\u{0}someone_else\u{1}x")).await.unwrap();
	assert_eq!(
		outcome,
		DispatchOutcome::Ignored(IgnoreReason::UnknownCookie {
			cookie: "someone_else".into()
		})
	);

	let outcome = dispatcher.dispatch(click("plain-button")).await.unwrap();
	assert!(matches!(
		outcome,
		DispatchOutcome::Ignored(IgnoreReason::VersionMismatch { expected: 0, .. })
	));
	assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_foreign_identifiers_with_bad_shape_are_ignored() {
	let log = Arc::default();
	let current = dispatcher(&log);

	let unversioned = Dispatcher::new(
		Arc::clone(&current.registry),
		Arc::new(IdCodec::from_config(CodecConfig::default().with_version(None)).unwrap()),
	);
	let outcome = unversioned.dispatch(click(r"C:\path\")).await.unwrap();
	assert_eq!(
		outcome,
		DispatchOutcome::Ignored(IgnoreReason::UnknownCookie {
			cookie: "C:path".into()
		})
	);

	let incremented = Dispatcher::new(
		Arc::clone(&current.registry),
		Arc::new(IdCodec::from_config(CodecConfig::default().with_increment_len(4)).unwrap()),
	);
	let outcome = incremented.dispatch(click("\u{0}ab")).await.unwrap();
	assert_eq!(
		outcome,
		DispatchOutcome::Ignored(IgnoreReason::UnknownCookie { cookie: String::new() })
	);
	assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_old_version_is_ignored() {
	let log = Arc::default();
	let current = dispatcher(&log);
	let old = Dispatcher::new(
		Arc::clone(&current.registry),
		Arc::new(IdCodec::from_config(CodecConfig::default().with_version(Some(1))).unwrap()),
	);
	let handler = current.registry().handlers().lookup("counter_button.mod").unwrap();

	let stale = old.custom_id(&handler, &FieldValues::new().with("n", 1)).await.unwrap();
	let outcome = current.dispatch(click(stale)).await.unwrap();
	assert_eq!(
		outcome,
		DispatchOutcome::Ignored(IgnoreReason::VersionMismatch { expected: 0, found: 1 })
	);
}

#[tokio::test]
async fn test_malformed_identifier_propagates() {
	let log = Arc::default();
	let dispatcher = dispatcher(&log);

	let err = dispatcher
		.dispatch(click("\u{0}counter_button.mod\u{1}\\"))
		.await
		.unwrap_err();
	assert!(matches!(err, DispatchError::Codec(CodecError::Malformed(_))));

	let err = dispatcher
		.dispatch(click("\u{0}counter_button.mod\u{1}\u{100}"))
		.await
		.unwrap_err();
	assert!(matches!(err, DispatchError::Codec(CodecError::Convert(_))));
}

#[tokio::test]
async fn test_callback_error_propagates_with_cookie() {
	let log = Arc::default();
	let dispatcher = dispatcher(&log);
	let handler = dispatcher.registry().handlers().lookup("counter_button.mod").unwrap();

	let id = dispatcher
		.custom_id(&handler, &FieldValues::new().with("n", -3))
		.await
		.unwrap();
	let err = dispatcher.dispatch(click(id)).await.unwrap_err();

	let err = match err {
		DispatchError::Callback(err) => err,
		other => panic!("expected a callback error, got {other:?}"),
	};
	assert_eq!(err.to_string(), "callback of component `counter_button.mod` failed");
	assert_eq!(err.root_cause().to_string(), "negative count");
}

#[tokio::test]
async fn test_absent_required_field_fails_callback() {
	let log = Arc::default();
	let dispatcher = dispatcher(&log);

	let err = dispatcher
		.dispatch(click("\u{0}counter_button.mod\u{1}\u{0}"))
		.await
		.unwrap_err();
	assert!(matches!(err, DispatchError::Callback(_)));
}
