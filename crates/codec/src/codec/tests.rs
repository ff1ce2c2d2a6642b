use std::collections::HashMap;
use std::sync::Arc;

use latch_convert::{ConvertError, TypeHint, Value, ValueType};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

type Handlers = HashMap<String, Arc<FieldSchema>>;

fn handlers(entries: &[(&str, FieldSchema)]) -> Handlers {
	entries
		.iter()
		.map(|(cookie, schema)| ((*cookie).to_owned(), Arc::new(schema.clone())))
		.collect()
}

fn int_schema() -> FieldSchema {
	FieldSchema::builder().field("n", ValueType::int()).build().unwrap()
}

fn codec(config: CodecConfig) -> IdCodec {
	IdCodec::from_config(config).unwrap()
}

#[tokio::test]
async fn test_counter_button_round_trip() {
	let converters = ConverterRegistry::with_builtins();
	let codec = IdCodec::default();
	let schema = int_schema();
	let map = handlers(&[("counter_button.mod", schema.clone())]);

	let five = codec
		.serialize(&converters, "counter_button.mod", &schema, &FieldValues::new().with("n", 5))
		.await
		.unwrap();
	assert_eq!(five, "\u{0}counter_button.mod\u{1}\u{5}");

	let (handler, values) = codec.deserialize(&converters, &five, &map).await.unwrap();
	assert!(Arc::ptr_eq(&handler, &map["counter_button.mod"]));
	assert_eq!(values, FieldValues::new().with("n", 5));

	let six = codec
		.serialize(&converters, "counter_button.mod", &schema, &FieldValues::new().with("n", 6))
		.await
		.unwrap();
	assert_ne!(five, six);
}

#[tokio::test]
async fn test_absent_and_empty_are_distinct() {
	let converters = ConverterRegistry::with_builtins();
	let codec = IdCodec::default();
	let schema = FieldSchema::builder()
		.field("a", TypeHint::optional(ValueType::str()))
		.field("b", ValueType::str())
		.build()
		.unwrap();
	let map = handlers(&[("c", schema.clone())]);

	let values = FieldValues::new().with("b", "");
	let id = codec.serialize(&converters, "c", &schema, &values).await.unwrap();
	assert_eq!(id, "\u{0}c\u{1}\u{0}\u{1}");

	let (_, decoded) = codec.deserialize(&converters, &id, &map).await.unwrap();
	assert_eq!(decoded, values);
	assert!(!decoded.contains("a"));
}

#[tokio::test]
async fn test_control_characters_round_trip() {
	let converters = ConverterRegistry::with_builtins();
	let codec = IdCodec::default();
	let schema = FieldSchema::builder()
		.field("x", ValueType::str())
		.field("y", ValueType::str())
		.field("z", ValueType::str())
		.build()
		.unwrap();
	let cookie = "we\u{1}ird\\";
	let map = handlers(&[(cookie, schema.clone())]);

	let values = FieldValues::new().with("x", "\u{0}").with("y", "\\").with("z", "a\u{1}\\\u{0}b");
	let id = codec.serialize(&converters, cookie, &schema, &values).await.unwrap();
	let (_, decoded) = codec.deserialize(&converters, &id, &map).await.unwrap();
	assert_eq!(decoded, values);
	assert_eq!(codec.peek_cookie(&id).unwrap(), cookie);
}

#[tokio::test]
async fn test_int_field_with_control_byte_values() {
	let converters = ConverterRegistry::with_builtins();
	let codec = IdCodec::default();
	let schema = int_schema();
	let map = handlers(&[("c", schema.clone())]);

	for n in [0, 1, 92, 256, 0x5c01, -1] {
		let values = FieldValues::new().with("n", n);
		let id = codec.serialize(&converters, "c", &schema, &values).await.unwrap();
		let (_, decoded) = codec.deserialize(&converters, &id, &map).await.unwrap();
		assert_eq!(decoded, values, "n = {n}");
	}
}

#[tokio::test]
async fn test_length_limit() {
	let converters = ConverterRegistry::with_builtins();
	let codec = IdCodec::default();
	let schema = FieldSchema::builder().field("s", ValueType::str()).build().unwrap();

	// version + cookie + separator = 3 characters.
	let fits = FieldValues::new().with("s", "é".repeat(97));
	let id = codec.serialize(&converters, "c", &schema, &fits).await.unwrap();
	assert_eq!(id.chars().count(), 100);

	let over = FieldValues::new().with("s", "é".repeat(98));
	let err = codec.serialize(&converters, "c", &schema, &over).await.unwrap_err();
	assert!(matches!(
		err,
		CodecError::IdentifierTooLong { ref cookie, length: 101, limit: 100 } if cookie == "c"
	));
	assert!(err.to_string().contains("reduce the number of fields"));
}

#[tokio::test]
async fn test_unknown_cookie() {
	let converters = ConverterRegistry::with_builtins();
	let codec = IdCodec::default();
	let map = handlers(&[("known", int_schema())]);

	let err = codec.deserialize(&converters, "\u{0}stranger\u{1}x", &map).await.unwrap_err();
	assert!(matches!(err, CodecError::UnknownCookie { ref cookie } if cookie == "stranger"));
	assert!(err.is_foreign());
}

#[tokio::test]
async fn test_version_mismatch_stops_before_lookup() {
	let converters = ConverterRegistry::with_builtins();
	let old = codec(CodecConfig::default().with_version(Some(1)));
	let current = IdCodec::default();
	let schema = int_schema();

	let id = old
		.serialize(&converters, "gone", &schema, &FieldValues::new().with("n", 1))
		.await
		.unwrap();
	let err = current.deserialize(&converters, &id, &Handlers::new()).await.unwrap_err();
	assert!(matches!(err, CodecError::VersionMismatch { expected: 0, found: 1 }));
	assert!(err.is_foreign());
	assert!(matches!(current.peek_cookie(&id), Err(CodecError::VersionMismatch { .. })));
}

#[tokio::test]
async fn test_unversioned_codec_has_no_prefix() {
	let converters = ConverterRegistry::with_builtins();
	let codec = codec(CodecConfig::default().with_version(None));
	let schema = int_schema();

	let id = codec
		.serialize(&converters, "c", &schema, &FieldValues::new())
		.await
		.unwrap();
	assert_eq!(id, "c\u{1}\u{0}");
	assert_eq!(codec.peek_cookie(&id).unwrap(), "c");
}

#[tokio::test]
async fn test_increment_disambiguates_and_wraps() {
	let converters = ConverterRegistry::with_builtins();
	let codec = codec(CodecConfig::default().with_increment_len(1));
	let schema = int_schema();
	let map = handlers(&[("c", schema.clone())]);
	let values = FieldValues::new().with("n", 5);

	let mut ids = Vec::new();
	for _ in 0..257 {
		ids.push(codec.serialize(&converters, "c", &schema, &values).await.unwrap());
	}
	assert_ne!(ids[0], ids[1]);
	assert_eq!(ids[0], ids[256]);

	for id in &ids[..3] {
		let (_, decoded) = codec.deserialize(&converters, id, &map).await.unwrap();
		assert_eq!(decoded, values);
	}
}

#[tokio::test]
async fn test_missing_and_surplus_segments() {
	let converters = ConverterRegistry::with_builtins();
	let codec = IdCodec::default();
	let schema = FieldSchema::builder()
		.field("a", ValueType::str())
		.field("b", ValueType::str())
		.build()
		.unwrap();
	let map = handlers(&[("c", schema)]);

	let (_, short) = codec.deserialize(&converters, "\u{0}c\u{1}x", &map).await.unwrap();
	assert_eq!(short, FieldValues::new().with("a", "x"));

	let (_, long) = codec
		.deserialize(&converters, "\u{0}c\u{1}x\u{1}y\u{1}z", &map)
		.await
		.unwrap();
	assert_eq!(long, FieldValues::new().with("a", "x").with("b", "y"));
}

#[tokio::test]
async fn test_malformed_identifiers() {
	let converters = ConverterRegistry::with_builtins();
	let map = handlers(&[("c", int_schema()), ("", int_schema())]);

	let plain = IdCodec::default();
	assert!(matches!(
		plain.deserialize(&converters, "", &map).await,
		Err(CodecError::Malformed(_))
	));
	assert!(matches!(
		plain.deserialize(&converters, "\u{0}c\u{1}\\", &map).await,
		Err(CodecError::Malformed(_))
	));
	assert!(matches!(
		plain.deserialize(&converters, "\u{0}c\\", &map).await,
		Err(CodecError::Malformed(_))
	));

	let incremented = codec(CodecConfig::default().with_increment_len(4));
	assert!(matches!(
		incremented.deserialize(&converters, "\u{0}ab", &map).await,
		Err(CodecError::Malformed(_))
	));
	assert!(matches!(incremented.peek_cookie("\u{0}ab"), Err(CodecError::Malformed(_))));
}

#[tokio::test]
async fn test_foreign_identifiers_fail_on_cookie_before_shape() {
	let converters = ConverterRegistry::with_builtins();
	let map = handlers(&[("c", int_schema())]);

	let unversioned = codec(CodecConfig::default().with_version(None));
	let err = unversioned
		.deserialize(&converters, r"C:\path\", &map)
		.await
		.unwrap_err();
	assert!(matches!(err, CodecError::UnknownCookie { ref cookie } if cookie == "C:path"));
	assert_eq!(unversioned.peek_cookie(r"C:\path\").unwrap(), "C:path");

	let plain = IdCodec::default();
	let err = plain.deserialize(&converters, "", &map).await.unwrap_err();
	assert!(matches!(err, CodecError::UnknownCookie { ref cookie } if cookie.is_empty()));

	let incremented = codec(CodecConfig::default().with_increment_len(4));
	let err = incremented
		.deserialize(&converters, "\u{0}ab", &map)
		.await
		.unwrap_err();
	assert!(err.is_foreign());
}

#[tokio::test]
async fn test_converter_errors_propagate() {
	let converters = ConverterRegistry::with_builtins();
	let codec = IdCodec::default();
	let odd = ValueType::new("odd");
	let schema = FieldSchema::builder().field("o", odd).build().unwrap();

	let err = codec
		.serialize(&converters, "c", &schema, &FieldValues::new().with("o", 1))
		.await
		.unwrap_err();
	assert!(matches!(err, CodecError::Convert(ConvertError::NotFound(_))));
	assert!(!err.is_foreign());

	let map = handlers(&[("c", int_schema())]);
	let err = codec
		.deserialize(&converters, "\u{0}c\u{1}\u{100}", &map)
		.await
		.unwrap_err();
	assert!(matches!(err, CodecError::Convert(ConvertError::Malformed { .. })));
}

#[test]
fn test_rejects_invalid_config() {
	let config = CodecConfig::default().with_control_chars('|', '|', '\\');
	assert!(matches!(
		IdCodec::from_config(config),
		Err(ConfigError::DuplicateControlChar('|'))
	));
}

fn field_text() -> impl Strategy<Value = String> {
	proptest::collection::vec(
		prop_oneof![Just('\u{0}'), Just('\u{1}'), Just('\\'), any::<char>()],
		0..8,
	)
	.prop_map(|chars| chars.into_iter().collect())
}

proptest! {
	#[test]
	fn prop_serialize_deserialize_round_trip(
		cookie in field_text(),
		text in proptest::option::of(field_text()),
		n in proptest::option::of(any::<i64>()),
		increment_len in 0u8..=2,
	) {
		let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
		let converters = ConverterRegistry::with_builtins();
		let codec = codec(CodecConfig::default().with_increment_len(increment_len));
		let schema = FieldSchema::builder()
			.field("text", TypeHint::optional(ValueType::str()))
			.field("n", ValueType::int())
			.build()
			.unwrap();
		let map = handlers(&[(cookie.as_str(), schema.clone())]);

		let mut values = FieldValues::new();
		if let Some(text) = text {
			values.insert("text", text);
		}
		if let Some(n) = n {
			values.insert("n", Value::Int(n));
		}

		let decoded = runtime.block_on(async {
			let id = codec.serialize(&converters, &cookie, &schema, &values).await.unwrap();
			codec.deserialize(&converters, &id, &map).await.unwrap().1
		});
		prop_assert_eq!(decoded, values);
	}
}
