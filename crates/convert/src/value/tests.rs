use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_field_values_equality_ignores_order() {
	let a = FieldValues::new().with("a", 1).with("b", "x");
	let b = FieldValues::new().with("b", "x").with("a", 1);
	assert_eq!(a, b);
	assert_eq!(a.names().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn test_from_value_int_range() {
	assert_eq!(u8::from_value(&Value::Int(255)).unwrap(), 255);
	assert!(matches!(u8::from_value(&Value::Int(256)), Err(ConvertError::Malformed { .. })));
	assert!(matches!(u64::from_value(&Value::Int(-1)), Err(ConvertError::Malformed { .. })));
}

#[test]
fn test_from_value_mismatch() {
	let err = String::from_value(&Value::Int(3)).unwrap_err();
	assert!(matches!(err, ConvertError::TypeMismatch { found: "int", .. }));
	assert!(bool::from_value(&Value::Int(1)).is_err());
}

#[test]
fn test_enum_value_lookup() {
	let color = ValueType::enumeration("Color", [("Red", 1), ("Green", 2)]);
	let green = color.variant("Green").unwrap();
	assert_eq!(green.value(), 2);
	assert_eq!(green.name(), "Green");
	assert_eq!(EnumValue::new(&color, 2), Some(green));
	assert_eq!(EnumValue::new(&color, 3), None);
}

#[test]
fn test_custom_value_identity() {
	#[derive(Debug, PartialEq)]
	struct UserId(u64);

	let a = Value::custom(UserId(7));
	let b = a.clone();
	assert_eq!(a, b);
	assert_ne!(a, Value::custom(UserId(7)));
	assert_eq!(a.downcast_ref::<UserId>(), Some(&UserId(7)));
	assert_eq!(a.downcast_ref::<String>(), None);
}
