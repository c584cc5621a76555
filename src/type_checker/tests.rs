//! Unit tests for literal coercion and expression typing.

use std::rc::Rc;

use proptest::prelude::*;

use crate::{
    ast::{
        arena::NodeArena,
        nodes::{CastKind, LiteralNode, UnaryOp},
        types::{Primitive, TypeFlags, ValueType},
    },
    diagnostics::{
        collector::Collector,
        issues::{CodeReference, Severity},
        operators::OperatorClass,
    },
    lexer::{
        lexer::tokenize,
        tokens::{TokenKind, TokenSlice},
    },
};

use super::{
    coercion::{check_literal, coerce_literal, parse_literal, Coercion},
    type_checker::{
        binary_result_type, cast_kind, select_overload, unary_result_type, ArgumentShape,
        OverloadError,
    },
};

fn code_ref() -> CodeReference {
    CodeReference {
        module: Rc::new(String::from("test")),
        file: Rc::new(String::from("main.lang")),
        slice: TokenSlice::single(0),
        line: 1,
        column: 1,
    }
}

/// Lexes `source` (a single literal) and coerces it.
fn coerce(source: &str, expected: Option<Primitive>) -> (Option<LiteralNode>, Collector) {
    let stream = tokenize(source, Rc::new(String::from("main.lang"))).unwrap();
    let mut arena = NodeArena::new();
    let mut collector = Collector::new();
    let expected = expected.map(ValueType::primitive);

    let node = check_literal(
        &mut arena,
        &mut collector,
        stream.kind(0),
        stream.literal(0),
        expected.as_ref(),
        code_ref(),
    );

    (node.map(|node| arena.get(node).clone()), collector)
}

fn only_message(collector: &Collector) -> String {
    assert_eq!(collector.len(), 1, "{:?}", collector.issues());
    collector.issues()[0].message()
}

#[test]
fn test_integer_default_int32() {
    let (node, collector) = coerce("42", None);
    let node = node.unwrap();

    assert_eq!(node.describe(), "literal<int32>(42)");
    assert_eq!(node.int32_value(), Some(42));
    assert!(collector.is_empty());
}

#[test]
fn test_integer_default_widens_to_int64() {
    let (node, _) = coerce("42424242424242424", None);

    assert_eq!(node.unwrap().describe(), "literal<int64>(42424242424242424)");
}

#[test]
fn test_integer_default_falls_back_to_uint64() {
    let (node, _) = coerce("18446744073709551615", None);

    assert_eq!(node.unwrap().uint64_value(), Some(u64::MAX));
}

#[test]
fn test_integer_too_large_for_any_type() {
    let (node, collector) = coerce("18446744073709551616", None);

    assert!(node.is_none());
    assert!(only_message(&collector).contains("overflow"));
}

#[test]
fn test_hex_literal() {
    let (node, collector) = coerce("0xFF", Some(Primitive::UInt8));

    assert_eq!(node.unwrap().uint8_value(), Some(255));
    assert!(collector.is_empty());
}

#[test]
fn test_float_defaults() {
    let (double, _) = coerce("3.14", None);
    let double = double.unwrap();
    assert_eq!(double.value_type, ValueType::float64());
    assert_eq!(double.float64_value(), Some(3.14));

    let (single, collector) = coerce("3.14f", None);
    let single = single.unwrap();
    assert_eq!(single.value_type, ValueType::primitive(Primitive::Float32));
    assert_eq!(single.float32_value(), Some(3.14f32));
    assert!(collector.is_empty());
}

#[test]
fn test_exact_narrowing_to_float32() {
    let (node, collector) = coerce("42.0", Some(Primitive::Float32));

    assert_eq!(node.unwrap().float32_value(), Some(42.0));
    assert!(collector.is_empty());
}

#[test]
fn test_lossy_narrowing_to_float32() {
    let (node, collector) = coerce("123456.123456", Some(Primitive::Float32));
    let node = node.unwrap();

    assert_eq!(collector.count(Severity::Warning), 1);
    assert!(!collector.has_critical_issues());
    assert!(only_message(&collector).contains("loss of precision"));
    assert_eq!(node.describe(), "literal<float32>(123456.125000)");
    assert_eq!(node.float32_value(), Some(123456.125));
}

#[test]
fn test_integral_float_to_integer() {
    let (node, collector) = coerce("42.0f", Some(Primitive::Int8));
    let node = node.unwrap();

    assert_eq!(node.describe(), "literal<int8>(42)");
    assert_eq!(node.int8_value(), Some(42));
    assert!(collector.is_empty());
}

#[test]
fn test_fractional_float_to_integer() {
    let (node, collector) = coerce("42.85f", Some(Primitive::Int8));

    assert!(node.is_none());
    assert_eq!(collector.count(Severity::Error), 1);
    assert!(only_message(&collector).contains("cannot be implicitly converted"));
}

#[test]
fn test_float_to_integer_overflow() {
    let (node, collector) = coerce("128.0f", Some(Primitive::Int8));

    assert!(node.is_none());
    assert!(only_message(&collector).contains("overflow"));
}

#[test]
fn test_float_to_unsigned_underflow() {
    let (node, collector) = coerce("-1.0f", Some(Primitive::UInt8));

    assert!(node.is_none());
    assert!(only_message(&collector).contains("underflow"));
}

#[test]
fn test_negative_integer_to_unsigned() {
    let (node, collector) = coerce("-42", Some(Primitive::UInt8));

    assert!(node.is_none());
    assert!(only_message(&collector).contains("is negative"));
}

#[test]
fn test_integer_overflow_unsigned() {
    let (node, collector) = coerce("256", Some(Primitive::UInt8));

    assert!(node.is_none());
    assert!(only_message(&collector).contains("overflow"));
}

#[test]
fn test_signed_underflow() {
    let (node, collector) = coerce("-129", Some(Primitive::Int8));

    assert!(node.is_none());
    assert!(only_message(&collector).contains("underflow"));
}

#[test]
fn test_integer_to_float_precision() {
    let (exact, collector) = coerce("16777216", Some(Primitive::Float32));
    assert!(exact.is_some());
    assert!(collector.is_empty());

    let (lossy, collector) = coerce("16777217", Some(Primitive::Float32));
    assert_eq!(lossy.unwrap().float32_value(), Some(16777216.0));
    assert_eq!(collector.count(Severity::Warning), 1);
}

#[test]
fn test_float32_overflow() {
    let literal = parse_literal(TokenKind::Float, "3.5e300").unwrap();

    match coerce_literal(
        "3.5e300",
        literal,
        Some(&ValueType::primitive(Primitive::Float32)),
    ) {
        Coercion::Rejected(issue) => assert!(issue.to_string().contains("overflow")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_infinite_float_literal_rejected() {
    let source = format!("1{}.0", "0".repeat(400));

    for target in [Primitive::Float64, Primitive::Float32] {
        let (node, collector) = coerce(&source, Some(target));

        assert!(node.is_none());
        assert_eq!(collector.issues()[0].kind.name(), "FloatOverflow");
    }

    let (node, collector) = coerce(&source, None);
    assert!(node.is_none());
    assert_eq!(collector.issues()[0].kind.name(), "FloatOverflow");
}

#[test]
fn test_oversized_integer_by_target() {
    let huge = format!("1{}", "0".repeat(40));

    let (node, collector) = coerce(&huge, Some(Primitive::Float64));
    assert_eq!(node.unwrap().float64_value(), Some(1e40));
    assert_eq!(collector.issues()[0].kind.name(), "LossOfPrecision");
    assert_eq!(collector.count(Severity::Warning), 1);

    let (node, collector) = coerce(&huge, Some(Primitive::Float32));
    assert!(node.is_none());
    assert_eq!(collector.issues()[0].kind.name(), "FloatOverflow");

    let (node, collector) = coerce(&huge, Some(Primitive::Bool));
    assert!(node.is_none());
    assert_eq!(collector.issues()[0].kind.name(), "InvalidTypeConversion");

    let (node, collector) = coerce(&format!("-{}", huge), Some(Primitive::Int64));
    assert!(node.is_none());
    assert_eq!(collector.issues()[0].kind.name(), "IntegerUnderflow");
}

#[test]
fn test_negative_hex_literal() {
    let (node, collector) = coerce("-0x10", Some(Primitive::Int8));

    assert_eq!(node.unwrap().int8_value(), Some(-16));
    assert!(collector.is_empty());

    let (node, collector) = coerce("-0x10", Some(Primitive::UInt8));
    assert!(node.is_none());
    assert!(only_message(&collector).contains("is negative"));
}

#[test]
fn test_bool_literals() {
    let (node, collector) = coerce("true", None);
    assert_eq!(node.unwrap().bool_value(), Some(true));
    assert!(collector.is_empty());

    let (node, collector) = coerce("false", Some(Primitive::Int32));
    assert!(node.is_none());
    assert!(only_message(&collector).contains("cannot be implicitly converted"));

    let (node, collector) = coerce("1", Some(Primitive::Bool));
    assert!(node.is_none());
    assert_eq!(collector.count(Severity::Error), 1);
}

#[test]
fn test_literal_to_void_rejected() {
    let (node, collector) = coerce("1", Some(Primitive::Void));

    assert!(node.is_none());
    assert!(collector.has_critical_issues());
}

#[test]
fn test_const_target_materializes_plain_type() {
    let literal = parse_literal(TokenKind::Integer, "7").unwrap();
    let target = ValueType::primitive(Primitive::Int16).with_flags(TypeFlags::CONST);

    let coerced = coerce_literal("7", literal, Some(&target));

    assert_eq!(
        coerced.literal().unwrap().value_type,
        ValueType::primitive(Primitive::Int16)
    );
}

proptest! {
    #[test]
    fn prop_int8_in_range(value in i8::MIN..=i8::MAX) {
        let (node, collector) = coerce(&value.to_string(), Some(Primitive::Int8));
        prop_assert!(collector.is_empty());
        prop_assert_eq!(node.unwrap().int8_value(), Some(value));
    }

    #[test]
    fn prop_uint16_in_range(value in 0u16..=u16::MAX) {
        let (node, collector) = coerce(&value.to_string(), Some(Primitive::UInt16));
        prop_assert!(collector.is_empty());
        prop_assert_eq!(node.unwrap().uint16_value(), Some(value));
    }

    #[test]
    fn prop_int64_in_range(value in any::<i64>()) {
        let (node, collector) = coerce(&value.to_string(), Some(Primitive::Int64));
        prop_assert!(collector.is_empty());
        let node = node.unwrap();
        prop_assert_eq!(node.int64_value(), Some(value));
        prop_assert_eq!(node.describe(), format!("literal<int64>({})", value));
    }

    #[test]
    fn prop_int32_out_of_range(value in (i32::MAX as i64 + 1)..i64::MAX) {
        let (node, collector) = coerce(&value.to_string(), Some(Primitive::Int32));
        prop_assert!(node.is_none());
        prop_assert!(collector.has_critical_issues());
    }
}

#[test]
fn test_binary_result_type() {
    let int32 = ValueType::int32();
    let float64 = ValueType::float64();

    assert_eq!(binary_result_type(OperatorClass::Arithmetic, &int32, &int32), int32);
    assert_eq!(
        binary_result_type(OperatorClass::Arithmetic, &int32, &float64),
        ValueType::void()
    );
    assert_eq!(
        binary_result_type(OperatorClass::Comparison, &int32, &int32),
        ValueType::bool()
    );
}

#[test]
fn test_unary_result_type() {
    assert_eq!(
        unary_result_type(UnaryOp::Negate, &ValueType::float64()),
        Some(ValueType::float64())
    );
    assert_eq!(unary_result_type(UnaryOp::Not, &ValueType::int32()), None);
    assert_eq!(
        unary_result_type(UnaryOp::Not, &ValueType::bool()),
        Some(ValueType::bool())
    );
}

#[test]
fn test_cast_kinds() {
    let int8 = ValueType::primitive(Primitive::Int8);
    let uint8 = ValueType::primitive(Primitive::UInt8);
    let int64 = ValueType::primitive(Primitive::Int64);
    let float32 = ValueType::primitive(Primitive::Float32);
    let float64 = ValueType::float64();

    assert_eq!(cast_kind(&int8, &int64), Some(CastKind::SignExtend));
    assert_eq!(cast_kind(&uint8, &int64), Some(CastKind::ZeroExtend));
    assert_eq!(cast_kind(&int64, &int8), Some(CastKind::Truncate));
    assert_eq!(cast_kind(&int8, &int8), Some(CastKind::Identity));
    assert_eq!(cast_kind(&int64, &float64), Some(CastKind::IntToFloat));
    assert_eq!(cast_kind(&float32, &int8), Some(CastKind::FloatToInt));
    assert_eq!(cast_kind(&float32, &float64), Some(CastKind::FloatExtend));
    assert_eq!(cast_kind(&float64, &float32), Some(CastKind::FloatTruncate));
    assert_eq!(cast_kind(&ValueType::bool(), &int8), Some(CastKind::BoolToInt));
    assert_eq!(cast_kind(&int8, &ValueType::bool()), None);
    assert_eq!(cast_kind(&int8, &ValueType::void()), None);
}

fn literal(text: &str) -> ArgumentShape {
    let stream = tokenize(text, Rc::new(String::from("main.lang"))).unwrap();
    ArgumentShape::Literal {
        kind: stream.kind(0),
        text: stream.literal(0).to_string(),
    }
}

#[test]
fn test_overload_prefers_exact_match() {
    let candidates = vec![
        vec![ValueType::primitive(Primitive::Int8)],
        vec![ValueType::int32()],
    ];

    assert_eq!(select_overload(&candidates, &[literal("5")]), Ok(1));
}

#[test]
fn test_overload_single_convertible() {
    let candidates = vec![
        vec![ValueType::primitive(Primitive::UInt8)],
        vec![ValueType::bool()],
    ];

    assert_eq!(select_overload(&candidates, &[literal("5")]), Ok(0));
}

#[test]
fn test_overload_ambiguous() {
    let candidates = vec![
        vec![ValueType::primitive(Primitive::Int8)],
        vec![ValueType::primitive(Primitive::Int16)],
    ];

    assert_eq!(
        select_overload(&candidates, &[literal("5")]),
        Err(OverloadError::Ambiguous)
    );
}

#[test]
fn test_overload_no_match() {
    let candidates = vec![vec![ValueType::primitive(Primitive::UInt8)], vec![]];

    assert_eq!(
        select_overload(&candidates, &[literal("-5")]),
        Err(OverloadError::NoMatch)
    );
    assert_eq!(
        select_overload(&candidates, &[ArgumentShape::Typed(ValueType::float64())]),
        Err(OverloadError::NoMatch)
    );
}

#[test]
fn test_overload_typed_and_null_arguments() {
    let pointer = ValueType::primitive(Primitive::Int8).with_flags(TypeFlags::POINTER);
    let candidates = vec![vec![pointer.clone()], vec![ValueType::float64()]];

    assert_eq!(select_overload(&candidates, &[ArgumentShape::Null]), Ok(0));
    assert_eq!(
        select_overload(&candidates, &[ArgumentShape::Typed(ValueType::float64())]),
        Ok(1)
    );
}
