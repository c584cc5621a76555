use std::rc::Rc;

use indexmap::IndexMap;

use crate::{diagnostics::issues::CodeReference, lexer::tokens::TokenSlice};

use super::{
    arena::{AnyNodeRef, NodeArena},
    nodes::{LiteralNode, LiteralValue, NodeKind, ScopeNode, TypeNode},
    types::{Primitive, TypeFlags, ValueType},
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

fn literal(value: LiteralValue, primitive: Primitive) -> LiteralNode {
    LiteralNode {
        code_ref: code_ref(),
        value,
        value_type: ValueType::primitive(primitive),
    }
}

#[test]
fn test_arena_alloc_and_get() {
    let mut arena = NodeArena::new();
    let scope = arena.alloc(ScopeNode::new(code_ref(), None));
    let child = arena.alloc(ScopeNode::new(code_ref(), Some(scope)));

    arena.get_mut(scope).children.push(child.erase());

    assert_eq!(arena.len(), 2);
    assert_eq!(arena.get(child).parent, Some(scope));
    assert_eq!(arena.get(scope).children, vec![child.erase()]);
}

#[test]
fn test_any_ref_downcast() {
    let mut arena = NodeArena::new();
    let type_node = arena.alloc(TypeNode {
        code_ref: code_ref(),
        value_type: ValueType::bool(),
    });
    let any: AnyNodeRef = type_node.into();

    assert_eq!(any.kind, NodeKind::Type);
    assert!(any.is::<TypeNode>());
    assert_eq!(any.downcast::<TypeNode>(), type_node);
    assert!(any.try_downcast::<ScopeNode>().is_none());
    assert_eq!(arena.node(any).kind(), NodeKind::Type);
}

#[test]
#[should_panic]
fn test_downcast_to_wrong_kind_panics() {
    let mut arena = NodeArena::new();
    let scope = arena.alloc(ScopeNode::new(code_ref(), None));

    scope.erase().downcast::<LiteralNode>();
}

#[test]
fn test_literal_accessors_and_describe() {
    let byte = literal(LiteralValue::Integer(42), Primitive::Int8);
    assert_eq!(byte.int8_value(), Some(42));
    assert_eq!(byte.int32_value(), None);
    assert_eq!(byte.describe(), "literal<int8>(42)");

    let big = literal(LiteralValue::Integer(u64::MAX as i128), Primitive::UInt64);
    assert_eq!(big.uint64_value(), Some(u64::MAX));

    let single = literal(LiteralValue::Float(123456.125), Primitive::Float32);
    assert_eq!(single.float32_value(), Some(123456.125f32));
    assert_eq!(single.float64_value(), None);
    assert_eq!(single.describe(), "literal<float32>(123456.125000)");

    let flag = literal(LiteralValue::Bool(true), Primitive::Bool);
    assert_eq!(flag.bool_value(), Some(true));
    assert_eq!(flag.describe(), "literal<bool>(true)");
}

#[test]
fn test_primitive_names_and_aliases() {
    assert_eq!(Primitive::from_name("int"), Some(Primitive::Int32));
    assert_eq!(Primitive::from_name("double"), Some(Primitive::Float64));
    assert_eq!(Primitive::from_name("uint16"), Some(Primitive::UInt16));
    assert_eq!(Primitive::from_name("string"), None);
}

#[test]
fn test_integer_size_limits() {
    let int8 = Primitive::Int8.integer_size().unwrap();
    let uint64 = Primitive::UInt64.integer_size().unwrap();

    assert_eq!((int8.min(), int8.max()), (-128, 127));
    assert_eq!(uint64.min(), 0);
    assert_eq!(uint64.max(), u64::MAX as i128);
    assert!(Primitive::Float32.integer_size().is_none());
}

#[test]
fn test_value_type_predicates() {
    let int16 = ValueType::primitive(Primitive::Int16);
    let uint16 = ValueType::primitive(Primitive::UInt16);
    let float32 = ValueType::primitive(Primitive::Float32);

    assert!(int16.is_integer_type() && int16.is_signed_integer());
    assert!(uint16.is_unsigned_integer());
    assert!(float32.is_floating_type());
    assert!(ValueType::bool().is_boolean_type());
    assert!(int16.is_same_size(&uint16));
    assert!(!int16.is_same_size(&float32));
    assert!(!int16.with_flags(TypeFlags::POINTER).is_integer_type());
}

#[test]
fn test_equality_and_same_primitive() {
    let plain = ValueType::int32();
    let constant = ValueType::int32().with_flags(TypeFlags::CONST);

    assert_ne!(plain, constant);
    assert!(plain.same_primitive(&constant));
    assert_eq!(constant.without_flags(TypeFlags::CONST), plain);
}

#[test]
fn test_will_fit_into() {
    let int8 = ValueType::primitive(Primitive::Int8);
    let int32 = ValueType::int32();
    let uint8 = ValueType::primitive(Primitive::UInt8);
    let uint32 = ValueType::primitive(Primitive::UInt32);
    let float32 = ValueType::primitive(Primitive::Float32);
    let float64 = ValueType::float64();

    assert!(int8.will_fit_into(&int32));
    assert!(!int32.will_fit_into(&int8));
    assert!(uint8.will_fit_into(&int32));
    assert!(!uint32.will_fit_into(&int32));
    assert!(!int8.will_fit_into(&uint32));
    assert!(uint8.will_fit_into(&float32));
    assert!(!int32.will_fit_into(&float32));
    assert!(int32.will_fit_into(&float64));
    assert!(float32.will_fit_into(&float64));
    assert!(!float64.will_fit_into(&float32));
}

#[test]
fn test_mangled_type_ids() {
    let ids = [
        (Primitive::Int8, "c"),
        (Primitive::UInt8, "h"),
        (Primitive::Int16, "s"),
        (Primitive::UInt16, "t"),
        (Primitive::Int32, "i"),
        (Primitive::UInt32, "j"),
        (Primitive::Int64, "l"),
        (Primitive::UInt64, "m"),
        (Primitive::Float32, "f"),
        (Primitive::Float64, "d"),
        (Primitive::Bool, "b"),
        (Primitive::Void, "v"),
    ];
    for (primitive, id) in ids {
        assert_eq!(ValueType::primitive(primitive).get_mangled_name(), id);
    }

    let pointer = ValueType::primitive(Primitive::Int8).with_flags(TypeFlags::POINTER | TypeFlags::CONST);
    assert_eq!(pointer.get_mangled_name(), "KPc");
    assert_eq!(ValueType::structure("Point", IndexMap::new()).get_mangled_name(), "5Point");
}

#[test]
fn test_value_type_display() {
    let pointer = ValueType::primitive(Primitive::UInt8).with_flags(TypeFlags::POINTER);

    assert_eq!(pointer.to_string(), "uint8*");
    assert_eq!(ValueType::int32().with_flags(TypeFlags::CONST).to_string(), "const int32");
    assert_eq!(ValueType::unknown("Foo").to_string(), "Foo");
}
