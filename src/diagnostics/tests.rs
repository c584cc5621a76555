use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    ast::types::{Primitive, ValueType},
    lexer::tokens::TokenSlice,
};

use super::{
    collector::{Collector, TypeRegistry},
    issues::{CodeReference, IssueKind, Severity},
    operators::{Arity, Associativity, Operator, OperatorClass, OperatorRegistry, Precedence},
    render::{get_line, render_issue},
};

fn code_ref(line: u32, column: u32) -> CodeReference {
    CodeReference {
        module: Rc::new(String::from("test")),
        file: Rc::new(String::from("main.lang")),
        slice: TokenSlice::single(0),
        line,
        column,
    }
}

#[test]
fn test_predefined_operators_resolve() {
    let registry = OperatorRegistry::new();
    let expected = [
        ("=", 1, Associativity::Right),
        ("||", 2, Associativity::Left),
        ("&&", 3, Associativity::Left),
        ("==", 4, Associativity::Left),
        ("!=", 4, Associativity::Left),
        ("<", 5, Associativity::Left),
        (">", 5, Associativity::Left),
        (">=", 5, Associativity::Left),
        ("<=", 5, Associativity::Left),
        ("+", 6, Associativity::Left),
        ("-", 6, Associativity::Left),
        ("*", 7, Associativity::Left),
        ("/", 7, Associativity::Left),
        ("%", 7, Associativity::Left),
        ("^", 8, Associativity::Right),
        ("++", 9, Associativity::Right),
        ("--", 9, Associativity::Right),
    ];

    for (symbol, tier, associativity) in expected {
        let operator = registry.resolve(symbol).unwrap();
        assert_eq!(operator.symbol, symbol);
        assert_eq!(operator.precedence.tier(), tier, "tier of {}", symbol);
        assert_eq!(operator.associativity, associativity, "associativity of {}", symbol);
    }
    assert_eq!(registry.len(), expected.len());
}

#[test]
fn test_increment_operators_are_unary() {
    let registry = OperatorRegistry::new();

    assert_eq!(registry.resolve("++").unwrap().arity, Arity::Unary);
    assert!(registry.resolve("+").unwrap().is_binary());
}

#[test]
fn test_non_operator_resolves_to_none() {
    let registry = OperatorRegistry::new();

    assert!(registry.resolve("foo").is_none());
    assert!(registry.resolve(";").is_none());
    assert!(registry.resolve("").is_none());
}

#[test]
fn test_register_custom_operator() {
    let mut registry = OperatorRegistry::new();
    let spaceship = Operator::new(
        "<=>",
        Precedence::Relational,
        Associativity::Left,
        Arity::Binary,
        OperatorClass::Comparison,
    );

    assert!(registry.register(spaceship.clone()));
    assert_eq!(registry.resolve("<=>"), Some(&spaceship));
}

#[test]
fn test_register_never_replaces_predefined() {
    let mut registry = OperatorRegistry::new();
    let hijack = Operator::new(
        "+",
        Precedence::Power,
        Associativity::Right,
        Arity::Binary,
        OperatorClass::Arithmetic,
    );

    assert!(!registry.register(hijack));
    assert_eq!(registry.resolve("+").unwrap().precedence, Precedence::Additive);
}

#[test]
fn test_collector_critical_gate() {
    let mut collector = Collector::new();
    assert!(!collector.has_critical_issues());

    collector.report(
        IssueKind::LossOfPrecision {
            value: String::from("0.1"),
            from: String::from("float64"),
            to: String::from("float32"),
            result: String::from("0.100000"),
        },
        code_ref(1, 1),
    );
    assert!(!collector.has_critical_issues());
    assert_eq!(collector.count(Severity::Warning), 1);

    collector.report(
        IssueKind::UnknownVariable {
            name: String::from("x"),
        },
        code_ref(2, 5),
    );
    assert!(collector.has_critical_issues());
    assert_eq!(collector.count(Severity::Error), 1);
    assert_eq!(collector.len(), 2);
}

#[test]
fn test_collector_keeps_duplicates_in_order() {
    let mut collector = Collector::new();
    let kind = IssueKind::UnknownType {
        name: String::from("Foo"),
    };

    collector.report(kind.clone(), code_ref(1, 1));
    collector.report(kind, code_ref(1, 1));

    assert_eq!(collector.len(), 2);
    assert_eq!(collector.issues()[0], collector.issues()[1]);
}

#[test]
fn test_issue_messages() {
    let overflow = IssueKind::IntegerOverflow {
        value: String::from("256"),
        target: String::from("uint8"),
        max: String::from("255"),
    };
    let negative = IssueKind::IntegerUnderflow {
        value: String::from("-42"),
        target: String::from("uint8"),
        min: String::from("0"),
    };

    assert!(overflow.to_string().contains("overflow"));
    assert!(negative.to_string().contains("underflow"));
    assert!(negative.to_string().contains("is negative"));
    assert_eq!(overflow.severity(), Severity::Error);
}

#[test]
fn test_type_registry() {
    let mut registry = TypeRegistry::default();
    let mut properties = IndexMap::new();
    properties.insert(String::from("x"), ValueType::primitive(Primitive::Float32));
    properties.insert(String::from("y"), ValueType::primitive(Primitive::Float32));

    assert!(registry.register(ValueType::structure("Point", properties)));
    assert!(!registry.register(ValueType::structure("Point", IndexMap::new())));
    assert!(!registry.register(ValueType::class("int32", IndexMap::new())));

    let point = registry.resolve("Point").unwrap();
    assert_eq!(point.byte_size(), 8);
    assert_eq!(registry.resolve("int").unwrap(), ValueType::int32());
    assert!(registry.resolve("Missing").is_none());
}

#[test]
fn test_get_line() {
    let source = "first\r\nsecond\nthird";

    assert_eq!(get_line(source, 1), Some("first"));
    assert_eq!(get_line(source, 3), Some("third"));
    assert_eq!(get_line(source, 0), None);
    assert_eq!(get_line(source, 4), None);
}

#[test]
fn test_render_issue() {
    let mut collector = Collector::new();
    collector.report(
        IssueKind::UnknownVariable {
            name: String::from("y"),
        },
        code_ref(2, 13),
    );

    let rendered = render_issue(&collector.issues()[0], Some("let x = 1;\n    let z = y;\n"));
    let lines = rendered.lines().collect::<Vec<_>>();

    assert_eq!(lines[0], "error: unknown variable `y`");
    assert_eq!(lines[1], "-> main.lang:2:13");
    assert_eq!(lines[3], "2 | let z = y;");
    assert_eq!(lines[4], "  | --------^");
}

#[test]
fn test_render_issue_without_source() {
    let mut collector = Collector::new();
    collector.report(IssueKind::ReturnOutsideFunction, code_ref(1, 1));

    let rendered = render_issue(&collector.issues()[0], None);

    assert_eq!(rendered.lines().count(), 2);
}
