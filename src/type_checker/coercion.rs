//! Literal coercion.
//!
//! Every literal is checked against the type it is expected to have before
//! a node is created for it. A rejected literal never reaches the arena.

use crate::{
    ast::{
        arena::{NodeArena, NodeRef},
        nodes::{LiteralNode, LiteralValue},
        types::{IntegerSize, Primitive, TypeFlags, ValueType},
    },
    diagnostics::{
        collector::Collector,
        issues::{CodeReference, IssueKind},
    },
    lexer::tokens::TokenKind,
};

/// Value of a literal token before it has a type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedLiteral {
    Integer(i128),
    /// `single` is set by an `f` suffix.
    Float { value: f64, single: bool },
    Bool(bool),
}

/// A literal value at its final type.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedLiteral {
    pub value: LiteralValue,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    Exact(CoercedLiteral),
    /// Accepted, with a warning.
    Lossy(CoercedLiteral, IssueKind),
    Rejected(IssueKind),
}

impl Coercion {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Coercion::Rejected(_))
    }

    pub fn literal(&self) -> Option<&CoercedLiteral> {
        match self {
            Coercion::Exact(literal) | Coercion::Lossy(literal, _) => Some(literal),
            Coercion::Rejected(_) => None,
        }
    }
}

/// Parses the text of a literal token, optionally prefixed with `-`.
/// `None` for tokens that are not numeric or boolean literals, or for
/// integer text too long to hold at all.
pub fn parse_literal(kind: TokenKind, text: &str) -> Option<ParsedLiteral> {
    if let Some(magnitude) = text.strip_prefix('-') {
        return match parse_literal(kind, magnitude)? {
            ParsedLiteral::Integer(value) => Some(ParsedLiteral::Integer(-value)),
            ParsedLiteral::Float { value, single } => Some(ParsedLiteral::Float { value: -value, single }),
            ParsedLiteral::Bool(_) => None,
        };
    }

    match kind {
        TokenKind::Integer => text.parse::<i128>().ok().map(ParsedLiteral::Integer),
        TokenKind::Hex => {
            let digits = text.get(2..)?;
            i128::from_str_radix(digits, 16).ok().map(ParsedLiteral::Integer)
        }
        TokenKind::Float => {
            let (digits, single) = match text.strip_suffix('f') {
                Some(digits) => (digits, true),
                None => (text, false),
            };
            digits
                .parse::<f64>()
                .ok()
                .map(|value| ParsedLiteral::Float { value, single })
        }
        TokenKind::True => Some(ParsedLiteral::Bool(true)),
        TokenKind::False => Some(ParsedLiteral::Bool(false)),
        _ => None,
    }
}

/// Type a literal takes when nothing is expected of it.
pub fn default_literal_type(literal: ParsedLiteral) -> ValueType {
    match literal {
        ParsedLiteral::Integer(value) => {
            let primitive = [Primitive::Int32, Primitive::Int64]
                .into_iter()
                .find(|primitive| {
                    primitive
                        .integer_size()
                        .is_some_and(|size| size.contains(value))
                })
                .unwrap_or(Primitive::UInt64);
            ValueType::primitive(primitive)
        }
        ParsedLiteral::Float { single: true, .. } => ValueType::primitive(Primitive::Float32),
        ParsedLiteral::Float { single: false, .. } => ValueType::float64(),
        ParsedLiteral::Bool(_) => ValueType::bool(),
    }
}

fn rejected_conversion(text: &str, literal: ParsedLiteral, target: &ValueType) -> Coercion {
    Coercion::Rejected(IssueKind::InvalidTypeConversion {
        value: text.to_string(),
        from: default_literal_type(literal).to_string(),
        to: target.to_string(),
    })
}

fn coerce_integer(text: &str, value: i128, size: IntegerSize, target: ValueType) -> Coercion {
    if value < 0 && !size.signed {
        return Coercion::Rejected(IssueKind::IntegerUnderflow {
            value: text.to_string(),
            target: target.to_string(),
            min: size.min().to_string(),
        });
    }
    if value > size.max() {
        return Coercion::Rejected(IssueKind::IntegerOverflow {
            value: text.to_string(),
            target: target.to_string(),
            max: size.max().to_string(),
        });
    }
    if value < size.min() {
        return Coercion::Rejected(IssueKind::IntegerUnderflow {
            value: text.to_string(),
            target: target.to_string(),
            min: size.min().to_string(),
        });
    }

    Coercion::Exact(CoercedLiteral {
        value: LiteralValue::Integer(value),
        value_type: target,
    })
}

/// Largest magnitude an `f64` may have and still convert to `i128` without
/// saturating.
const I128_FLOAT_LIMIT: f64 = 1.7e38;

fn coerce_to_integer(text: &str, literal: ParsedLiteral, size: IntegerSize, target: ValueType) -> Coercion {
    match literal {
        ParsedLiteral::Integer(value) => coerce_integer(text, value, size, target),
        ParsedLiteral::Float { value, .. } => {
            if !value.is_finite() || value.fract() != 0.0 {
                return rejected_conversion(text, literal, &target);
            }
            if value.abs() >= I128_FLOAT_LIMIT {
                let saturated = if value < 0.0 { i128::MIN } else { i128::MAX };
                return coerce_integer(text, saturated, size, target);
            }
            coerce_integer(text, value as i128, size, target)
        }
        ParsedLiteral::Bool(_) => rejected_conversion(text, literal, &target),
    }
}

fn loss_of_precision(text: &str, literal: ParsedLiteral, target: &ValueType, result: f64) -> IssueKind {
    IssueKind::LossOfPrecision {
        value: text.to_string(),
        from: default_literal_type(literal).to_string(),
        to: target.to_string(),
        result: format!("{:.6}", result),
    }
}

fn coerce_to_float(text: &str, literal: ParsedLiteral, primitive: Primitive, target: ValueType) -> Coercion {
    let single = primitive == Primitive::Float32;

    let (value, rounded, exact) = match literal {
        ParsedLiteral::Integer(value) => {
            let rounded = if single {
                value as f32 as f64
            } else {
                value as f64
            };
            (value as f64, rounded, rounded as i128 == value)
        }
        ParsedLiteral::Float { value, single: from_single } => {
            let value = if from_single { value as f32 as f64 } else { value };
            let rounded = if single { value as f32 as f64 } else { value };
            (value, rounded, from_single || rounded == value)
        }
        ParsedLiteral::Bool(_) => return rejected_conversion(text, literal, &target),
    };

    if !rounded.is_finite() {
        return Coercion::Rejected(IssueKind::FloatOverflow {
            value: text.to_string(),
            target: target.to_string(),
        });
    }

    let coerced = CoercedLiteral {
        value: LiteralValue::Float(rounded),
        value_type: target.clone(),
    };

    if exact {
        Coercion::Exact(coerced)
    } else {
        let issue = loss_of_precision(text, literal, &target, rounded);
        Coercion::Lossy(coerced, issue)
    }
}

/// Checks a literal against `expected`, or against its default type when
/// nothing is expected.
///
/// Integer targets reject negative values for unsigned types, values
/// outside `[min, max]` and fractional floats. Float targets accept any
/// number but warn when the value has to be rounded. `bool` only accepts
/// `true`/`false`. Nothing else accepts a literal.
pub fn coerce_literal(text: &str, literal: ParsedLiteral, expected: Option<&ValueType>) -> Coercion {
    let target = match expected {
        Some(expected) => expected.clone().without_flags(TypeFlags::CONST),
        None => default_literal_type(literal),
    };

    if let Some(size) = target.integer_size() {
        return coerce_to_integer(text, literal, size, target);
    }

    if target.is_floating_type() {
        let primitive = target.primitive.unwrap_or(Primitive::Float64);
        return coerce_to_float(text, literal, primitive, target);
    }

    match (literal, target.is_boolean_type()) {
        (ParsedLiteral::Bool(value), true) => Coercion::Exact(CoercedLiteral {
            value: LiteralValue::Bool(value),
            value_type: target,
        }),
        _ => rejected_conversion(text, literal, &target),
    }
}

/// Integer text too long for `i128`. Integer targets reject it by sign,
/// float targets round it, anything else cannot take it.
fn coerce_oversized_integer(kind: TokenKind, text: &str, expected: Option<&ValueType>) -> Coercion {
    let target = match expected {
        Some(expected) => expected.clone().without_flags(TypeFlags::CONST),
        None => ValueType::primitive(Primitive::UInt64),
    };
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(magnitude) => (true, magnitude),
        None => (false, text),
    };

    if let Some(size) = target.integer_size() {
        return Coercion::Rejected(if negative {
            IssueKind::IntegerUnderflow {
                value: text.to_string(),
                target: target.to_string(),
                min: size.min().to_string(),
            }
        } else {
            IssueKind::IntegerOverflow {
                value: text.to_string(),
                target: target.to_string(),
                max: size.max().to_string(),
            }
        });
    }

    let magnitude = match kind {
        TokenKind::Integer => magnitude.parse::<f64>().ok(),
        TokenKind::Hex => magnitude.get(2..).map(|digits| {
            digits
                .chars()
                .filter_map(|digit| digit.to_digit(16))
                .fold(0.0, |value, digit| value * 16.0 + f64::from(digit))
        }),
        _ => None,
    };
    let from = String::from("integer literal");

    match (magnitude, target.primitive) {
        (Some(magnitude), Some(primitive)) if target.is_floating_type() => {
            let value = if negative { -magnitude } else { magnitude };
            let literal = ParsedLiteral::Float { value, single: false };
            match coerce_to_float(text, literal, primitive, target) {
                Coercion::Exact(coerced) | Coercion::Lossy(coerced, _) => {
                    let result = match coerced.value {
                        LiteralValue::Float(result) => result,
                        _ => value,
                    };
                    let issue = IssueKind::LossOfPrecision {
                        value: text.to_string(),
                        from,
                        to: coerced.value_type.to_string(),
                        result: format!("{:.6}", result),
                    };
                    Coercion::Lossy(coerced, issue)
                }
                rejected => rejected,
            }
        }
        _ => Coercion::Rejected(IssueKind::InvalidTypeConversion {
            value: text.to_string(),
            from,
            to: target.to_string(),
        }),
    }
}

/// Coerces the literal token `kind`/`text` without recording anything.
pub fn coerce_token(kind: TokenKind, text: &str, expected: Option<&ValueType>) -> Coercion {
    match parse_literal(kind, text) {
        Some(literal) => coerce_literal(text, literal, expected),
        None => coerce_oversized_integer(kind, text, expected),
    }
}

/// Dry run of [`check_literal`]: no issue recorded, no node created.
pub fn literal_accepts(kind: TokenKind, text: &str, expected: &ValueType) -> bool {
    coerce_token(kind, text, Some(expected)).is_accepted()
}

/// Coerces the literal token `kind`/`text` and materializes it.
///
/// Returns `None`, after recording the reason in `collector`, when the
/// literal is rejected. A lossy conversion records its warning and still
/// yields a node.
pub fn check_literal(
    arena: &mut NodeArena,
    collector: &mut Collector,
    kind: TokenKind,
    text: &str,
    expected: Option<&ValueType>,
    code_ref: CodeReference,
) -> Option<NodeRef<LiteralNode>> {
    let coerced = match coerce_token(kind, text, expected) {
        Coercion::Exact(coerced) => coerced,
        Coercion::Lossy(coerced, issue) => {
            collector.report(issue, code_ref.clone());
            coerced
        }
        Coercion::Rejected(issue) => {
            collector.report(issue, code_ref);
            return None;
        }
    };

    Some(arena.alloc(LiteralNode {
        code_ref,
        value: coerced.value,
        value_type: coerced.value_type,
    }))
}
