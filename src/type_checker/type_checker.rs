use crate::{
    ast::{
        nodes::{CastKind, UnaryOp},
        types::{TypeFlags, ValueType},
    },
    diagnostics::operators::OperatorClass,
    lexer::tokens::TokenKind,
};

use super::coercion::{default_literal_type, literal_accepts, parse_literal};

/// Result type of a binary expression whose operands are already unified.
///
/// Comparisons and logical operators yield `bool`. Arithmetic yields the
/// operands' common type, or `void` when they differ.
pub fn binary_result_type(class: OperatorClass, lhs: &ValueType, rhs: &ValueType) -> ValueType {
    match class {
        OperatorClass::Comparison | OperatorClass::Logical => ValueType::bool(),
        OperatorClass::Assignment => lhs.clone(),
        OperatorClass::Arithmetic | OperatorClass::Increment => {
            if lhs.same_primitive(rhs) && lhs.is_pointer() == rhs.is_pointer() {
                lhs.clone().without_flags(TypeFlags::CONST)
            } else {
                ValueType::void()
            }
        }
    }
}

/// Whether both operands of `class` have a type the operator applies to.
pub fn operands_allowed(class: OperatorClass, operand: &ValueType) -> bool {
    match class {
        OperatorClass::Logical => operand.is_boolean_type(),
        OperatorClass::Arithmetic | OperatorClass::Increment => operand.is_numeric(),
        OperatorClass::Comparison => {
            operand.is_numeric() || operand.is_boolean_type() || operand.is_pointer()
        }
        OperatorClass::Assignment => true,
    }
}

/// `None` when the operator does not apply to the operand.
pub fn unary_result_type(operator: UnaryOp, operand: &ValueType) -> Option<ValueType> {
    match operator {
        UnaryOp::Negate if operand.is_numeric() => {
            Some(operand.clone().without_flags(TypeFlags::CONST))
        }
        UnaryOp::Not if operand.is_boolean_type() => Some(ValueType::bool()),
        _ => None,
    }
}

/// How `from` is converted to `to` by an explicit cast, or `None` if the
/// cast is not allowed.
pub fn cast_kind(from: &ValueType, to: &ValueType) -> Option<CastKind> {
    if from.same_primitive(to) && from.is_pointer() == to.is_pointer() {
        return Some(CastKind::Identity);
    }

    if from.is_boolean_type() && to.is_integer_type() {
        return Some(CastKind::BoolToInt);
    }

    match (from.is_integer_type(), to.is_integer_type()) {
        (true, true) => {
            let kind = if from.will_fit_into(to) || from.byte_size() < to.byte_size() {
                if from.is_signed_integer() {
                    CastKind::SignExtend
                } else {
                    CastKind::ZeroExtend
                }
            } else if from.is_same_size(to) {
                CastKind::Identity
            } else {
                CastKind::Truncate
            };
            return Some(kind);
        }
        (true, false) if to.is_floating_type() => return Some(CastKind::IntToFloat),
        (false, true) if from.is_floating_type() => return Some(CastKind::FloatToInt),
        _ => {}
    }

    if from.is_floating_type() && to.is_floating_type() {
        return Some(if from.will_fit_into(to) {
            CastKind::FloatExtend
        } else {
            CastKind::FloatTruncate
        });
    }

    None
}

/// What overload resolution knows about one call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentShape {
    /// An untyped literal; it takes the parameter's type if it fits.
    Literal { kind: TokenKind, text: String },
    Null,
    Typed(ValueType),
}

impl ArgumentShape {
    /// Type used for display and exact matching.
    pub fn nominal_type(&self) -> ValueType {
        match self {
            ArgumentShape::Literal { kind, text } => parse_literal(*kind, text)
                .map_or_else(|| ValueType::unknown(text), default_literal_type),
            ArgumentShape::Null => ValueType::void().with_flags(TypeFlags::POINTER),
            ArgumentShape::Typed(value_type) => value_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Exact,
    Convertible,
    Rejected,
}

fn strip_const(value_type: &ValueType) -> ValueType {
    value_type.clone().without_flags(TypeFlags::CONST)
}

/// How well a parameter of type `param` accepts `arg`.
pub fn accepts(param: &ValueType, arg: &ArgumentShape) -> Acceptance {
    match arg {
        ArgumentShape::Literal { kind, text } => {
            if !literal_accepts(*kind, text, param) {
                Acceptance::Rejected
            } else if strip_const(&arg.nominal_type()) == strip_const(param) {
                Acceptance::Exact
            } else {
                Acceptance::Convertible
            }
        }
        ArgumentShape::Null if param.is_pointer() => Acceptance::Convertible,
        ArgumentShape::Null => Acceptance::Rejected,
        ArgumentShape::Typed(value_type) => {
            if strip_const(value_type) == strip_const(param) {
                Acceptance::Exact
            } else {
                Acceptance::Rejected
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverloadError {
    NoMatch,
    Ambiguous,
}

/// Picks one overload from `candidates` (parameter type lists).
///
/// A candidate is viable when it has the right arity and accepts every
/// argument. A single candidate whose parameters all match exactly wins;
/// otherwise a single viable candidate wins.
pub fn select_overload(candidates: &[Vec<ValueType>], args: &[ArgumentShape]) -> Result<usize, OverloadError> {
    let mut exact = vec![];
    let mut viable = vec![];

    for (index, params) in candidates.iter().enumerate() {
        if params.len() != args.len() {
            continue;
        }

        let verdicts = params
            .iter()
            .zip(args)
            .map(|(param, arg)| accepts(param, arg))
            .collect::<Vec<_>>();

        if verdicts.contains(&Acceptance::Rejected) {
            continue;
        }
        if verdicts.iter().all(|verdict| *verdict == Acceptance::Exact) {
            exact.push(index);
        }
        viable.push(index);
    }

    match (exact.as_slice(), viable.as_slice()) {
        ([single], _) => Ok(*single),
        ([], [single]) => Ok(*single),
        (_, []) => Err(OverloadError::NoMatch),
        _ => Err(OverloadError::Ambiguous),
    }
}

pub fn describe_arguments(args: &[ArgumentShape]) -> String {
    args.iter()
        .map(|arg| arg.nominal_type().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
