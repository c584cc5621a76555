//! Expression parsing.
//!
//! Binary operators are climbed by precedence tier as found in the
//! collector's operator registry. Literal operands are not materialized
//! where they are parsed: they stay [`Operand::Literal`] until the type they
//! must have is known, so `let x: uint8 = 200;` checks `200` against
//! `uint8` and not against a default `int32`.

use crate::{
    ast::{
        arena::{AnyNodeRef, NodeRef},
        nodes::{
            BinaryExprNode, FunctionCallNode, FunctionDeclNode, NullNode, TypeCastNode, TypeNode,
            UnaryExprNode, UnaryOp, VarRefNode,
        },
        types::{Primitive, TypeFlags, ValueType},
    },
    diagnostics::{
        issues::IssueKind,
        operators::{Associativity, Operator, OperatorClass, Precedence},
    },
    lexer::tokens::{TokenKind, TokenSlice},
    type_checker::{
        coercion::{check_literal, default_literal_type, parse_literal},
        type_checker::{
            binary_result_type, cast_kind, describe_arguments, operands_allowed, select_overload,
            unary_result_type, ArgumentShape, OverloadError,
        },
    },
};

use super::{
    context::{Context, ParseResult},
    cursor::Cursor,
    types::parse_type,
};

/// A parsed expression that may not have a node yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Literal token, by index, possibly preceded by a unary `-`.
    Literal { index: u32, negative: bool },
    /// `null` token, by index.
    Null(u32),
    Node(AnyNodeRef),
    /// Already reported; nothing more is said about it.
    Invalid,
}

/// Parses an expression.
///
/// # Arguments
///
/// * `ctx` - The parsing context.
/// * `cursor` - Positioned at the first token of the expression.
/// * `expected` - Type the value will be materialized as, if known. It
///   decides the type of arithmetic between literals.
///
/// # Returns
///
/// The operand. Syntax errors are returned as `Err`; semantic errors are
/// reported and yield [`Operand::Invalid`].
pub fn parse_expression(
    ctx: &mut Context,
    cursor: &mut Cursor,
    expected: Option<&ValueType>,
) -> ParseResult<Operand> {
    parse_binary(ctx, cursor, Precedence::LogicalOr.tier(), expected)
}

fn binary_operator(ctx: &Context, cursor: &Cursor) -> Option<Operator> {
    if !cursor.current().is_operator() {
        return None;
    }

    ctx.collector
        .operators
        .resolve(cursor.literal(0))
        .filter(|operator| operator.is_binary() && operator.class != OperatorClass::Assignment)
        .cloned()
}

fn parse_binary(
    ctx: &mut Context,
    cursor: &mut Cursor,
    min_tier: u8,
    expected: Option<&ValueType>,
) -> ParseResult<Operand> {
    let start = cursor.pos();
    let mut lhs = parse_unary(ctx, cursor, expected)?;

    while let Some(operator) = binary_operator(ctx, cursor) {
        let tier = operator.precedence.tier();
        if tier < min_tier {
            break;
        }
        cursor.advance();

        let next_tier = match operator.associativity {
            Associativity::Left => tier + 1,
            Associativity::Right => tier,
        };
        let operand_expected = match operator.class {
            OperatorClass::Arithmetic => expected,
            _ => None,
        };

        let rhs = parse_binary(ctx, cursor, next_tier, operand_expected)?;
        lhs = build_binary(
            ctx,
            &operator,
            lhs,
            rhs,
            cursor.slice_from(start),
            operand_expected,
        );
    }

    Ok(lhs)
}

fn parse_unary(ctx: &mut Context, cursor: &mut Cursor, expected: Option<&ValueType>) -> ParseResult<Operand> {
    let start = cursor.pos();

    match cursor.current() {
        TokenKind::Dash => {
            cursor.advance();
            let operand = parse_unary(ctx, cursor, expected)?;
            if let Operand::Literal { index, negative } = operand {
                if matches!(
                    cursor.tokens().kind(index),
                    TokenKind::Integer | TokenKind::Float | TokenKind::Hex
                ) {
                    return Ok(Operand::Literal {
                        index,
                        negative: !negative,
                    });
                }
            }
            let target = expected.filter(|expected| expected.is_numeric());
            Ok(build_unary(ctx, UnaryOp::Negate, operand, cursor.slice_from(start), target))
        }
        TokenKind::Not => {
            cursor.advance();
            let operand = parse_unary(ctx, cursor, None)?;
            Ok(build_unary(
                ctx,
                UnaryOp::Not,
                operand,
                cursor.slice_from(start),
                Some(&ValueType::bool()),
            ))
        }
        _ => parse_postfix(ctx, cursor, expected),
    }
}

fn parse_postfix(ctx: &mut Context, cursor: &mut Cursor, expected: Option<&ValueType>) -> ParseResult<Operand> {
    let start = cursor.pos();
    let mut operand = parse_primary(ctx, cursor, expected)?;

    while cursor.eat(TokenKind::As) {
        let target = parse_type(ctx, cursor)?;
        operand = build_cast(ctx, operand, target, cursor.slice_from(start));
    }

    Ok(operand)
}

fn parse_primary(ctx: &mut Context, cursor: &mut Cursor, expected: Option<&ValueType>) -> ParseResult<Operand> {
    let index = cursor.pos();

    match cursor.current() {
        kind if kind.is_literal() => {
            cursor.advance();
            Ok(Operand::Literal {
                index,
                negative: false,
            })
        }
        TokenKind::Null => {
            cursor.advance();
            Ok(Operand::Null(index))
        }
        TokenKind::Identifier => match cursor.peek(1) {
            TokenKind::OpenParen | TokenKind::ColonColon => parse_call(ctx, cursor),
            _ => Ok(parse_variable(ctx, cursor)),
        },
        TokenKind::OpenParen => {
            cursor.advance();
            let inner = parse_expression(ctx, cursor, expected)?;
            if !cursor.eat(TokenKind::CloseParen) {
                return Err(ctx.unexpected(cursor.pos(), "`)`"));
            }
            Ok(inner)
        }
        _ => Err(ctx.unexpected(index, "an expression")),
    }
}

fn parse_variable(ctx: &mut Context, cursor: &mut Cursor) -> Operand {
    let index = cursor.advance();
    let name = cursor.tokens().literal(index).to_string();

    let Some(decl) = ctx.resolve_variable(&name) else {
        ctx.report(IssueKind::UnknownVariable { name }, TokenSlice::single(index));
        return Operand::Invalid;
    };

    let value_type = ctx.get(decl).value_type.clone();
    let code_ref = ctx.code_ref_at(index);
    let node = ctx.emplace_node(VarRefNode {
        code_ref,
        name,
        decl,
        value_type,
    });
    Operand::Node(node.erase())
}

/// Parses `name(args)` or `a::b::name(args)` and resolves the overload.
///
/// An unqualified name is looked up from the current namespace outwards; a
/// qualified one is resolved as a namespace path first. Arguments are
/// materialized with the chosen overload's parameter types.
fn parse_call(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<Operand> {
    let start = cursor.pos();

    let mut path = vec![cursor.literal(0).to_string()];
    cursor.advance();
    while cursor.eat(TokenKind::ColonColon) {
        if cursor.current() != TokenKind::Identifier {
            return Err(ctx.unexpected(cursor.pos(), "name"));
        }
        path.push(cursor.literal(0).to_string());
        cursor.advance();
    }

    if !cursor.eat(TokenKind::OpenParen) {
        return Err(ctx.unexpected(cursor.pos(), "`(`"));
    }

    let mut args = vec![];
    if !cursor.eat(TokenKind::CloseParen) {
        loop {
            args.push(parse_expression(ctx, cursor, None)?);

            if cursor.eat(TokenKind::Comma) {
                continue;
            }
            if cursor.eat(TokenKind::CloseParen) {
                break;
            }
            return Err(ctx.unexpected(cursor.pos(), "`,` or `)`"));
        }
    }

    let slice = cursor.slice_from(start);
    let display_name = path.join("::");

    let candidates = lookup_candidates(ctx, &path);
    if candidates.is_empty() {
        ctx.report(IssueKind::UnknownFunction { name: display_name }, slice);
        return Ok(Operand::Invalid);
    }

    let Some(shapes) = args
        .iter()
        .map(|arg| argument_shape(ctx, *arg))
        .collect::<Option<Vec<_>>>()
    else {
        return Ok(Operand::Invalid);
    };

    let params = candidates
        .iter()
        .map(|decl| {
            ctx.get(*decl)
                .args
                .iter()
                .map(|arg| ctx.get(*arg).value_type.clone())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let chosen = match select_overload(&params, &shapes) {
        Ok(chosen) => chosen,
        Err(OverloadError::NoMatch) => {
            let kind = IssueKind::NoMatchingOverload {
                name: display_name,
                arguments: describe_arguments(&shapes),
            };
            ctx.report(kind, slice);
            return Ok(Operand::Invalid);
        }
        Err(OverloadError::Ambiguous) => {
            ctx.report(IssueKind::AmbiguousCall { name: display_name }, slice);
            return Ok(Operand::Invalid);
        }
    };

    let callee = candidates[chosen];
    let mut arg_nodes = Vec::with_capacity(args.len());
    for (arg, param) in args.into_iter().zip(&params[chosen]) {
        match materialize(ctx, arg, Some(param)) {
            Some(node) => arg_nodes.push(node),
            None => return Ok(Operand::Invalid),
        }
    }

    let decl = ctx.get(callee);
    let mangled_name = decl.mangled_name.clone();
    let value_type = ctx.get(decl.return_type).value_type.clone();
    let code_ref = ctx.code_ref(slice);

    let node = ctx.emplace_node(FunctionCallNode {
        code_ref,
        name: display_name,
        callee,
        mangled_name,
        args: arg_nodes,
        value_type,
    });
    Ok(Operand::Node(node.erase()))
}

fn lookup_candidates(ctx: &Context, path: &[String]) -> Vec<NodeRef<FunctionDeclNode>> {
    let namespaces = &ctx.module.namespaces;
    let Some((name, qualifiers)) = path.split_last() else {
        return vec![];
    };

    if qualifiers.is_empty() {
        return namespaces
            .lookup_functions(ctx.namespace, name)
            .into_iter()
            .map(|symbol| symbol.decl)
            .collect();
    }

    namespaces
        .resolve_path(ctx.namespace, qualifiers)
        .map(|namespace| {
            namespaces
                .get(namespace)
                .functions_named(name)
                .map(|symbol| symbol.decl)
                .collect()
        })
        .unwrap_or_default()
}

/// `None` when the argument is invalid or of unknown type; the call is
/// then dropped without further reports.
fn argument_shape(ctx: &Context, operand: Operand) -> Option<ArgumentShape> {
    match operand {
        Operand::Literal { index, negative } => Some(ArgumentShape::Literal {
            kind: ctx.tokens().kind(index),
            text: literal_text(ctx, index, negative),
        }),
        Operand::Null(_) => Some(ArgumentShape::Null),
        Operand::Node(node) => operand_type(ctx, node)
            .filter(|value_type| !value_type.is_unknown())
            .map(ArgumentShape::Typed),
        Operand::Invalid => None,
    }
}

fn operand_type(ctx: &Context, node: AnyNodeRef) -> Option<ValueType> {
    ctx.module.arena.node(node).value_type().cloned()
}

fn literal_text(ctx: &Context, index: u32, negative: bool) -> String {
    let text = ctx.tokens().literal(index);
    if negative {
        format!("-{}", text)
    } else {
        text.to_string()
    }
}

fn literal_type(ctx: &Context, index: u32, negative: bool) -> ValueType {
    let kind = ctx.tokens().kind(index);
    parse_literal(kind, &literal_text(ctx, index, negative))
        .map_or_else(|| ValueType::primitive(Primitive::UInt64), default_literal_type)
}

fn unqualified(value_type: &ValueType) -> ValueType {
    value_type.clone().without_flags(TypeFlags::CONST)
}

/// Common type of two literal operands when nothing else decides it.
fn common_literal_type(lhs: ValueType, rhs: ValueType) -> ValueType {
    if lhs == rhs {
        return lhs;
    }

    if lhs.is_floating_type() || rhs.is_floating_type() {
        let single = [&lhs, &rhs]
            .into_iter()
            .filter(|side| side.is_floating_type())
            .all(|side| side.byte_size() == 4);
        return if single {
            ValueType::primitive(Primitive::Float32)
        } else {
            ValueType::float64()
        };
    }

    if lhs.is_integer_type() && rhs.is_integer_type() && rhs.byte_size() > lhs.byte_size() {
        return rhs;
    }
    lhs
}

fn required_operand(class: OperatorClass) -> &'static str {
    match class {
        OperatorClass::Logical => "bool",
        OperatorClass::Comparison => "comparable type",
        _ => "numeric type",
    }
}

/// Unifies the operands of a binary operator and builds its node.
///
/// A node operand fixes the type the other side must have. Two literal
/// operands take `bool` for logical operators, the expected type for
/// arithmetic when one is known, or else their common default type.
fn build_binary(
    ctx: &mut Context,
    operator: &Operator,
    lhs: Operand,
    rhs: Operand,
    slice: TokenSlice,
    expected: Option<&ValueType>,
) -> Operand {
    let class = operator.class;

    let target = match (lhs, rhs) {
        (Operand::Invalid, _) | (_, Operand::Invalid) => return Operand::Invalid,
        (Operand::Node(left), Operand::Node(right)) => {
            let (Some(left), Some(right)) = (operand_type(ctx, left), operand_type(ctx, right)) else {
                return Operand::Invalid;
            };
            if left.is_unknown() || right.is_unknown() {
                return Operand::Invalid;
            }
            if unqualified(&left) != unqualified(&right) {
                let kind = IssueKind::TypeMismatch {
                    expected: left.to_string(),
                    actual: right.to_string(),
                };
                ctx.report(kind, slice);
                return Operand::Invalid;
            }
            unqualified(&left)
        }
        (Operand::Node(node), _) | (_, Operand::Node(node)) => match operand_type(ctx, node) {
            Some(value_type) if !value_type.is_unknown() => unqualified(&value_type),
            _ => return Operand::Invalid,
        },
        (Operand::Null(_), _) | (_, Operand::Null(_)) => ValueType::void().with_flags(TypeFlags::POINTER),
        (
            Operand::Literal {
                index: left,
                negative: left_negative,
            },
            Operand::Literal {
                index: right,
                negative: right_negative,
            },
        ) => match class {
            OperatorClass::Logical => ValueType::bool(),
            OperatorClass::Arithmetic if expected.is_some_and(|expected| expected.is_numeric()) => {
                expected.map(unqualified).unwrap_or_else(ValueType::int32)
            }
            _ => common_literal_type(
                literal_type(ctx, left, left_negative),
                literal_type(ctx, right, right_negative),
            ),
        },
    };

    if !operands_allowed(class, &target) {
        let kind = IssueKind::TypeMismatch {
            expected: required_operand(class).to_string(),
            actual: target.to_string(),
        };
        ctx.report(kind, slice);
        return Operand::Invalid;
    }

    let left = materialize(ctx, lhs, Some(&target));
    let right = materialize(ctx, rhs, Some(&target));
    let (Some(left), Some(right)) = (left, right) else {
        return Operand::Invalid;
    };

    let value_type = binary_result_type(class, &target, &target);
    let code_ref = ctx.code_ref(slice);
    let node = ctx.emplace_node(BinaryExprNode {
        code_ref,
        operator: operator.symbol.clone(),
        class,
        lhs: left,
        rhs: right,
        value_type,
    });
    Operand::Node(node.erase())
}

fn build_unary(
    ctx: &mut Context,
    operator: UnaryOp,
    operand: Operand,
    slice: TokenSlice,
    expected: Option<&ValueType>,
) -> Operand {
    let Some(node) = materialize(ctx, operand, expected) else {
        return Operand::Invalid;
    };
    let value_type = match operand_type(ctx, node) {
        Some(value_type) if !value_type.is_unknown() => value_type,
        _ => return Operand::Invalid,
    };

    let Some(result) = unary_result_type(operator, &value_type) else {
        let required = match operator {
            UnaryOp::Negate => "numeric type",
            UnaryOp::Not => "bool",
        };
        let kind = IssueKind::TypeMismatch {
            expected: required.to_string(),
            actual: value_type.to_string(),
        };
        ctx.report(kind, slice);
        return Operand::Invalid;
    };

    let code_ref = ctx.code_ref(slice);
    let node = ctx.emplace_node(UnaryExprNode {
        code_ref,
        operator,
        operand: node,
        value_type: result,
    });
    Operand::Node(node.erase())
}

fn build_cast(
    ctx: &mut Context,
    operand: Operand,
    target: NodeRef<TypeNode>,
    slice: TokenSlice,
) -> Operand {
    let target = ctx.get(target).value_type.clone();
    if target.is_unknown() {
        return Operand::Invalid;
    }

    let Some(node) = materialize(ctx, operand, None) else {
        return Operand::Invalid;
    };
    let from = match operand_type(ctx, node) {
        Some(from) if !from.is_unknown() => from,
        _ => return Operand::Invalid,
    };

    let Some(kind) = cast_kind(&from, &target) else {
        let issue = IssueKind::InvalidCast {
            from: from.to_string(),
            to: target.to_string(),
        };
        ctx.report(issue, slice);
        return Operand::Invalid;
    };

    let code_ref = ctx.code_ref(slice);
    let node = ctx.emplace_node(TypeCastNode {
        code_ref,
        operand: node,
        from,
        value_type: target,
        kind,
    });
    Operand::Node(node.erase())
}

/// Turns an operand into a node of type `expected` (any type when `None`).
///
/// Literals are coerced, `null` needs a pointer type, and nodes must
/// already have the expected type; constness is ignored. Returns `None`
/// after reporting when that fails. Unknown types pass silently.
pub fn materialize(ctx: &mut Context, operand: Operand, expected: Option<&ValueType>) -> Option<AnyNodeRef> {
    let expected = expected.filter(|expected| !expected.is_unknown());

    match operand {
        Operand::Literal { index, negative } => {
            let kind = ctx.tokens().kind(index);
            let text = literal_text(ctx, index, negative);
            let code_ref = ctx.code_ref_at(index);
            check_literal(&mut ctx.module.arena, ctx.collector, kind, &text, expected, code_ref)
                .map(NodeRef::erase)
        }
        Operand::Null(index) => {
            let value_type = match expected {
                None => ValueType::void().with_flags(TypeFlags::POINTER),
                Some(expected) if expected.is_pointer() => unqualified(expected),
                Some(expected) => {
                    let kind = IssueKind::InvalidTypeConversion {
                        value: String::from("null"),
                        from: String::from("null"),
                        to: expected.to_string(),
                    };
                    ctx.report(kind, TokenSlice::single(index));
                    return None;
                }
            };
            let code_ref = ctx.code_ref_at(index);
            Some(ctx.emplace_node(NullNode { code_ref, value_type }).erase())
        }
        Operand::Node(node) => {
            let Some(expected) = expected else {
                return Some(node);
            };
            let actual = match operand_type(ctx, node) {
                Some(actual) if !actual.is_unknown() => actual,
                _ => return Some(node),
            };
            if unqualified(&actual) == unqualified(expected) {
                return Some(node);
            }

            let kind = IssueKind::TypeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            };
            let code_ref = ctx.module.arena.node(node).code_ref().clone();
            ctx.collector.report(kind, code_ref);
            None
        }
        Operand::Invalid => None,
    }
}

/// Type to show for an operand in a diagnostic, `None` if invalid.
pub fn describe_operand(ctx: &Context, operand: Operand) -> Option<String> {
    match operand {
        Operand::Literal { index, negative } => Some(literal_type(ctx, index, negative).to_string()),
        Operand::Null(_) => Some(String::from("null")),
        Operand::Node(node) => operand_type(ctx, node).map(|value_type| value_type.to_string()),
        Operand::Invalid => None,
    }
}
