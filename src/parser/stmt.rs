use std::mem;

use crate::{
    ast::{
        arena::{AnyNodeRef, NodeRef},
        nodes::{
            AttributeNode, EchoArg, EchoNode, IfNode, MutationOp, NamespaceDeclNode, ReturnNode, VarDeclNode,
            VarMutNode, WhileNode,
        },
        types::{TypeFlags, ValueType},
    },
    diagnostics::issues::IssueKind,
    lexer::tokens::{TokenKind, TokenSlice},
};

use super::{
    context::{Context, ParseResult},
    cursor::Cursor,
    expr::{describe_operand, materialize, parse_expression, Operand},
    lookups::KNOWN_ATTRIBUTES,
    parser::parse_block,
    types::{parse_type, read_path},
};

fn expect_semicolon(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    if cursor.eat(TokenKind::Semicolon) {
        Ok(())
    } else {
        Err(ctx.unexpected(cursor.pos(), "`;`"))
    }
}

fn node_type(ctx: &Context, node: AnyNodeRef) -> Option<ValueType> {
    ctx.module.arena.node(node).value_type().cloned()
}

/// Parses an expression used as a statement, e.g. a call.
pub fn parse_expression_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let operand = parse_expression(ctx, cursor, None)?;
    expect_semicolon(ctx, cursor)?;

    if let Some(node) = materialize(ctx, operand, None) {
        ctx.append(node);
    }
    Ok(())
}

/// Parses `let name[: type] [= value];` or `const name[: type] = value;`.
///
/// # Arguments
///
/// * `ctx` - The parsing context; the variable is bound in its current
///   scope.
/// * `cursor` - Positioned at `let` or `const`.
///
/// # Returns
///
/// `Err` for a declaration with neither type nor value, or a constant
/// without a value. The initializer is checked against the declared type;
/// without one the variable takes the initializer's type.
pub fn parse_var_decl_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let start = cursor.advance();
    let is_const = cursor.tokens().kind(start) == TokenKind::Const;

    if cursor.current() != TokenKind::Identifier {
        return Err(ctx.unexpected(cursor.pos(), "variable name"));
    }
    let name = cursor.literal(0).to_string();
    cursor.advance();

    let type_node = if cursor.eat(TokenKind::Colon) {
        Some(parse_type(ctx, cursor)?)
    } else {
        None
    };
    let declared = type_node.map(|type_node| ctx.get(type_node).value_type.clone());
    let expected = declared.clone().filter(|declared| !declared.is_unknown());

    let init = if cursor.eat(TokenKind::Assignment) {
        Some(parse_expression(ctx, cursor, expected.as_ref())?)
    } else {
        None
    };

    if init.is_none() {
        if is_const {
            return Err(ctx.unexpected(cursor.pos(), "`=`"));
        }
        if type_node.is_none() {
            return Err(ctx.unexpected(cursor.pos(), "`:` or `=`"));
        }
    }
    expect_semicolon(ctx, cursor)?;

    let init = init.and_then(|init| materialize(ctx, init, expected.as_ref()));
    let mut value_type = declared
        .or_else(|| init.and_then(|init| node_type(ctx, init)))
        .unwrap_or_else(|| ValueType::unknown(&name));
    if is_const {
        value_type = value_type.with_flags(TypeFlags::CONST);
    }

    let code_ref = ctx.code_ref(cursor.slice_from(start));
    let decl = ctx.emplace_node(VarDeclNode {
        code_ref,
        name,
        value_type,
        type_node,
        init,
        is_const,
    });

    if ctx.declare_variable(decl) {
        ctx.append(decl);
    }
    Ok(())
}

/// An identifier starts a mutation when followed by `=`, `++` or `--`,
/// and an expression otherwise.
pub fn parse_identifier_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    match cursor.peek(1) {
        TokenKind::Assignment | TokenKind::PlusPlus | TokenKind::MinusMinus => parse_mutation_stmt(ctx, cursor),
        _ => parse_expression_stmt(ctx, cursor),
    }
}

fn parse_mutation_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let start = cursor.advance();
    let name = cursor.tokens().literal(start).to_string();
    let decl = ctx.resolve_variable(&name);
    let target_type = decl
        .map(|decl| ctx.get(decl).value_type.clone().without_flags(TypeFlags::CONST))
        .filter(|target_type| !target_type.is_unknown());

    let op = match cursor.current() {
        TokenKind::PlusPlus => MutationOp::Increment,
        TokenKind::MinusMinus => MutationOp::Decrement,
        _ => MutationOp::Assign,
    };
    cursor.advance();

    let value = match op {
        MutationOp::Assign => Some(parse_expression(ctx, cursor, target_type.as_ref())?),
        _ => None,
    };
    expect_semicolon(ctx, cursor)?;
    let slice = cursor.slice_from(start);

    let Some(decl) = decl else {
        ctx.report(IssueKind::UnknownVariable { name }, TokenSlice::single(start));
        return Ok(());
    };
    if ctx.get(decl).is_const {
        ctx.report(IssueKind::ConstantMutation { name }, slice);
        return Ok(());
    }

    let value = match value {
        Some(value) => match materialize(ctx, value, target_type.as_ref()) {
            Some(node) => Some(node),
            None => return Ok(()),
        },
        None => {
            if let Some(target_type) = target_type.as_ref().filter(|target_type| !target_type.is_numeric()) {
                let kind = IssueKind::TypeMismatch {
                    expected: String::from("numeric type"),
                    actual: target_type.to_string(),
                };
                ctx.report(kind, slice);
                return Ok(());
            }
            None
        }
    };

    let code_ref = ctx.code_ref(slice);
    let node = ctx.emplace_node(VarMutNode {
        code_ref,
        target: decl,
        op,
        value,
    });
    ctx.append(node);
    Ok(())
}

fn parse_condition(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<Operand> {
    let condition = parse_expression(ctx, cursor, Some(&ValueType::bool()))?;
    if cursor.current() != TokenKind::OpenCurly {
        return Err(ctx.unexpected(cursor.pos(), "`{`"));
    }
    Ok(condition)
}

pub fn parse_if_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    if let Some(node) = parse_if(ctx, cursor)? {
        ctx.append(node);
    }
    Ok(())
}

/// Parses `if cond { } [else if ... | else { }]`.
///
/// When the condition is rejected no `IfNode` is built; the branches are
/// still parsed and appended to the current scope so their contents are
/// checked.
fn parse_if(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<Option<NodeRef<IfNode>>> {
    let start = cursor.advance();
    let condition = parse_condition(ctx, cursor)?;
    let condition = materialize(ctx, condition, Some(&ValueType::bool()));

    let then_branch = parse_block(ctx, cursor, &[]);

    let else_branch = if cursor.eat(TokenKind::Else) {
        match cursor.current() {
            TokenKind::If => parse_if(ctx, cursor)?.map(NodeRef::erase),
            TokenKind::OpenCurly => Some(parse_block(ctx, cursor, &[]).erase()),
            _ => return Err(ctx.unexpected(cursor.pos(), "`if` or `{`")),
        }
    } else {
        None
    };

    let Some(condition) = condition else {
        ctx.append(then_branch);
        if let Some(else_branch) = else_branch {
            ctx.append(else_branch);
        }
        return Ok(None);
    };

    let code_ref = ctx.code_ref(cursor.slice_from(start));
    Ok(Some(ctx.emplace_node(IfNode {
        code_ref,
        condition,
        then_branch,
        else_branch,
    })))
}

pub fn parse_while_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let start = cursor.advance();
    let condition = parse_condition(ctx, cursor)?;
    let condition = materialize(ctx, condition, Some(&ValueType::bool()));

    let body = parse_block(ctx, cursor, &[]);

    let Some(condition) = condition else {
        ctx.append(body);
        return Ok(());
    };

    let code_ref = ctx.code_ref(cursor.slice_from(start));
    let node = ctx.emplace_node(WhileNode {
        code_ref,
        condition,
        body,
    });
    ctx.append(node);
    Ok(())
}

/// Parses `return [value];`, checking the value against the enclosing
/// function's return type.
pub fn parse_return_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let start = cursor.advance();

    let return_type = ctx.function.map(|function| {
        let return_type = ctx.get(function).return_type;
        ctx.get(return_type).value_type.clone()
    });
    let expected = return_type
        .clone()
        .filter(|return_type| !return_type.is_unknown() && !return_type.is_void());

    let value = if cursor.current() != TokenKind::Semicolon {
        Some(parse_expression(ctx, cursor, expected.as_ref())?)
    } else {
        None
    };
    expect_semicolon(ctx, cursor)?;
    let slice = cursor.slice_from(start);

    let (Some(function), Some(return_type)) = (ctx.function, return_type) else {
        ctx.report(IssueKind::ReturnOutsideFunction, slice);
        return Ok(());
    };

    let value = match value {
        Some(value) if return_type.is_void() => {
            if let Some(actual) = describe_operand(ctx, value) {
                let kind = IssueKind::TypeMismatch {
                    expected: return_type.to_string(),
                    actual,
                };
                ctx.report(kind, slice);
            }
            None
        }
        Some(value) => match materialize(ctx, value, expected.as_ref()) {
            Some(node) => Some(node),
            None => return Ok(()),
        },
        None => {
            if !return_type.is_void() && !return_type.is_unknown() {
                let kind = IssueKind::TypeMismatch {
                    expected: return_type.to_string(),
                    actual: ValueType::void().to_string(),
                };
                ctx.report(kind, slice);
            }
            None
        }
    };

    let code_ref = ctx.code_ref(slice);
    let node = ctx.emplace_node(ReturnNode {
        code_ref,
        value,
        function,
    });
    ctx.append(node);
    Ok(())
}

/// Parses `echo(arg, ...);`. String literals are kept as text, anything
/// else must be an expression.
pub fn parse_echo_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let start = cursor.advance();
    if !cursor.eat(TokenKind::OpenParen) {
        return Err(ctx.unexpected(cursor.pos(), "`(`"));
    }

    let mut args = vec![];
    if !cursor.eat(TokenKind::CloseParen) {
        loop {
            if cursor.current() == TokenKind::String {
                args.push(EchoArg::Text(cursor.literal(0).to_string()));
                cursor.advance();
            } else {
                let operand = parse_expression(ctx, cursor, None)?;
                if let Some(node) = materialize(ctx, operand, None) {
                    args.push(EchoArg::Value(node));
                }
            }

            if cursor.eat(TokenKind::Comma) {
                continue;
            }
            if cursor.eat(TokenKind::CloseParen) {
                break;
            }
            return Err(ctx.unexpected(cursor.pos(), "`,` or `)`"));
        }
    }
    expect_semicolon(ctx, cursor)?;

    let code_ref = ctx.code_ref(cursor.slice_from(start));
    let node = ctx.emplace_node(EchoNode { code_ref, args });
    ctx.append(node);
    Ok(())
}

/// Parses `namespace a::b;` or `namespace a::b { ... }`.
///
/// The statement form switches namespace until the end of the enclosing
/// block, relative to the namespace that block opened in. The block form
/// is relative to the current namespace and ends with the block.
pub fn parse_namespace_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let start = cursor.advance();
    let path = read_path(cursor).map_err(|index| ctx.unexpected(index, "namespace name"))?;

    let (namespace, body) = match cursor.current() {
        TokenKind::Semicolon => {
            cursor.advance();
            let namespace = ctx
                .module
                .namespaces
                .get_or_create_path(ctx.block_namespace, &path);
            ctx.namespace = namespace;
            (namespace, None)
        }
        TokenKind::OpenCurly => {
            let outer = ctx.namespace;
            let namespace = ctx.module.namespaces.get_or_create_path(outer, &path);
            ctx.namespace = namespace;
            let body = parse_block(ctx, cursor, &[]);
            ctx.namespace = outer;
            (namespace, Some(body))
        }
        _ => return Err(ctx.unexpected(cursor.pos(), "`;` or `{`")),
    };

    let code_ref = ctx.code_ref(cursor.slice_from(start));
    let node = ctx.emplace_node(NamespaceDeclNode {
        code_ref,
        path,
        namespace,
        body,
    });
    ctx.append(node);
    Ok(())
}

/// Parses `@name`. The attribute belongs to the next function; one not
/// followed by `fn` (possibly after more attributes) is dangling.
pub fn parse_attribute_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let start = cursor.advance();
    if cursor.current() != TokenKind::Identifier {
        return Err(ctx.unexpected(cursor.pos(), "attribute name"));
    }
    let name = cursor.literal(0).to_string();
    cursor.advance();
    let slice = cursor.slice_from(start);

    if !KNOWN_ATTRIBUTES.contains(name.as_str()) {
        ctx.report(IssueKind::UnknownAttribute { name: name.clone() }, slice);
    }

    let code_ref = ctx.code_ref(slice);
    let node = ctx.emplace_node(AttributeNode {
        code_ref,
        name,
        target: None,
    });
    ctx.append(node);
    ctx.pending_attributes.push(node);

    if !matches!(cursor.current(), TokenKind::Fn | TokenKind::At) {
        for attribute in mem::take(&mut ctx.pending_attributes) {
            let attribute = ctx.get(attribute);
            let kind = IssueKind::DanglingAttribute {
                name: attribute.name.clone(),
            };
            let code_ref = attribute.code_ref.clone();
            ctx.collector.report(kind, code_ref);
        }
    }
    Ok(())
}

/// Parses the body of a function whose signature the first pass
/// registered.
///
/// Functions may only be declared at file or namespace level; a `fn` with
/// no registered signature is nested somewhere else.
pub fn parse_fn_decl_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let fn_index = cursor.pos();
    let attributes = mem::take(&mut ctx.pending_attributes);

    let file = &ctx.module.files[ctx.file_index];
    if file.rejected_signatures.contains(&fn_index) {
        cursor.try_skip_to_next_statement();
        return Ok(());
    }
    let Some(decl) = file.signatures.get(&fn_index).copied() else {
        return Err(ctx.unexpected(fn_index, "a statement"));
    };

    for attribute in &attributes {
        ctx.get_mut(*attribute).target = Some(decl);
    }
    ctx.get_mut(decl).attributes.extend(attributes);

    cursor.jump(ctx.get(decl).signature_end);

    if ctx.get(decl).has_body {
        let args = ctx.get(decl).args.clone();
        let outer = ctx.function.replace(decl);
        let body = parse_block(ctx, cursor, &args);
        ctx.function = outer;
        ctx.get_mut(decl).body = Some(body);
    } else {
        cursor.advance();
    }

    ctx.append(decl);
    Ok(())
}

pub fn parse_block_stmt(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<()> {
    let scope = parse_block(ctx, cursor, &[]);
    ctx.append(scope);
    Ok(())
}
