//! First pass: function signatures.
//!
//! Walks the top level of a file and the bodies of namespace blocks,
//! registering every `fn` signature in the namespace table before any
//! function body is parsed. Everything else is skipped; the second pass
//! reports it.

use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::{
        arena::NodeRef,
        nodes::{FunctionDeclNode, TypeNode, VarDeclNode},
        types::ValueType,
    },
    compiler::module::Module,
    diagnostics::{collector::Collector, issues::IssueKind},
    lexer::tokens::{TokenKind, TokenReference, TokenSlice},
    symbols::{
        mangle::mangle_function,
        namespace::{Symbol, SymbolKind},
    },
};

use super::{
    context::{Context, ParseResult},
    cursor::Cursor,
    types::{parse_type, read_path},
};

/// Tokens the first pass stops at; everything between them is skipped.
const STATEMENT_STARTS: [TokenKind; 5] = [
    TokenKind::Fn,
    TokenKind::Namespace,
    TokenKind::At,
    TokenKind::OpenCurly,
    TokenKind::CloseCurly,
];

pub fn collect_symbols(module: &mut Module, collector: &mut Collector, file_index: usize) {
    let tokens = Rc::clone(&module.files[file_index].tokens);
    let mut cursor = Cursor::new(&tokens, tokens.full_slice());
    let mut ctx = Context::new(module, collector, file_index);

    collect_block(&mut ctx, &mut cursor, false);
}

fn collect_block(ctx: &mut Context, cursor: &mut Cursor, nested: bool) {
    let outer_block = ctx.block_namespace;
    ctx.block_namespace = ctx.namespace;

    while !cursor.at_end() {
        match cursor.current() {
            TokenKind::CloseCurly if nested => break,
            TokenKind::CloseCurly => {
                cursor.advance();
            }
            TokenKind::Fn => collect_function(ctx, cursor),
            TokenKind::Namespace => collect_namespace(ctx, cursor),
            TokenKind::OpenCurly => cursor.skip_block(),
            TokenKind::At if cursor.is_type_sequence(&[TokenKind::At, TokenKind::Identifier]) => {
                cursor.jump(cursor.pos() + 2);
            }
            _ => {
                cursor.advance();
                cursor.skip_until(&STATEMENT_STARTS);
            }
        }
    }

    ctx.namespace = ctx.block_namespace;
    ctx.block_namespace = outer_block;
}

fn collect_namespace(ctx: &mut Context, cursor: &mut Cursor) {
    cursor.advance();

    let Ok(path) = read_path(cursor) else {
        cursor.try_skip_to_next_statement();
        return;
    };

    match cursor.current() {
        TokenKind::Semicolon => {
            cursor.advance();
            ctx.namespace = ctx
                .module
                .namespaces
                .get_or_create_path(ctx.block_namespace, &path);
        }
        TokenKind::OpenCurly => {
            cursor.advance();
            let outer = ctx.namespace;
            ctx.namespace = ctx.module.namespaces.get_or_create_path(outer, &path);
            collect_block(ctx, cursor, true);
            cursor.eat(TokenKind::CloseCurly);
            ctx.namespace = outer;
        }
        _ => cursor.try_skip_to_next_statement(),
    }
}

fn collect_function(ctx: &mut Context, cursor: &mut Cursor) {
    let snapshot = cursor.snapshot();
    let fn_index = cursor.pos();

    match parse_signature(ctx, cursor) {
        Ok(decl) => {
            ctx.module.files[ctx.file_index]
                .signatures
                .insert(fn_index, decl);

            if cursor.current() == TokenKind::OpenCurly {
                cursor.skip_block();
            } else {
                cursor.eat(TokenKind::Semicolon);
            }
        }
        Err(_) => {
            ctx.module.files[ctx.file_index]
                .rejected_signatures
                .insert(fn_index);
            // Skip from `fn` like the second pass does.
            cursor.restore(snapshot);
            cursor.try_skip_to_next_statement();
        }
    }
}

/// Parses `fn name(arg: type, ...) -> type` and registers it.
///
/// # Arguments
///
/// * `ctx` - The parsing context; its current namespace owns the function.
/// * `cursor` - Positioned at `fn`.
///
/// # Returns
///
/// The declaration node, with the cursor left on the `{` of the body or the
/// `;` of a bodiless declaration. A signature whose mangled name is already
/// taken in the namespace is reported as `DuplicateFunction` but still
/// returned, so its body is parsed.
fn parse_signature(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<NodeRef<FunctionDeclNode>> {
    let start = cursor.advance();

    let name_index = cursor.pos();
    if cursor.current() != TokenKind::Identifier {
        return Err(ctx.unexpected(name_index, "function name"));
    }
    let name = cursor.literal(0).to_string();
    cursor.advance();

    if !cursor.eat(TokenKind::OpenParen) {
        return Err(ctx.unexpected(cursor.pos(), "`(`"));
    }

    let mut args: Vec<(String, TokenSlice, NodeRef<TypeNode>)> = vec![];
    if !cursor.eat(TokenKind::CloseParen) {
        loop {
            let arg_start = cursor.pos();
            if cursor.current() != TokenKind::Identifier {
                return Err(ctx.unexpected(arg_start, "argument name"));
            }
            let arg_name = cursor.literal(0).to_string();
            cursor.advance();

            if !cursor.eat(TokenKind::Colon) {
                return Err(ctx.unexpected(cursor.pos(), "`:`"));
            }
            let type_node = parse_type(ctx, cursor)?;
            args.push((arg_name, cursor.slice_from(arg_start), type_node));

            if cursor.eat(TokenKind::Comma) {
                continue;
            }
            if cursor.eat(TokenKind::CloseParen) {
                break;
            }
            return Err(ctx.unexpected(cursor.pos(), "`,` or `)`"));
        }
    }

    let return_type = if cursor.eat(TokenKind::Arrow) {
        parse_type(ctx, cursor)?
    } else {
        let code_ref = ctx.code_ref_at(name_index);
        ctx.emplace_node(TypeNode {
            code_ref,
            value_type: ValueType::void(),
        })
    };

    let signature_end = cursor.pos();
    let has_body = match cursor.current() {
        TokenKind::OpenCurly => true,
        TokenKind::Semicolon => false,
        _ => return Err(ctx.unexpected(signature_end, "`{` or `;`")),
    };

    let mut arg_decls = Vec::with_capacity(args.len());
    let mut arg_types = Vec::with_capacity(args.len());
    for (arg_name, slice, type_node) in args {
        let value_type = ctx.get(type_node).value_type.clone();
        let code_ref = ctx.code_ref(slice);
        arg_types.push(value_type.clone());
        arg_decls.push(ctx.emplace_node(VarDeclNode {
            code_ref,
            name: arg_name,
            value_type,
            type_node: Some(type_node),
            init: None,
            is_const: false,
        }));
    }

    let namespace = ctx.namespace;
    let mangled_name = mangle_function(&ctx.module.namespaces, namespace, &name, &arg_types);
    let code_ref = ctx.code_ref(cursor.slice_from(start));

    let decl = ctx.emplace_node(FunctionDeclNode {
        code_ref,
        name: name.clone(),
        name_token: Some(TokenReference {
            stream: ctx.file_index,
            index: name_index,
        }),
        args: arg_decls,
        return_type,
        namespace,
        body: None,
        has_body,
        attributes: vec![],
        mangled_name: mangled_name.clone(),
        signature_end,
    });

    let duplicate = ctx
        .module
        .namespaces
        .insert_symbol(
            namespace,
            Symbol {
                kind: SymbolKind::Function,
                name: name.clone(),
                mangled_name: mangled_name.clone(),
                decl,
            },
        )
        .is_err();

    // Distinct namespace paths can still mangle alike (`a_b::c`, `a::b::c`).
    let duplicate = duplicate || !ctx.module.functions.register(&mangled_name, decl);

    if duplicate {
        let qualified = match ctx.module.namespaces.qualified_name(namespace) {
            prefix if prefix.is_empty() => name,
            prefix => format!("{}::{}", prefix, name),
        };
        ctx.report(
            IssueKind::DuplicateFunction { name: qualified },
            TokenSlice::single(name_index),
        );
    } else {
        debug!(function = %mangled_name, file = %ctx.file, "registered signature");
    }

    Ok(decl)
}
