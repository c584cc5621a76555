//! Second pass: statements and bodies.
//!
//! Statements are dispatched through [`STMT_LOOKUP`] by their first token.
//! A handler returning `Err` has already reported a syntax error; the
//! dispatcher then skips to the next statement and carries on, so one
//! mistake produces one diagnostic.

use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::{
        arena::NodeRef,
        nodes::{ScopeNode, VarDeclNode},
    },
    compiler::module::Module,
    diagnostics::collector::Collector,
    lexer::tokens::TokenKind,
};

use super::{
    context::Context,
    cursor::Cursor,
    lookups::STMT_LOOKUP,
    stmt::parse_expression_stmt,
};

/// Parses every statement of file `file_index` into a root scope nested in
/// the module's root.
///
/// Signatures must already have been collected for the file.
pub fn parse_file(module: &mut Module, collector: &mut Collector, file_index: usize) {
    let tokens = Rc::clone(&module.files[file_index].tokens);
    let mut cursor = Cursor::new(&tokens, tokens.full_slice());
    let module_root = module.root;

    let mut ctx = Context::new(module, collector, file_index);
    ctx.scope = Some(module_root);

    let root = ctx.push_scope(ctx.code_ref(tokens.full_slice()));
    ctx.get_mut(module_root).children.push(root.erase());

    parse_statements(&mut ctx, &mut cursor, false);
    ctx.pop_scope();

    ctx.module.files[file_index].root = Some(root);
    debug!(
        file = %ctx.file,
        statements = ctx.get(root).children.len(),
        "parsed file"
    );
}

/// Parses statements until the end of input or, when `nested`, until the
/// `}` closing the current block (left in place).
///
/// A `namespace x;` switch lasts until the end of the block it appears in.
pub fn parse_statements(ctx: &mut Context, cursor: &mut Cursor, nested: bool) {
    let outer_block = ctx.block_namespace;
    ctx.block_namespace = ctx.namespace;

    while !cursor.at_end() {
        if cursor.current() == TokenKind::CloseCurly {
            if nested {
                break;
            }
            ctx.unexpected(cursor.pos(), "a statement");
            cursor.advance();
            continue;
        }

        parse_statement(ctx, cursor);
    }

    ctx.namespace = ctx.block_namespace;
    ctx.block_namespace = outer_block;
}

pub fn parse_statement(ctx: &mut Context, cursor: &mut Cursor) {
    let result = match STMT_LOOKUP.get(&cursor.current()) {
        Some(handler) => handler(ctx, cursor),
        None => parse_expression_stmt(ctx, cursor),
    };

    if result.is_err() {
        cursor.try_skip_to_next_statement();
    }
}

/// Parses `{ ... }` into a new scope, binding `locals` in it first.
///
/// # Arguments
///
/// * `ctx` - The parsing context; the new scope is nested in its current
///   scope.
/// * `cursor` - Positioned at the `{`.
/// * `locals` - Declarations visible throughout the block, such as
///   function arguments.
///
/// # Returns
///
/// The scope. A missing `}` is reported at the end of input.
pub fn parse_block(ctx: &mut Context, cursor: &mut Cursor, locals: &[NodeRef<VarDeclNode>]) -> NodeRef<ScopeNode> {
    let open = cursor.advance();
    let scope = ctx.push_scope(ctx.code_ref_at(open));

    for local in locals {
        ctx.declare_variable(*local);
    }

    parse_statements(ctx, cursor, true);
    if !cursor.eat(TokenKind::CloseCurly) {
        ctx.unexpected(cursor.pos(), "`}`");
    }

    let code_ref = ctx.code_ref(cursor.slice_from(open));
    ctx.get_mut(scope).code_ref = code_ref;
    ctx.pop_scope();
    scope
}
