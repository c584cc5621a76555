use crate::{
    ast::{
        arena::NodeRef,
        nodes::TypeNode,
        types::{TypeFlags, ValueType},
    },
    diagnostics::issues::IssueKind,
    lexer::tokens::{TokenKind, TokenSlice},
};

use super::{
    context::{Context, ParseResult},
    cursor::Cursor,
};

/// Parses a type annotation: a type name followed by an optional `*`.
///
/// # Arguments
///
/// * `ctx` - The parsing context; the name is resolved in its type registry.
/// * `cursor` - Positioned at the type name.
///
/// # Returns
///
/// The new `TypeNode`. A name that resolves to nothing is reported as
/// `UnknownType` and still yields a node, typed `Unknown`, so parsing goes
/// on.
pub fn parse_type(ctx: &mut Context, cursor: &mut Cursor) -> ParseResult<NodeRef<TypeNode>> {
    let start = cursor.pos();

    if cursor.current() != TokenKind::Identifier {
        return Err(ctx.unexpected(start, "type name"));
    }
    let name = cursor.literal(0);
    cursor.advance();

    let mut value_type = match ctx.collector.types.resolve(name) {
        Some(value_type) => value_type,
        None => {
            ctx.report(
                IssueKind::UnknownType {
                    name: name.to_string(),
                },
                TokenSlice::single(start),
            );
            ValueType::unknown(name)
        }
    };

    if cursor.eat(TokenKind::Star) {
        value_type = value_type.with_flags(TypeFlags::POINTER);
    }

    let code_ref = ctx.code_ref(cursor.slice_from(start));
    Ok(ctx.emplace_node(TypeNode {
        code_ref,
        value_type,
    }))
}

/// Reads a `::`-separated name path without reporting anything.
///
/// On failure returns the index of the offending token.
pub fn read_path(cursor: &mut Cursor) -> Result<Vec<String>, u32> {
    let mut path = vec![];

    loop {
        if cursor.current() != TokenKind::Identifier {
            return Err(cursor.pos());
        }
        path.push(cursor.literal(0).to_string());
        cursor.advance();

        if !cursor.eat(TokenKind::ColonColon) {
            return Ok(path);
        }
    }
}
