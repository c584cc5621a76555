use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::lexer::tokens::TokenKind;

use super::{
    context::{Context, ParseResult},
    cursor::Cursor,
    stmt::*,
};

pub type StmtHandler = fn(&mut Context, &mut Cursor) -> ParseResult<()>;

lazy_static! {
    /// Statement handlers keyed by the token that starts the statement.
    /// Anything not listed parses as an expression statement.
    pub static ref STMT_LOOKUP: HashMap<TokenKind, StmtHandler> = {
        let mut lookup: HashMap<TokenKind, StmtHandler> = HashMap::new();
        lookup.insert(TokenKind::Let, parse_var_decl_stmt);
        lookup.insert(TokenKind::Const, parse_var_decl_stmt);
        lookup.insert(TokenKind::Identifier, parse_identifier_stmt);
        lookup.insert(TokenKind::If, parse_if_stmt);
        lookup.insert(TokenKind::While, parse_while_stmt);
        lookup.insert(TokenKind::Return, parse_return_stmt);
        lookup.insert(TokenKind::Echo, parse_echo_stmt);
        lookup.insert(TokenKind::Namespace, parse_namespace_stmt);
        lookup.insert(TokenKind::At, parse_attribute_stmt);
        lookup.insert(TokenKind::Fn, parse_fn_decl_stmt);
        lookup.insert(TokenKind::OpenCurly, parse_block_stmt);
        lookup
    };

    /// Attribute names understood by later stages. Others are kept but
    /// warned about.
    pub static ref KNOWN_ATTRIBUTES: HashSet<&'static str> = HashSet::from([
        "inline",
        "noinline",
        "export",
        "extern",
        "deprecated",
        "entry",
    ]);
}
