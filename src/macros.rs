//! Utility macros for the compiler.
//!
//! - `MK_RECOGNIZER!` - Creates an anchored lexer recognizer
//! - `MK_LITERAL_ACCESSORS!` - Generates typed value accessors on literal nodes

/// Creates a lexer `Recognizer` whose regex is anchored at the cursor.
///
/// The `=>` form emits a fixed token kind; the `,` form takes any `Action`.
///
/// # Example
///
/// ```ignore
/// MK_RECOGNIZER!("\\+\\+" => TokenKind::PlusPlus)
/// MK_RECOGNIZER!("\\s+", Action::Skip)
/// ```
#[macro_export]
macro_rules! MK_RECOGNIZER {
    ($pattern:literal => $kind:expr) => {
        MK_RECOGNIZER!($pattern, Action::Emit($kind))
    };
    ($pattern:literal, $action:expr) => {
        Recognizer {
            regex: Regex::new(concat!("^(?:", $pattern, ")")).expect("token pattern must compile"),
            action: $action,
        }
    };
}

/// Generates `fn <name>(&self) -> Option<$ty>` accessors that return the
/// literal's value only when the literal was materialized as `$primitive`.
#[macro_export]
macro_rules! MK_LITERAL_ACCESSORS {
    ($($name:ident => $primitive:ident as $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&self) -> Option<$ty> {
                if self.value_type.primitive != Some(Primitive::$primitive) {
                    return None;
                }
                match self.value {
                    LiteralValue::Integer(value) => <$ty>::try_from(value).ok(),
                    _ => None,
                }
            }
        )*
    };
}

/// Declares the closed set of AST node variants.
///
/// Generates `NodeKind` (the reference tag), the `Node` sum type stored in
/// the arena, and an `AstNode` impl per payload type. Every payload must
/// carry a `code_ref: CodeReference` field.
///
/// # Example
///
/// ```ignore
/// MK_NODE_KINDS! {
///     Scope(ScopeNode),
///     Literal(LiteralNode),
/// }
/// ```
#[macro_export]
macro_rules! MK_NODE_KINDS {
    ($($variant:ident($payload:ident)),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($variant),*
        }

        #[derive(Debug, Clone)]
        pub enum Node {
            $($variant($payload)),*
        }

        impl Node {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(Node::$variant(_) => NodeKind::$variant),*
                }
            }

            pub fn code_ref(&self) -> &CodeReference {
                match self {
                    $(Node::$variant(node) => &node.code_ref),*
                }
            }
        }

        $(
            impl AstNode for $payload {
                const KIND: NodeKind = NodeKind::$variant;

                fn from_node(node: &Node) -> Option<&Self> {
                    match node {
                        Node::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_node_mut(node: &mut Node) -> Option<&mut Self> {
                    match node {
                        Node::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_node(self) -> Node {
                    Node::$variant(self)
                }
            }
        )*
    };
}
