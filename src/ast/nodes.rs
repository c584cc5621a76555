use std::collections::HashMap;

use crate::{
    diagnostics::{issues::CodeReference, operators::OperatorClass},
    lexer::tokens::TokenReference,
    symbols::namespace::NamespaceId,
    MK_LITERAL_ACCESSORS, MK_NODE_KINDS,
};

use super::{
    arena::{AnyNodeRef, AstNode, NodeRef},
    types::{Primitive, ValueType},
};

MK_NODE_KINDS! {
    Scope(ScopeNode),
    VarDecl(VarDeclNode),
    VarRef(VarRefNode),
    VarMut(VarMutNode),
    Literal(LiteralNode),
    BinaryExpr(BinaryExprNode),
    UnaryExpr(UnaryExprNode),
    FunctionCall(FunctionCallNode),
    FunctionDecl(FunctionDeclNode),
    Return(ReturnNode),
    If(IfNode),
    While(WhileNode),
    TypeCast(TypeCastNode),
    Type(TypeNode),
    NamespaceDecl(NamespaceDeclNode),
    Attribute(AttributeNode),
    Null(NullNode),
    Echo(EchoNode),
}

impl Node {
    /// Type of the value an expression node produces. `None` for
    /// statements.
    pub fn value_type(&self) -> Option<&ValueType> {
        match self {
            Node::VarRef(node) => Some(&node.value_type),
            Node::Literal(node) => Some(&node.value_type),
            Node::BinaryExpr(node) => Some(&node.value_type),
            Node::UnaryExpr(node) => Some(&node.value_type),
            Node::FunctionCall(node) => Some(&node.value_type),
            Node::TypeCast(node) => Some(&node.value_type),
            Node::Null(node) => Some(&node.value_type),
            _ => None,
        }
    }
}

/// A lexical block. Children are kept in source order.
#[derive(Debug, Clone)]
pub struct ScopeNode {
    pub code_ref: CodeReference,
    pub parent: Option<NodeRef<ScopeNode>>,
    pub children: Vec<AnyNodeRef>,
    pub locals: HashMap<String, NodeRef<VarDeclNode>>,
}

impl ScopeNode {
    pub fn new(code_ref: CodeReference, parent: Option<NodeRef<ScopeNode>>) -> Self {
        ScopeNode {
            code_ref,
            parent,
            children: vec![],
            locals: HashMap::new(),
        }
    }

    pub fn lookup_local(&self, name: &str) -> Option<NodeRef<VarDeclNode>> {
        self.locals.get(name).copied()
    }
}

#[derive(Debug, Clone)]
pub struct VarDeclNode {
    pub code_ref: CodeReference,
    pub name: String,
    pub value_type: ValueType,
    /// Explicit annotation, if the declaration had one.
    pub type_node: Option<NodeRef<TypeNode>>,
    pub init: Option<AnyNodeRef>,
    pub is_const: bool,
}

#[derive(Debug, Clone)]
pub struct VarRefNode {
    pub code_ref: CodeReference,
    pub name: String,
    pub decl: NodeRef<VarDeclNode>,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Assign,
    Increment,
    Decrement,
}

#[derive(Debug, Clone)]
pub struct VarMutNode {
    pub code_ref: CodeReference,
    pub target: NodeRef<VarDeclNode>,
    pub op: MutationOp,
    /// Assigned value; `None` for `++`/`--`.
    pub value: Option<AnyNodeRef>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    Integer(i128),
    Float(f64),
    Bool(bool),
}

/// A literal materialized at its final type. Float32 values are stored
/// already rounded to single precision.
#[derive(Debug, Clone)]
pub struct LiteralNode {
    pub code_ref: CodeReference,
    pub value: LiteralValue,
    pub value_type: ValueType,
}

impl LiteralNode {
    MK_LITERAL_ACCESSORS! {
        int8_value => Int8 as i8,
        int16_value => Int16 as i16,
        int32_value => Int32 as i32,
        int64_value => Int64 as i64,
        uint8_value => UInt8 as u8,
        uint16_value => UInt16 as u16,
        uint32_value => UInt32 as u32,
        uint64_value => UInt64 as u64,
    }

    pub fn float32_value(&self) -> Option<f32> {
        match (self.value_type.primitive, self.value) {
            (Some(Primitive::Float32), LiteralValue::Float(value)) => Some(value as f32),
            _ => None,
        }
    }

    pub fn float64_value(&self) -> Option<f64> {
        match (self.value_type.primitive, self.value) {
            (Some(Primitive::Float64), LiteralValue::Float(value)) => Some(value),
            _ => None,
        }
    }

    pub fn bool_value(&self) -> Option<bool> {
        match self.value {
            LiteralValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// `literal<type>(value)`, e.g. `literal<int8>(42)`.
    pub fn describe(&self) -> String {
        let value = match self.value {
            LiteralValue::Integer(value) => value.to_string(),
            LiteralValue::Float(value) => format!("{:.6}", value),
            LiteralValue::Bool(value) => value.to_string(),
        };
        format!("literal<{}>({})", self.value_type, value)
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExprNode {
    pub code_ref: CodeReference,
    pub operator: String,
    pub class: OperatorClass,
    pub lhs: AnyNodeRef,
    pub rhs: AnyNodeRef,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone)]
pub struct UnaryExprNode {
    pub code_ref: CodeReference,
    pub operator: UnaryOp,
    pub operand: AnyNodeRef,
    pub value_type: ValueType,
}

#[derive(Debug, Clone)]
pub struct FunctionCallNode {
    pub code_ref: CodeReference,
    pub name: String,
    pub callee: NodeRef<FunctionDeclNode>,
    /// Mangled name of the callee; the link key.
    pub mangled_name: String,
    pub args: Vec<AnyNodeRef>,
    pub value_type: ValueType,
}

#[derive(Debug, Clone)]
pub struct FunctionDeclNode {
    pub code_ref: CodeReference,
    pub name: String,
    pub name_token: Option<TokenReference>,
    pub args: Vec<NodeRef<VarDeclNode>>,
    pub return_type: NodeRef<TypeNode>,
    pub namespace: NamespaceId,
    /// Filled in by the second pass.
    pub body: Option<NodeRef<ScopeNode>>,
    pub has_body: bool,
    pub attributes: Vec<NodeRef<AttributeNode>>,
    pub mangled_name: String,
    /// Token index just past the signature (the `{` or `;`).
    pub signature_end: u32,
}

impl FunctionDeclNode {
    pub fn is_definition(&self) -> bool {
        self.has_body
    }
}

#[derive(Debug, Clone)]
pub struct ReturnNode {
    pub code_ref: CodeReference,
    pub value: Option<AnyNodeRef>,
    pub function: NodeRef<FunctionDeclNode>,
}

#[derive(Debug, Clone)]
pub struct IfNode {
    pub code_ref: CodeReference,
    pub condition: AnyNodeRef,
    pub then_branch: NodeRef<ScopeNode>,
    /// Either a scope (`else { }`) or another `If` (`else if`).
    pub else_branch: Option<AnyNodeRef>,
}

#[derive(Debug, Clone)]
pub struct WhileNode {
    pub code_ref: CodeReference,
    pub condition: AnyNodeRef,
    pub body: NodeRef<ScopeNode>,
}

/// How a cast is lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    Identity,
    SignExtend,
    ZeroExtend,
    Truncate,
    IntToFloat,
    FloatToInt,
    FloatExtend,
    FloatTruncate,
    BoolToInt,
}

#[derive(Debug, Clone)]
pub struct TypeCastNode {
    pub code_ref: CodeReference,
    pub operand: AnyNodeRef,
    pub from: ValueType,
    pub value_type: ValueType,
    pub kind: CastKind,
}

#[derive(Debug, Clone)]
pub struct TypeNode {
    pub code_ref: CodeReference,
    pub value_type: ValueType,
}

#[derive(Debug, Clone)]
pub struct NamespaceDeclNode {
    pub code_ref: CodeReference,
    pub path: Vec<String>,
    pub namespace: NamespaceId,
    /// `None` for the `namespace x;` form.
    pub body: Option<NodeRef<ScopeNode>>,
}

#[derive(Debug, Clone)]
pub struct AttributeNode {
    pub code_ref: CodeReference,
    pub name: String,
    pub target: Option<NodeRef<FunctionDeclNode>>,
}

#[derive(Debug, Clone)]
pub struct NullNode {
    pub code_ref: CodeReference,
    pub value_type: ValueType,
}

#[derive(Debug, Clone)]
pub enum EchoArg {
    Text(String),
    Value(AnyNodeRef),
}

#[derive(Debug, Clone)]
pub struct EchoNode {
    pub code_ref: CodeReference,
    pub args: Vec<EchoArg>,
}
