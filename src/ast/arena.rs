//! Node arena and tagged, non-owning node references.

use std::{fmt::Debug, hash::Hash, marker::PhantomData};

use super::nodes::{Node, NodeKind};

/// Implemented by every node payload type; ties the payload to its tag.
pub trait AstNode: Sized {
    const KIND: NodeKind;

    fn from_node(node: &Node) -> Option<&Self>;
    fn from_node_mut(node: &mut Node) -> Option<&mut Self>;
    fn into_node(self) -> Node;
}

/// Typed handle to a node of payload type `T`. Copyable, comparable, and
/// never an owner: the arena that minted it owns the node.
pub struct NodeRef<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> NodeRef<T> {
    fn new(index: u32) -> Self {
        NodeRef {
            index,
            _marker: PhantomData,
        }
    }

    pub fn index(self) -> u32 {
        self.index
    }
}

impl<T: AstNode> NodeRef<T> {
    pub fn erase(self) -> AnyNodeRef {
        AnyNodeRef {
            kind: T::KIND,
            index: self.index,
        }
    }
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<T> {}

impl<T> PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for NodeRef<T> {}

impl<T> Hash for NodeRef<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T: AstNode> Debug for NodeRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeRef<{:?}>({})", T::KIND, self.index)
    }
}

impl<T: AstNode> From<NodeRef<T>> for AnyNodeRef {
    fn from(node: NodeRef<T>) -> Self {
        node.erase()
    }
}

/// Tag plus index; the untyped form stored wherever a slot may hold more
/// than one node variant (scope children, expression operands).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnyNodeRef {
    pub kind: NodeKind,
    index: u32,
}

impl AnyNodeRef {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn is<T: AstNode>(self) -> bool {
        self.kind == T::KIND
    }

    /// Panics if the tag is not `T`'s.
    pub fn downcast<T: AstNode>(self) -> NodeRef<T> {
        assert_eq!(
            self.kind,
            T::KIND,
            "node reference #{} downcast to the wrong kind",
            self.index
        );
        NodeRef::new(self.index)
    }

    pub fn try_downcast<T: AstNode>(self) -> Option<NodeRef<T>> {
        self.is::<T>().then(|| NodeRef::new(self.index))
    }
}

/// Sole owner of every node of one module. Nodes are appended and never
/// freed individually.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc<T: AstNode>(&mut self, node: T) -> NodeRef<T> {
        let index = self.nodes.len() as u32;
        self.nodes.push(node.into_node());
        NodeRef::new(index)
    }

    pub fn get<T: AstNode>(&self, node: NodeRef<T>) -> &T {
        let stored = &self.nodes[node.index as usize];
        match T::from_node(stored) {
            Some(payload) => payload,
            None => panic!(
                "node #{} is a {:?}, not a {:?}",
                node.index,
                stored.kind(),
                T::KIND
            ),
        }
    }

    pub fn get_mut<T: AstNode>(&mut self, node: NodeRef<T>) -> &mut T {
        let stored = &mut self.nodes[node.index as usize];
        let kind = stored.kind();
        match T::from_node_mut(stored) {
            Some(payload) => payload,
            None => panic!("node #{} is a {:?}, not a {:?}", node.index, kind, T::KIND),
        }
    }

    pub fn node(&self, node: AnyNodeRef) -> &Node {
        let stored = &self.nodes[node.index as usize];
        assert_eq!(stored.kind(), node.kind, "stale node reference #{}", node.index);
        stored
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnyNodeRef, &Node)> {
        self.nodes.iter().enumerate().map(|(index, node)| {
            (
                AnyNodeRef {
                    kind: node.kind(),
                    index: index as u32,
                },
                node,
            )
        })
    }
}
