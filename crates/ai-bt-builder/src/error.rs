use ai_bt::RealizeError;
use ai_core::{Category, NodeId, TreeId};

/// Misuse of the assembly API. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("no parent given, but the project already has a root tree")]
    EmptyParent,

    #[error("node id {0} is already registered")]
    DuplicateNodeId(NodeId),

    #[error("node {node} is compiled as {expected} but wraps a {actual} behavior")]
    CategoryMismatch {
        node: NodeId,
        expected: Category,
        actual: Category,
    },

    #[error("node {parent} is a {category} and cannot take children")]
    LeafWithChildren { parent: NodeId, category: Category },

    #[error("unknown tree {0}")]
    UnknownTree(TreeId),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node {node} belongs to tree {actual}, not {expected}")]
    TreeMismatch {
        node: NodeId,
        expected: TreeId,
        actual: TreeId,
    },

    #[error("a parent was given without a tree")]
    NoCurrentTree,

    #[error("decorator {decorator} already has child {child}")]
    DecoratorOccupied { decorator: NodeId, child: NodeId },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("project has no trees")]
    EmptyProject,

    #[error("failed to realize tree {tree}")]
    Realize {
        tree: TreeId,
        #[source]
        source: RealizeError,
    },
}
