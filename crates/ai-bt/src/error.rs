use ai_core::{NodeId, TreeId};

/// Why a tree config could not be turned into an executable tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RealizeError {
    #[error("tree {tree}: root node {root} is not in the node map")]
    MissingRoot { tree: TreeId, root: NodeId },

    #[error("node {node} links to {missing}, which is not in the node map")]
    MissingNode { node: NodeId, missing: NodeId },

    #[error("node {node} is reachable from itself")]
    Cycle { node: NodeId },

    #[error("node {node} is linked from more than one parent")]
    SharedNode { node: NodeId },

    #[error("node {node}: no behavior registered under {name:?}")]
    UnknownKind { node: NodeId, name: String },

    #[error("decorator {node} has no child")]
    MissingChild { node: NodeId },

    #[error("node {node}: property {key:?} is required")]
    MissingProperty { node: NodeId, key: String },

    #[error("node {node}: property {key:?} must be {expected}")]
    InvalidProperty {
        node: NodeId,
        key: String,
        expected: &'static str,
    },
}
