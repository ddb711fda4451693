//! Flat, id-addressed records describing a project of behavior trees.
//!
//! These are what the builder compiles to and what the realizer consumes. Child links are ids into
//! the owning tree's node map, never nested records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Category, NodeId, ProjectId, TreeId};

pub type Value = serde_json::Value;
pub type ValueMap = BTreeMap<String, Value>;

/// Compiled record for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: NodeId,
    /// Kind name used to look the behavior up at realization time. For placeholders this is the
    /// id of the referenced tree.
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: ValueMap,
    #[serde(default)]
    pub parameters: ValueMap,
    /// Ordered children, composites only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
    /// Single child, decorators only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<NodeId>,
}

impl NodeConfig {
    pub fn new(id: NodeId, name: impl Into<String>, category: Category) -> Self {
        Self {
            id,
            name: name.into(),
            title: String::new(),
            category,
            description: String::new(),
            properties: ValueMap::new(),
            parameters: ValueMap::new(),
            children: Vec::new(),
            child: None,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Child ids in traversal order, according to this node's category.
    pub fn links(&self) -> Vec<&NodeId> {
        match self.category {
            Category::Composite => self.children.iter().collect(),
            Category::Decorator => self.child.iter().collect(),
            Category::Action | Category::Condition | Category::Tree => Vec::new(),
        }
    }

    /// Target tree of a placeholder node.
    pub fn subtree_target(&self) -> Option<TreeId> {
        (self.category == Category::Tree).then(|| TreeId::from(self.name.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub id: TreeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub root: NodeId,
    #[serde(default)]
    pub properties: ValueMap,
    pub nodes: BTreeMap<NodeId, NodeConfig>,
}

impl TreeConfig {
    /// A tree holding a single root node.
    pub fn with_root(id: TreeId, root: NodeConfig) -> Self {
        let root_id = root.id.clone();
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id.clone(), root);
        Self {
            id,
            title: String::new(),
            description: String::new(),
            root: root_id,
            properties: ValueMap::new(),
            nodes,
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&NodeConfig> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut NodeConfig> {
        self.nodes.get_mut(id)
    }

    pub fn root_node(&self) -> Option<&NodeConfig> {
        self.nodes.get(&self.root)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Placeholder targets referenced from this tree, in node-id order.
    pub fn subtree_refs(&self) -> Vec<TreeId> {
        self.nodes
            .values()
            .filter_map(NodeConfig::subtree_target)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Entry-point tree.
    #[serde(default)]
    pub select: Option<TreeId>,
    /// Trees in creation order.
    #[serde(default)]
    pub trees: Vec<TreeConfig>,
}

fn default_scope() -> String {
    "tree".to_string()
}

impl ProjectConfig {
    pub fn new(id: ProjectId) -> Self {
        Self {
            id,
            title: None,
            scope: default_scope(),
            select: None,
            trees: Vec::new(),
        }
    }

    pub fn tree(&self, id: &TreeId) -> Option<&TreeConfig> {
        self.trees.iter().find(|t| &t.id == id)
    }

    pub fn tree_mut(&mut self, id: &TreeId) -> Option<&mut TreeConfig> {
        self.trees.iter_mut().find(|t| &t.id == id)
    }

    pub fn selected(&self) -> Option<&TreeConfig> {
        self.tree(self.select.as_ref()?)
    }

    pub fn tree_ids(&self) -> impl Iterator<Item = &TreeId> {
        self.trees.iter().map(|t| &t.id)
    }
}
