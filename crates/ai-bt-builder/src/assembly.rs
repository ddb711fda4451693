//! Registries and the category-dispatched attachment algorithm.

use std::collections::HashMap;
use std::sync::Arc;

use ai_bt::nodes::builtins;
use ai_bt::{Bindings, NodeRegistry};
use ai_core::{Category, NodeConfig, NodeId, ProjectConfig, ProjectId, TreeConfig, TreeId};

use crate::adapter::ChildSlot;
use crate::{compile, AssemblyError, BuilderSettings, DecoratorPolicy, NodeAdapter};

/// Where a validated attachment will land.
struct Target {
    tree: usize,
    parent: NodeId,
    slot: ChildSlot,
}

/// One assembly session's state.
pub(crate) struct Assembly {
    pub(crate) settings: BuilderSettings,
    pub(crate) project: ProjectId,
    pub(crate) extensions: NodeRegistry,
    adapters: HashMap<NodeId, NodeAdapter>,
    trees: Vec<TreeConfig>,
    tree_index: HashMap<TreeId, usize>,
    select: Option<TreeId>,
    /// Default cursor position: the first tree's root once it exists.
    pub(crate) cursor: (Option<TreeId>, Option<NodeId>),
}

impl Assembly {
    pub(crate) fn new(settings: BuilderSettings, extensions: NodeRegistry) -> Self {
        Self {
            settings,
            project: ProjectId::generate(),
            extensions,
            adapters: HashMap::new(),
            trees: Vec::new(),
            tree_index: HashMap::new(),
            select: None,
            cursor: (None, None),
        }
    }

    pub(crate) fn add_node(
        &mut self,
        tree: Option<&TreeId>,
        parent: Option<&NodeId>,
        adapter: NodeAdapter,
    ) -> Result<NodeId, AssemblyError> {
        let (tree, parent) = match (tree, parent) {
            (None, None) => {
                if !self.trees.is_empty() {
                    return Err(AssemblyError::EmptyParent);
                }
                return self.add_tree(adapter).map(|(_, root)| root);
            }
            (None, Some(_)) => return Err(AssemblyError::NoCurrentTree),
            (Some(tree), None) => {
                self.tree_position(tree)?;
                return Err(AssemblyError::EmptyParent);
            }
            (Some(tree), Some(parent)) => (tree, parent),
        };

        self.check_new(&adapter)?;
        let target = self.check_attach(tree, parent)?;
        self.insert(target, adapter)
    }

    /// Starts a new tree rooted at `adapter`. Returns the tree id and the root id.
    pub(crate) fn add_tree(
        &mut self,
        adapter: NodeAdapter,
    ) -> Result<(TreeId, NodeId), AssemblyError> {
        self.check_new(&adapter)?;
        Ok(self.create_tree(TreeId::generate(), adapter))
    }

    /// Materializes `adapter` as a new tree and leaves a placeholder for it under `parent`.
    ///
    /// Returns the new tree id and its root id. Everything is validated and the placeholder is
    /// linked before the tree is created, so a failed call changes nothing.
    pub(crate) fn add_subtree(
        &mut self,
        tree: Option<&TreeId>,
        parent: Option<&NodeId>,
        adapter: NodeAdapter,
    ) -> Result<(TreeId, NodeId), AssemblyError> {
        let (tree, parent) = match (tree, parent) {
            (Some(tree), Some(parent)) => (tree, parent),
            (None, _) => return Err(AssemblyError::NoCurrentTree),
            (Some(tree), None) => {
                self.tree_position(tree)?;
                return Err(AssemblyError::EmptyParent);
            }
        };

        self.check_new(&adapter)?;
        let target = self.check_attach(tree, parent)?;

        let subtree = TreeId::generate();
        let placeholder = self.insert(target, NodeAdapter::placeholder(subtree.clone()))?;
        let root = self.create_tree(subtree.clone(), adapter).1;

        tracing::debug!(
            tree = %tree,
            parent = %parent,
            placeholder = %placeholder,
            subtree = %subtree,
            "Attached subtree"
        );
        Ok((subtree, root))
    }

    /// Registers a validated root under `tree_id`. The tree takes its title, description and
    /// properties from the root.
    fn create_tree(&mut self, tree_id: TreeId, mut adapter: NodeAdapter) -> (TreeId, NodeId) {
        adapter.assign_tree(tree_id.clone());
        let root = compile(&adapter);
        let root_id = root.id.clone();

        let mut config = TreeConfig::with_root(tree_id.clone(), root);
        config.title = adapter.title().to_string();
        config.description = adapter.description().to_string();
        config.properties = adapter.properties().clone();

        let first = self.trees.is_empty();
        self.tree_index.insert(tree_id.clone(), self.trees.len());
        self.trees.push(config);
        self.adapters.insert(root_id.clone(), adapter);

        if first {
            self.select = Some(tree_id.clone());
            self.cursor = (Some(tree_id.clone()), Some(root_id.clone()));
        }

        tracing::debug!(
            tree = %tree_id,
            root = %root_id,
            selected = first,
            "Created tree"
        );
        (tree_id, root_id)
    }

    /// Checks a node that is about to be attached: its id is new, and only placeholders compile to
    /// the `tree` category.
    fn check_new(&self, adapter: &NodeAdapter) -> Result<(), AssemblyError> {
        if self.adapters.contains_key(adapter.id()) {
            return Err(AssemblyError::DuplicateNodeId(adapter.id().clone()));
        }
        let native = adapter.native().category();
        if (adapter.category() == Category::Tree) != (native == Category::Tree) {
            return Err(AssemblyError::CategoryMismatch {
                node: adapter.id().clone(),
                expected: adapter.category(),
                actual: native,
            });
        }
        Ok(())
    }

    fn tree_position(&self, tree: &TreeId) -> Result<usize, AssemblyError> {
        self.tree_index
            .get(tree)
            .copied()
            .ok_or_else(|| AssemblyError::UnknownTree(tree.clone()))
    }

    /// Validates attaching a new child under `parent` in `tree` without mutating anything.
    fn check_attach(&self, tree: &TreeId, parent: &NodeId) -> Result<Target, AssemblyError> {
        let position = self.tree_position(tree)?;
        let parent_adapter = self
            .adapters
            .get(parent)
            .ok_or_else(|| AssemblyError::UnknownNode(parent.clone()))?;
        match parent_adapter.tree() {
            Some(owner) if owner == tree => {}
            Some(owner) => {
                return Err(AssemblyError::TreeMismatch {
                    node: parent.clone(),
                    expected: tree.clone(),
                    actual: owner.clone(),
                })
            }
            None => return Err(AssemblyError::UnknownNode(parent.clone())),
        }

        let slot = parent_adapter.child_slot()?;
        if let ChildSlot::Set {
            current: Some(current),
        } = &slot
        {
            if self.settings.decorator_policy == DecoratorPolicy::Reject {
                return Err(AssemblyError::DecoratorOccupied {
                    decorator: parent.clone(),
                    child: current.clone(),
                });
            }
        }

        Ok(Target {
            tree: position,
            parent: parent.clone(),
            slot,
        })
    }

    /// Links `adapter` under the target's parent, then files its compiled record.
    ///
    /// The parent is linked first; if that fails nothing has changed.
    fn insert(&mut self, target: Target, mut adapter: NodeAdapter) -> Result<NodeId, AssemblyError> {
        let id = adapter.id().clone();
        let tree = &mut self.trees[target.tree];
        let parent_config = tree
            .nodes
            .get_mut(&target.parent)
            .ok_or_else(|| AssemblyError::UnknownNode(target.parent.clone()))?;
        let parent_adapter = self
            .adapters
            .get_mut(&target.parent)
            .ok_or_else(|| AssemblyError::UnknownNode(target.parent.clone()))?;

        match target.slot {
            ChildSlot::Append => {
                parent_adapter.add_child(id.clone())?;
                parent_config.children.push(id.clone());
            }
            ChildSlot::Set { .. } => {
                let displaced = parent_adapter.set_child(id.clone())?;
                parent_config.child = Some(id.clone());
                if let Some(displaced) = displaced {
                    tracing::warn!(
                        decorator = %target.parent,
                        displaced = %displaced,
                        child = %id,
                        "Replaced decorator child"
                    );
                }
            }
        }

        adapter.assign_tree(tree.id.clone());
        let config = compile(&adapter);
        let category = config.category;
        tree.nodes.insert(id.clone(), config);
        self.adapters.insert(id.clone(), adapter);

        tracing::debug!(
            tree = %tree.id,
            parent = %target.parent,
            node = %id,
            category = %category,
            "Attached node"
        );
        Ok(id)
    }

    pub(crate) fn project(&self) -> ProjectConfig {
        let mut project = ProjectConfig::new(self.project.clone());
        project.title = self.settings.project_title.clone();
        project.scope = self.settings.scope.clone();
        project.select = self.select.clone();
        project.trees = self.trees.clone();
        project
    }

    pub(crate) fn trees(&self) -> &[TreeConfig] {
        &self.trees
    }

    pub(crate) fn selected(&self) -> Option<&TreeId> {
        self.select.as_ref()
    }

    pub(crate) fn tree(&self, id: &TreeId) -> Option<&TreeConfig> {
        self.tree_index.get(id).map(|&i| &self.trees[i])
    }

    pub(crate) fn adapter(&self, id: &NodeId) -> Option<&NodeAdapter> {
        self.adapters.get(id)
    }

    pub(crate) fn node_config(&self, id: &NodeId) -> Option<&NodeConfig> {
        let tree = self.adapters.get(id)?.tree()?;
        self.tree(tree)?.node(id)
    }

    pub(crate) fn node_count(&self) -> usize {
        self.adapters.len()
    }

    /// Registry used to realize the project's trees: the extensions, then the built-in kinds.
    pub(crate) fn registry(&self) -> NodeRegistry {
        let mut registry = self.extensions.clone();
        for kind in builtins() {
            registry.register_if_absent(Arc::new(kind));
        }
        registry
    }

    /// Each attached node's own behavior, keyed by node id. Nodes whose name an extension claims are
    /// left out so the extension is used instead. Empty when binding is turned off.
    pub(crate) fn bindings(&self) -> Bindings {
        if !self.settings.bind_attached_behaviors {
            return Bindings::new();
        }
        self.adapters
            .iter()
            .filter(|(_, adapter)| !self.extensions.contains(adapter.name()))
            .filter_map(|(id, adapter)| Some((id.clone(), Arc::clone(adapter.native().behavior()?))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ai_bt::{BtStatus, Kind, Sequence, Succeeder};

    use super::*;

    fn assembly() -> Assembly {
        Assembly::new(BuilderSettings::default(), NodeRegistry::new())
    }

    #[test]
    fn failed_link_leaves_registries_untouched() {
        let mut assembly = assembly();
        let (tree, root) = assembly
            .add_tree(NodeAdapter::from_kind(Sequence::kind()))
            .unwrap();

        // A decorator slot on a composite parent cannot be linked.
        let target = Target {
            tree: 0,
            parent: root.clone(),
            slot: ChildSlot::Set { current: None },
        };
        let err = assembly
            .insert(target, NodeAdapter::from_kind(Succeeder::kind()))
            .unwrap_err();
        assert_eq!(
            err,
            AssemblyError::CategoryMismatch {
                node: root.clone(),
                expected: Category::Decorator,
                actual: Category::Composite,
            }
        );

        assert_eq!(assembly.node_count(), 1);
        assert_eq!(assembly.tree(&tree).map(TreeConfig::len), Some(1));
        let parent = assembly.node_config(&root).unwrap();
        assert!(parent.children.is_empty() && parent.child.is_none());
        assert!(assembly.adapter(&root).unwrap().children().is_empty());
    }

    #[test]
    fn bindings_skip_names_claimed_by_extensions() {
        let mut extensions = NodeRegistry::new();
        extensions.register(Arc::new(Kind::action("Jump", |_, _| BtStatus::Failure)));
        let mut assembly = Assembly::new(BuilderSettings::default(), extensions);

        let (_, root) = assembly
            .add_tree(NodeAdapter::from_kind(Sequence::kind()))
            .unwrap();
        let tree = assembly.adapter(&root).unwrap().tree().cloned();
        let jump = assembly
            .add_node(
                tree.as_ref(),
                Some(&root),
                NodeAdapter::from_kind(Kind::action("Jump", |_, _| BtStatus::Success)),
            )
            .unwrap();

        let bound = assembly.bindings();
        assert_eq!(bound.len(), 1);
        assert!(bound.contains_key(&root));
        assert!(!bound.contains_key(&jump));

        assembly.settings.bind_attached_behaviors = false;
        assert!(assembly.bindings().is_empty());
    }
}
