use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use ai_bt::{realize_with, NodeRegistry, SubtreeResolver};
use ai_core::{NodeConfig, NodeId, ProjectConfig, ProjectId, TreeConfig, TreeId};

use crate::assembly::Assembly;
use crate::{AssemblyError, BuildError, BuilderSettings, BuiltProject, Cursor, NodeAdapter};

/// Project-scoped assembler.
///
/// Owns the node and tree registries of one assembly session. Nodes are attached through
/// [`Cursor`]s; the builder itself also acts as the default cursor, which sits at the first tree's
/// root once that tree exists. Assembly is single-threaded (the builder is `!Send`); the
/// [`BuiltProject`] returned by [`Builder::build`] is what gets shared.
///
/// ```
/// use ai_bt::{Log, Repeater, Sequence};
/// use ai_bt_builder::{options::property, Builder, NodeAdapter};
///
/// let builder = Builder::new();
/// let root = builder.attach_composite(NodeAdapter::from_kind(Sequence::kind()))?;
/// let repeat = root.attach_decorator(
///     NodeAdapter::from_kind(Repeater::kind()).with(property("maxLoop", 2)),
/// )?;
/// repeat.attach_leaf(NodeAdapter::from_kind(Log::kind()).with(property("info", "hi")))?;
///
/// let project = builder.build()?;
/// assert_eq!(project.entry().len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Builder {
    assembly: Rc<RefCell<Assembly>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::with_settings(BuilderSettings::default())
    }

    pub fn with_settings(settings: BuilderSettings) -> Self {
        Self {
            assembly: Rc::new(RefCell::new(Assembly::new(settings, NodeRegistry::new()))),
        }
    }

    pub fn settings(&self) -> BuilderSettings {
        self.assembly.borrow().settings.clone()
    }

    /// Kinds referenced by name that the realizer should use instead of the built-ins or the
    /// attached nodes' own behaviors.
    pub fn set_extensions(&mut self, extensions: NodeRegistry) {
        self.assembly.borrow_mut().extensions = extensions;
    }

    /// Discards every registry and starts a fresh project. Settings and extensions are kept.
    ///
    /// Cursors handed out before the reset point at nodes that no longer exist.
    pub fn reset(&mut self) {
        let mut assembly = self.assembly.borrow_mut();
        let settings = assembly.settings.clone();
        let extensions = assembly.extensions.clone();
        let old = assembly.project.clone();
        *assembly = Assembly::new(settings, extensions);
        tracing::debug!(old = %old, project = %assembly.project, "Reset builder");
    }

    /// The default cursor.
    pub fn cursor(&self) -> Cursor {
        let (tree, parent) = self.assembly.borrow().cursor.clone();
        Cursor::new(self.assembly.clone(), tree, parent)
    }

    /// A cursor at `parent` in `tree`.
    pub fn cursor_at(&self, tree: &TreeId, parent: &NodeId) -> Result<Cursor, AssemblyError> {
        let assembly = self.assembly.borrow();
        if assembly.tree(tree).is_none() {
            return Err(AssemblyError::UnknownTree(tree.clone()));
        }
        let owner = assembly
            .adapter(parent)
            .and_then(NodeAdapter::tree)
            .ok_or_else(|| AssemblyError::UnknownNode(parent.clone()))?;
        if owner != tree {
            return Err(AssemblyError::TreeMismatch {
                node: parent.clone(),
                expected: tree.clone(),
                actual: owner.clone(),
            });
        }
        Ok(Cursor::new(
            self.assembly.clone(),
            Some(tree.clone()),
            Some(parent.clone()),
        ))
    }

    /// Attaches `adapter` as a child of `parent` in `tree`.
    ///
    /// With neither tree nor parent, the node becomes the root of the project's first tree; once a
    /// tree exists that fails with [`AssemblyError::EmptyParent`].
    pub fn add_node(
        &self,
        tree: Option<&TreeId>,
        parent: Option<&NodeId>,
        adapter: NodeAdapter,
    ) -> Result<NodeId, AssemblyError> {
        self.assembly.borrow_mut().add_node(tree, parent, adapter)
    }

    /// Starts a new tree rooted at `adapter`. The project's first tree becomes its entry point.
    pub fn add_tree(&self, adapter: NodeAdapter) -> Result<TreeConfig, AssemblyError> {
        let mut assembly = self.assembly.borrow_mut();
        let (tree, _) = assembly.add_tree(adapter)?;
        assembly
            .tree(&tree)
            .cloned()
            .ok_or(AssemblyError::UnknownTree(tree))
    }

    pub fn attach_leaf(&self, adapter: NodeAdapter) -> Result<NodeId, AssemblyError> {
        self.cursor().attach_leaf(adapter)
    }

    pub fn attach_composite(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        self.cursor().attach_composite(adapter)
    }

    pub fn attach_decorator(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        self.cursor().attach_decorator(adapter)
    }

    pub fn attach_condition(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        self.cursor().attach_condition(adapter)
    }

    pub fn attach_subtree(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        self.cursor().attach_subtree(adapter)
    }

    pub fn attach_tree(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        self.cursor().attach_tree(adapter)
    }

    pub fn project_id(&self) -> ProjectId {
        self.assembly.borrow().project.clone()
    }

    /// Snapshot of the compiled project, trees in creation order.
    pub fn project(&self) -> ProjectConfig {
        self.assembly.borrow().project()
    }

    pub fn node_config(&self, id: &NodeId) -> Option<NodeConfig> {
        self.assembly.borrow().node_config(id).cloned()
    }

    pub fn tree_config(&self, id: &TreeId) -> Option<TreeConfig> {
        self.assembly.borrow().tree(id).cloned()
    }

    /// Children as tracked by the node's native side, in attachment order.
    pub fn adapter_children(&self, id: &NodeId) -> Option<Vec<NodeId>> {
        self.assembly.borrow().adapter(id).map(NodeAdapter::children)
    }

    pub fn node_count(&self) -> usize {
        self.assembly.borrow().node_count()
    }

    pub fn tree_count(&self) -> usize {
        self.assembly.borrow().trees().len()
    }

    /// Realizes every tree of the project and returns the selected one together with a resolver
    /// for all of them.
    ///
    /// All trees are realized before anything is returned; the first failure aborts the build.
    pub fn build(&self) -> Result<BuiltProject, BuildError> {
        let assembly = self.assembly.borrow();
        let entry_id = assembly.selected().cloned().ok_or(BuildError::EmptyProject)?;
        let registry = assembly.registry();
        let bound = assembly.bindings();

        let trees = assembly
            .trees()
            .iter()
            .map(|config| {
                realize_with(config, &registry, &bound)
                    .map(Arc::new)
                    .map_err(|source| BuildError::Realize {
                        tree: config.id.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let entry = trees
            .iter()
            .find(|tree| tree.id() == &entry_id)
            .cloned()
            .ok_or(BuildError::EmptyProject)?;
        let resolver = SubtreeResolver::new(trees);

        tracing::info!(
            project = %assembly.project,
            trees = resolver.len(),
            nodes = assembly.node_count(),
            entry = %entry_id,
            "Built project"
        );

        Ok(BuiltProject::new(assembly.project.clone(), entry, resolver))
    }
}
