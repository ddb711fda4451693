use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ai_core::{Category, NodeId, TreeId};

use crate::assembly::Assembly;
use crate::{AssemblyError, NodeAdapter};

/// Fluent attachment handle: a (tree, parent) position in one builder's project.
///
/// Cursors are cheap to clone and never move; attaching a composite, decorator or condition hands
/// back a new cursor positioned at the attached node.
#[derive(Clone)]
pub struct Cursor {
    assembly: Rc<RefCell<Assembly>>,
    tree: Option<TreeId>,
    parent: Option<NodeId>,
}

impl Cursor {
    pub(crate) fn new(
        assembly: Rc<RefCell<Assembly>>,
        tree: Option<TreeId>,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            assembly,
            tree,
            parent,
        }
    }

    fn at(&self, tree: TreeId, parent: NodeId) -> Self {
        Self::new(self.assembly.clone(), Some(tree), Some(parent))
    }

    pub fn tree(&self) -> Option<&TreeId> {
        self.tree.as_ref()
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    /// Attaches an action or condition. Leaves take no children, so no cursor is returned.
    pub fn attach_leaf(&self, adapter: NodeAdapter) -> Result<NodeId, AssemblyError> {
        expect_category(&adapter, &[Category::Action, Category::Condition])?;
        self.add(adapter)
    }

    pub fn attach_composite(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        expect_category(&adapter, &[Category::Composite])?;
        self.add_and_descend(adapter)
    }

    pub fn attach_decorator(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        expect_category(&adapter, &[Category::Decorator])?;
        self.add_and_descend(adapter)
    }

    /// Attaches a condition and returns a cursor at it. Attaching through that cursor fails with
    /// [`AssemblyError::LeafWithChildren`].
    pub fn attach_condition(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        expect_category(&adapter, &[Category::Condition])?;
        self.add_and_descend(adapter)
    }

    /// Turns `adapter` into the root of a new tree and leaves a placeholder for that tree under
    /// this cursor's parent. Returns a cursor at the new tree's root.
    pub fn attach_subtree(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        let (tree, root) = self.assembly.borrow_mut().add_subtree(
            self.tree.as_ref(),
            self.parent.as_ref(),
            adapter,
        )?;
        Ok(self.at(tree, root))
    }

    /// Starts a new tree rooted at `adapter`, independent of this cursor's position.
    pub fn attach_tree(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        let (tree, root) = self.assembly.borrow_mut().add_tree(adapter)?;
        Ok(self.at(tree, root))
    }

    fn add(&self, adapter: NodeAdapter) -> Result<NodeId, AssemblyError> {
        self.assembly
            .borrow_mut()
            .add_node(self.tree.as_ref(), self.parent.as_ref(), adapter)
    }

    fn add_and_descend(&self, adapter: NodeAdapter) -> Result<Cursor, AssemblyError> {
        let id = self.add(adapter)?;
        let tree = self
            .assembly
            .borrow()
            .adapter(&id)
            .and_then(|adapter| adapter.tree().cloned())
            .ok_or_else(|| AssemblyError::UnknownNode(id.clone()))?;
        Ok(self.at(tree, id))
    }
}

fn expect_category(adapter: &NodeAdapter, allowed: &[Category]) -> Result<(), AssemblyError> {
    if allowed.contains(&adapter.category()) {
        return Ok(());
    }
    Err(AssemblyError::CategoryMismatch {
        node: adapter.id().clone(),
        expected: allowed[0],
        actual: adapter.category(),
    })
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("tree", &self.tree)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}
