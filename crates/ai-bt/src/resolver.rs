use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ai_core::TreeId;

use crate::BehaviorTree;

/// Immutable snapshot of the realized trees a project's subtree placeholders may refer to.
///
/// Passed explicitly into every tick; there is no process-wide loader. Cloning shares the snapshot,
/// so a resolver can be handed to any number of threads.
#[derive(Clone, Default)]
pub struct SubtreeResolver {
    trees: Arc<HashMap<TreeId, Arc<BehaviorTree>>>,
}

impl SubtreeResolver {
    pub fn new(trees: impl IntoIterator<Item = Arc<BehaviorTree>>) -> Self {
        let trees = trees
            .into_iter()
            .map(|tree| (tree.id().clone(), tree))
            .collect();
        Self {
            trees: Arc::new(trees),
        }
    }

    /// The realized tree with id `id`, if the snapshot has one.
    pub fn resolve(&self, id: &TreeId) -> Option<&Arc<BehaviorTree>> {
        let tree = self.trees.get(id);
        tracing::debug!(tree = %id, found = tree.is_some(), "Resolving subtree");
        tree
    }

    pub fn contains(&self, id: &TreeId) -> bool {
        self.trees.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &TreeId> {
        self.trees.keys()
    }
}

impl fmt::Debug for SubtreeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.trees.keys()).finish()
    }
}
