use ai_core::{NodeId, TreeId};

use crate::{BtNode, BtStatus, Tick};

/// Deepest subtree nesting a tick will follow before failing the placeholder.
pub const MAX_SUBTREE_DEPTH: usize = 64;

/// Placeholder node standing in for another tree of the same project.
///
/// The target is looked up through the tick's [`SubtreeResolver`](crate::SubtreeResolver) every
/// time the node is ticked and then ticked in place, sharing the agent's blackboard. An unknown
/// target, or nesting deeper than [`MAX_SUBTREE_DEPTH`], fails the placeholder.
#[derive(Debug)]
pub struct SubtreeRef {
    id: NodeId,
    target: TreeId,
}

impl SubtreeRef {
    pub fn new(id: NodeId, target: TreeId) -> Self {
        Self { id, target }
    }

    pub fn target(&self) -> &TreeId {
        &self.target
    }
}

impl BtNode for SubtreeRef {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        let depth = tick.depth() + 1;
        if depth > MAX_SUBTREE_DEPTH {
            tracing::warn!(
                tree = %tick.tree_id(),
                node = %self.id,
                target = %self.target,
                depth,
                "Subtree nesting too deep"
            );
            tick.trace_detail("bt.subtree.depth_exceeded", &self.id, self.target.to_string());
            return BtStatus::Failure;
        }

        let resolver = tick.resolver();
        let Some(tree) = resolver.resolve(&self.target) else {
            tracing::warn!(
                tree = %tick.tree_id(),
                node = %self.id,
                target = %self.target,
                "Subtree not found"
            );
            tick.trace_detail("bt.subtree.unresolved", &self.id, self.target.to_string());
            return BtStatus::Failure;
        };

        let ctx = tick.ctx;
        tree.tick_at_depth(ctx, tick.blackboard_mut(), resolver, depth)
    }

    fn close(&self, tick: &mut Tick<'_>) {
        let resolver = tick.resolver();
        if let Some(tree) = resolver.resolve(&self.target) {
            let ctx = tick.ctx;
            let depth = tick.depth() + 1;
            tree.halt_at_depth(ctx, tick.blackboard_mut(), resolver, depth);
        }
    }
}
