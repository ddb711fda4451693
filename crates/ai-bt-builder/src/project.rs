use std::sync::Arc;

use ai_bt::{BehaviorTree, BtStatus, SubtreeResolver};
use ai_core::{Blackboard, ProjectId, TickContext, TreeId};

/// Output of [`Builder::build`](crate::Builder::build): the entry tree plus the resolver for every
/// tree of the project.
///
/// Cheap to clone and safe to share between threads; each agent ticks with its own blackboard.
#[derive(Debug, Clone)]
pub struct BuiltProject {
    id: ProjectId,
    entry: Arc<BehaviorTree>,
    resolver: SubtreeResolver,
}

impl BuiltProject {
    pub(crate) fn new(id: ProjectId, entry: Arc<BehaviorTree>, resolver: SubtreeResolver) -> Self {
        Self {
            id,
            entry,
            resolver,
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    /// The selected tree.
    pub fn entry(&self) -> &Arc<BehaviorTree> {
        &self.entry
    }

    pub fn resolver(&self) -> &SubtreeResolver {
        &self.resolver
    }

    pub fn tree(&self, id: &TreeId) -> Option<&Arc<BehaviorTree>> {
        self.resolver.resolve(id)
    }

    /// Ticks the entry tree once for the agent owning `blackboard`.
    pub fn tick(&self, ctx: TickContext, blackboard: &mut Blackboard) -> BtStatus {
        self.entry.tick(ctx, blackboard, &self.resolver)
    }

    /// Closes whatever the agent's last tick left running.
    pub fn halt(&self, ctx: TickContext, blackboard: &mut Blackboard) {
        self.entry.halt(ctx, blackboard, &self.resolver);
    }
}
