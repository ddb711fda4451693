use ai_core::{BbKey, Blackboard, Memory, NodeId, TickContext, TreeId};
use ai_tools::{emit as trace_emit, TraceEvent};

use crate::SubtreeResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtStatus {
    Running,
    Success,
    Failure,
}

/// A realized node.
///
/// Nodes are shared between agents and ticked through `&self`; anything that must survive between
/// ticks goes into [`Tick::memory`]. Parents tick children through [`execute`], never by calling
/// `tick` directly, so that the open/close lifecycle stays consistent.
pub trait BtNode: Send + Sync + 'static {
    fn id(&self) -> &NodeId;

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus;

    /// Called on the first tick after the node was closed (or never opened).
    fn open(&self, _tick: &mut Tick<'_>) {}

    /// Called when the node finishes, or when a later tick no longer reaches it.
    fn close(&self, _tick: &mut Tick<'_>) {}
}

const IS_OPEN: BbKey<bool> = BbKey::new("bt.is_open");

/// State of one traversal of one tree.
pub struct Tick<'a> {
    pub ctx: TickContext,
    tree: TreeId,
    blackboard: &'a mut Blackboard,
    resolver: &'a SubtreeResolver,
    open_nodes: Vec<NodeId>,
    node_count: usize,
    depth: usize,
}

impl<'a> Tick<'a> {
    pub(crate) fn new(
        ctx: TickContext,
        tree: TreeId,
        blackboard: &'a mut Blackboard,
        resolver: &'a SubtreeResolver,
        depth: usize,
    ) -> Self {
        Self {
            ctx,
            tree,
            blackboard,
            resolver,
            open_nodes: Vec::new(),
            node_count: 0,
            depth,
        }
    }

    pub fn tree_id(&self) -> &TreeId {
        &self.tree
    }

    /// Subtree nesting level; 0 for the tree the caller ticked directly.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn resolver(&self) -> &'a SubtreeResolver {
        self.resolver
    }

    pub fn blackboard(&self) -> &Blackboard {
        &*self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut *self.blackboard
    }

    pub fn global_mut(&mut self) -> &mut Memory {
        self.blackboard.global_mut()
    }

    /// Memory private to `node` within the tree being ticked.
    pub fn memory(&mut self, node: &NodeId) -> &mut Memory {
        self.blackboard.node_mut(&self.tree, node)
    }

    pub fn tree_memory(&mut self) -> &mut Memory {
        self.blackboard.tree_mut(&self.tree)
    }

    /// Nodes entered so far during this traversal.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Records a trace event for `node` in the agent's trace log or sink, if either is installed.
    pub fn trace_detail(&mut self, tag: &'static str, node: &NodeId, detail: impl Into<String>) {
        let event = TraceEvent::new(self.ctx.tick, tag)
            .with_tree(&self.tree)
            .with_node(node)
            .with_detail(detail);
        trace_emit(&mut *self.blackboard, event);
    }

    pub(crate) fn take_open_nodes(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.open_nodes)
    }

    pub(crate) fn is_open(&self, node: &NodeId) -> bool {
        self.blackboard
            .node(&self.tree, node)
            .and_then(|mem| mem.get(IS_OPEN))
            .copied()
            .unwrap_or(false)
    }

    fn enter(&mut self, node: &NodeId) {
        self.open_nodes.push(node.clone());
        self.node_count += 1;
    }

    fn leave(&mut self, node: &NodeId) {
        if let Some(pos) = self.open_nodes.iter().rposition(|n| n == node) {
            self.open_nodes.remove(pos);
        }
    }
}

/// Tick `node` with the open/close lifecycle applied around it.
pub fn execute(node: &dyn BtNode, tick: &mut Tick<'_>) -> BtStatus {
    tick.enter(node.id());

    if !tick.is_open(node.id()) {
        tick.memory(node.id()).set(IS_OPEN, true);
        node.open(tick);
    }

    let status = node.tick(tick);

    if status != BtStatus::Running {
        close(node, tick);
    }

    status
}

pub(crate) fn close(node: &dyn BtNode, tick: &mut Tick<'_>) {
    tick.leave(node.id());
    tick.memory(node.id()).set(IS_OPEN, false);
    node.close(tick);
}
