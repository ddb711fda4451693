use std::collections::{HashMap, HashSet};
use std::fmt::{self, Write as _};
use std::sync::Arc;

use ai_core::{BbKey, Blackboard, NodeConfig, NodeId, TickContext, TreeConfig, TreeId};

use crate::bt::close;
use crate::{
    execute, Behavior, BtNode, BtStatus, NodeRegistry, RealizeError, SubtreeRef, SubtreeResolver,
    Tick,
};

/// Nodes left running by the previous tick, in the order they were entered.
const OPEN_NODES: BbKey<Vec<NodeId>> = BbKey::new("bt.open_nodes");
/// Nodes entered during the previous tick.
const NODE_COUNT: BbKey<usize> = BbKey::new("bt.node_count");

/// Behaviors bound to individual nodes, taking precedence over the registry's by-name lookup.
pub type Bindings = HashMap<NodeId, Arc<dyn Behavior>>;

/// An executable tree realized from a [`TreeConfig`].
pub struct BehaviorTree {
    config: TreeConfig,
    root: Arc<dyn BtNode>,
    nodes: HashMap<NodeId, Arc<dyn BtNode>>,
}

impl BehaviorTree {
    pub fn id(&self) -> &TreeId {
        &self.config.id
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn root(&self) -> &Arc<dyn BtNode> {
        &self.root
    }

    pub fn node(&self, id: &NodeId) -> Option<&Arc<dyn BtNode>> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ticks the tree once for the agent owning `blackboard`.
    ///
    /// Nodes that were running after the previous tick but were not reached this time are closed.
    pub fn tick(
        &self,
        ctx: TickContext,
        blackboard: &mut Blackboard,
        resolver: &SubtreeResolver,
    ) -> BtStatus {
        self.tick_at_depth(ctx, blackboard, resolver, 0)
    }

    pub(crate) fn tick_at_depth(
        &self,
        ctx: TickContext,
        blackboard: &mut Blackboard,
        resolver: &SubtreeResolver,
        depth: usize,
    ) -> BtStatus {
        let mut tick = Tick::new(ctx, self.id().clone(), blackboard, resolver, depth);
        let status = execute(self.root.as_ref(), &mut tick);

        let current = tick.take_open_nodes();
        let last = tick.tree_memory().remove(OPEN_NODES).unwrap_or_default();
        for id in last.iter().rev() {
            if current.contains(id) || !tick.is_open(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(id) {
                close(node.as_ref(), &mut tick);
            }
        }

        let count = tick.node_count();
        let memory = tick.tree_memory();
        memory.set(OPEN_NODES, current);
        memory.set(NODE_COUNT, count);
        status
    }

    /// Closes every node the previous tick left running, deepest first.
    pub fn halt(&self, ctx: TickContext, blackboard: &mut Blackboard, resolver: &SubtreeResolver) {
        self.halt_at_depth(ctx, blackboard, resolver, 0);
    }

    pub(crate) fn halt_at_depth(
        &self,
        ctx: TickContext,
        blackboard: &mut Blackboard,
        resolver: &SubtreeResolver,
        depth: usize,
    ) {
        let mut tick = Tick::new(ctx, self.id().clone(), blackboard, resolver, depth);
        let last = tick.tree_memory().remove(OPEN_NODES).unwrap_or_default();
        for id in last.iter().rev() {
            if !tick.is_open(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(id) {
                close(node.as_ref(), &mut tick);
            }
        }
    }

    /// Nodes still running after the agent's last tick of this tree.
    pub fn open_nodes(&self, blackboard: &Blackboard) -> Vec<NodeId> {
        blackboard
            .tree(self.id())
            .and_then(|memory| memory.get(OPEN_NODES))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of nodes entered during the agent's last tick of this tree.
    pub fn last_node_count(&self, blackboard: &Blackboard) -> usize {
        blackboard
            .tree(self.id())
            .and_then(|memory| memory.get(NODE_COUNT))
            .copied()
            .unwrap_or(0)
    }

    /// Indented, one-node-per-line rendering of the tree's structure.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_node(&self.config.root, 0, &mut out);
        out
    }

    fn outline_node(&self, id: &NodeId, indent: usize, out: &mut String) {
        let Some(node) = self.config.node(id) else {
            return;
        };
        let _ = write!(out, "{:width$}{} ({})", "", node.name, node.category, width = indent * 2);
        if !node.title.is_empty() && node.title != node.name {
            let _ = write!(out, " \"{}\"", node.title);
        }
        let _ = writeln!(out, " #{}", node.id);
        for child in node.links() {
            self.outline_node(child, indent + 1, out);
        }
    }
}

impl fmt::Debug for BehaviorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("id", self.id())
            .field("root", &self.config.root)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// Turns a compiled tree into an executable one, resolving every non-placeholder node's name
/// through `registry`.
///
/// Placeholder nodes become [`SubtreeRef`]s; the referenced tree is looked up at tick time. The
/// node map must form a tree below the root: every link must resolve, no node may have two parents,
/// and there must be no cycles. Nodes not reachable from the root are ignored.
pub fn realize(config: &TreeConfig, registry: &NodeRegistry) -> Result<BehaviorTree, RealizeError> {
    realize_with(config, registry, &Bindings::new())
}

/// Like [`realize`], but nodes listed in `bound` are instantiated from their own behavior instead
/// of the one registered under their name.
pub fn realize_with(
    config: &TreeConfig,
    registry: &NodeRegistry,
    bound: &Bindings,
) -> Result<BehaviorTree, RealizeError> {
    let root = config
        .node(&config.root)
        .ok_or_else(|| RealizeError::MissingRoot {
            tree: config.id.clone(),
            root: config.root.clone(),
        })?;

    let mut realizer = Realizer {
        config,
        registry,
        bound,
        visiting: HashSet::new(),
        realized: HashMap::new(),
    };
    let root = realizer.realize(root)?;

    tracing::debug!(
        tree = %config.id,
        nodes = realizer.realized.len(),
        bound = bound.len(),
        "Realized tree"
    );

    Ok(BehaviorTree {
        config: config.clone(),
        root,
        nodes: realizer.realized,
    })
}

struct Realizer<'a> {
    config: &'a TreeConfig,
    registry: &'a NodeRegistry,
    bound: &'a Bindings,
    visiting: HashSet<NodeId>,
    realized: HashMap<NodeId, Arc<dyn BtNode>>,
}

impl<'a> Realizer<'a> {
    fn realize(&mut self, node: &'a NodeConfig) -> Result<Arc<dyn BtNode>, RealizeError> {
        let id = &node.id;
        if self.visiting.contains(id) {
            return Err(RealizeError::Cycle { node: id.clone() });
        }
        if self.realized.contains_key(id) {
            return Err(RealizeError::SharedNode { node: id.clone() });
        }

        let config = self.config;
        self.visiting.insert(id.clone());
        let mut children = Vec::new();
        for link in node.links() {
            let child = config
                .node(link)
                .ok_or_else(|| RealizeError::MissingNode {
                    node: id.clone(),
                    missing: link.clone(),
                })?;
            children.push(self.realize(child)?);
        }
        self.visiting.remove(id);

        let realized = self.instantiate(node, children)?;
        self.realized.insert(id.clone(), realized.clone());
        Ok(realized)
    }

    fn instantiate(
        &self,
        node: &NodeConfig,
        children: Vec<Arc<dyn BtNode>>,
    ) -> Result<Arc<dyn BtNode>, RealizeError> {
        if let Some(target) = node.subtree_target() {
            return Ok(Arc::new(SubtreeRef::new(node.id.clone(), target)));
        }

        let behavior = self
            .bound
            .get(&node.id)
            .or_else(|| self.registry.get(&node.name))
            .ok_or_else(|| RealizeError::UnknownKind {
                node: node.id.clone(),
                name: node.name.clone(),
            })?;
        behavior.instantiate(node, children)
    }
}
