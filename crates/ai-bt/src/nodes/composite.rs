use std::sync::Arc;

use ai_core::{BbKey, Category, NodeId};

use crate::{execute, BtNode, BtStatus, Kind, Tick};

const RUNNING_CHILD: BbKey<usize> = BbKey::new("bt.running_child");

/// Ticks children in order every tick, stopping at the first one that does not succeed.
pub struct Sequence {
    id: NodeId,
    children: Vec<Arc<dyn BtNode>>,
}

impl Sequence {
    pub fn new(id: NodeId, children: Vec<Arc<dyn BtNode>>) -> Self {
        Self { id, children }
    }

    pub fn kind() -> Kind {
        Kind::new("Sequence", Category::Composite, |config, children| {
            Ok(Arc::new(Self::new(config.id.clone(), children)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for Sequence {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        for child in &self.children {
            let status = execute(child.as_ref(), tick);
            if status != BtStatus::Success {
                return status;
            }
        }
        BtStatus::Success
    }
}

/// Ticks children in order every tick, stopping at the first one that does not fail.
pub struct Priority {
    id: NodeId,
    children: Vec<Arc<dyn BtNode>>,
}

impl Priority {
    pub fn new(id: NodeId, children: Vec<Arc<dyn BtNode>>) -> Self {
        Self { id, children }
    }

    pub fn kind() -> Kind {
        Kind::new("Priority", Category::Composite, |config, children| {
            Ok(Arc::new(Self::new(config.id.clone(), children)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for Priority {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        for child in &self.children {
            let status = execute(child.as_ref(), tick);
            if status != BtStatus::Failure {
                return status;
            }
        }
        BtStatus::Failure
    }
}

/// Like [`Sequence`], but resumes at the child that was running instead of re-checking earlier
/// children.
pub struct MemSequence {
    id: NodeId,
    children: Vec<Arc<dyn BtNode>>,
}

impl MemSequence {
    pub fn new(id: NodeId, children: Vec<Arc<dyn BtNode>>) -> Self {
        Self { id, children }
    }

    pub fn kind() -> Kind {
        Kind::new("MemSequence", Category::Composite, |config, children| {
            Ok(Arc::new(Self::new(config.id.clone(), children)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for MemSequence {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn open(&self, tick: &mut Tick<'_>) {
        tick.memory(&self.id).set(RUNNING_CHILD, 0);
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        let start = tick.memory(&self.id).get(RUNNING_CHILD).copied().unwrap_or(0);
        for (i, child) in self.children.iter().enumerate().skip(start) {
            let status = execute(child.as_ref(), tick);
            if status != BtStatus::Success {
                if status == BtStatus::Running {
                    tick.memory(&self.id).set(RUNNING_CHILD, i);
                }
                return status;
            }
        }
        BtStatus::Success
    }
}

/// Like [`Priority`], but resumes at the child that was running.
pub struct MemPriority {
    id: NodeId,
    children: Vec<Arc<dyn BtNode>>,
}

impl MemPriority {
    pub fn new(id: NodeId, children: Vec<Arc<dyn BtNode>>) -> Self {
        Self { id, children }
    }

    pub fn kind() -> Kind {
        Kind::new("MemPriority", Category::Composite, |config, children| {
            Ok(Arc::new(Self::new(config.id.clone(), children)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for MemPriority {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn open(&self, tick: &mut Tick<'_>) {
        tick.memory(&self.id).set(RUNNING_CHILD, 0);
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        let start = tick.memory(&self.id).get(RUNNING_CHILD).copied().unwrap_or(0);
        for (i, child) in self.children.iter().enumerate().skip(start) {
            let status = execute(child.as_ref(), tick);
            if status != BtStatus::Failure {
                if status == BtStatus::Running {
                    tick.memory(&self.id).set(RUNNING_CHILD, i);
                }
                return status;
            }
        }
        BtStatus::Failure
    }
}
