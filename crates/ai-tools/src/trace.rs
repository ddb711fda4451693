#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use ai_core::{BbKey, Blackboard, NodeId, TreeId};

/// A small trace event recorded while ticking.
///
/// This is intentionally "dumb data" so it can be recorded during a tick and later rendered or
/// asserted on by tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    pub tree: Option<TreeId>,
    pub node: Option<NodeId>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            tree: None,
            node: None,
            detail: None,
        }
    }

    pub fn with_tree(mut self, tree: &TreeId) -> Self {
        self.tree = Some(tree.clone());
        self
    }

    pub fn with_node(mut self, node: &NodeId) -> Self {
        self.node = Some(node.clone());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }
}

/// Blackboard key (global scope) for collecting events in-memory.
pub const TRACE_LOG: BbKey<TraceLog> = BbKey::new("ai_tools.trace.log");
/// Blackboard key (global scope) for streaming events into a user-provided sink.
pub const TRACE_SINK: BbKey<Box<dyn TraceSink + Send>> = BbKey::new("ai_tools.trace.sink");

pub fn emit(blackboard: &mut Blackboard, event: TraceEvent) {
    tracing::trace!(tick = event.tick, tag = %event.tag, "trace event");
    let global = blackboard.global_mut();
    if let Some(log) = global.get_mut(TRACE_LOG) {
        log.push(event.clone());
    }
    if let Some(sink) = global.get_mut(TRACE_SINK) {
        sink.emit(event);
    }
}
