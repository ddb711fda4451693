//! Behavior Tree runtime built on `ai-core`.
//!
//! Trees are realized from flat [`ai_core::TreeConfig`] records through a [`NodeRegistry`] of
//! named [`Behavior`] kinds. Realized trees are immutable and keep no per-agent state, so one
//! [`BehaviorTree`] can be ticked by many agents at once, each with its own blackboard.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod bt;
pub mod error;
pub mod nodes;
pub mod registry;
pub mod resolver;
pub mod subtree;
pub mod tree;

pub use behavior::{Behavior, Kind};
pub use bt::{execute, BtNode, BtStatus, Tick};
pub use error::RealizeError;
pub use nodes::{
    Failer, Inverter, IsValue, Limiter, Log, MaxTicks, MemPriority, MemSequence, Priority,
    RepeatUntilFailure, RepeatUntilSuccess, Repeater, Runner, Sequence, SetValue, Succeeder, Wait,
};
pub use registry::NodeRegistry;
pub use resolver::SubtreeResolver;
pub use subtree::{SubtreeRef, MAX_SUBTREE_DEPTH};
pub use tree::{realize, realize_with, BehaviorTree, Bindings};
