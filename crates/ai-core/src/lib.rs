//! Shared vocabulary for behavior tree assembly and execution.
//!
//! Everything here is plain data: ids, node categories, the flat config records produced by the
//! builder, and the scoped blackboard the engine ticks against.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod category;
pub mod config;
pub mod id;
pub mod tick;

pub use blackboard::{BbKey, Blackboard, Memory};
pub use category::Category;
pub use config::{NodeConfig, ProjectConfig, TreeConfig, Value, ValueMap};
pub use id::{NodeId, ProjectId, TreeId};
pub use tick::TickContext;
