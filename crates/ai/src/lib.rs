//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! `builder` assembles trees, `bt` realizes and ticks them, `core` holds the shared config records
//! and blackboard, and `tools` the trace events.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use ai_tools as tools;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use ai_bt as bt;

#[cfg(feature = "builder")]
#[cfg_attr(docsrs, doc(cfg(feature = "builder")))]
pub use ai_bt_builder as builder;

#[cfg(feature = "builder")]
#[cfg_attr(docsrs, doc(cfg(feature = "builder")))]
pub mod prelude {
    //! The names most assembly code needs.

    pub use ai_bt::{BehaviorTree, BtStatus, Kind, NodeRegistry};
    pub use ai_bt_builder::options::{
        category, description, parameter, parameters, properties, property, title,
    };
    pub use ai_bt_builder::{Builder, BuiltProject, Cursor, NodeAdapter};
    pub use ai_core::{Blackboard, TickContext};
}
