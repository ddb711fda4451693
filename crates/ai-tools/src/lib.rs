//! Tooling primitives for behavior tree ticking.
//!
//! Events recorded here are plain data kept on the agent's blackboard, so tests and inspectors can
//! assert on what happened during a tick without installing a global subscriber.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink, TRACE_LOG, TRACE_SINK,
};
