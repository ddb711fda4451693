//! Fluent assembler for behavior trees.
//!
//! Native nodes are wrapped in [`NodeAdapter`]s and attached through [`Cursor`]s. Every attachment
//! is compiled on the spot into a flat [`ai_core::NodeConfig`] and filed under its tree; subtrees
//! become trees of their own, referenced from their parent through a placeholder node.
//! [`Builder::build`] realizes all trees and returns a [`BuiltProject`] ready to tick.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod adapter;
mod assembly;
pub mod builder;
pub mod compile;
pub mod cursor;
pub mod error;
pub mod options;
pub mod project;
pub mod settings;

pub use adapter::{adapt, Native, NodeAdapter};
pub use builder::Builder;
pub use compile::compile;
pub use cursor::Cursor;
pub use error::{AssemblyError, BuildError};
pub use options::NodeOption;
pub use project::BuiltProject;
pub use settings::{BuilderSettings, DecoratorPolicy};
