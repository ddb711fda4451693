//! Built-in node kinds.
//!
//! Each runtime node type exposes a `kind()` constructor returning the [`Kind`] it is registered
//! under; the registry name equals the type name.

mod action;
mod composite;
mod condition;
mod decorator;

use std::sync::Arc;

use ai_core::{NodeConfig, Value};

use crate::{BtNode, Kind, RealizeError};

pub use action::{Failer, Log, Runner, SetValue, Succeeder, Wait};
pub use composite::{MemPriority, MemSequence, Priority, Sequence};
pub use condition::IsValue;
pub use decorator::{Inverter, Limiter, MaxTicks, RepeatUntilFailure, RepeatUntilSuccess, Repeater};

/// Every built-in kind, in no particular order.
pub fn builtins() -> Vec<Kind> {
    vec![
        Sequence::kind(),
        Priority::kind(),
        MemSequence::kind(),
        MemPriority::kind(),
        Inverter::kind(),
        Repeater::kind(),
        RepeatUntilSuccess::kind(),
        RepeatUntilFailure::kind(),
        Limiter::kind(),
        MaxTicks::kind(),
        Succeeder::kind(),
        Failer::kind(),
        Runner::kind(),
        Wait::kind(),
        Log::kind(),
        SetValue::kind(),
        IsValue::kind(),
    ]
}

/// Integer property; floats with no fractional part are accepted (`2.0` reads as `2`).
pub(crate) fn int_property(config: &NodeConfig, key: &str) -> Result<Option<i64>, RealizeError> {
    let Some(value) = config.property(key) else {
        return Ok(None);
    };
    let int = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    });
    int.map(Some).ok_or_else(|| RealizeError::InvalidProperty {
        node: config.id.clone(),
        key: key.to_string(),
        expected: "an integer",
    })
}

pub(crate) fn required_int(config: &NodeConfig, key: &str) -> Result<i64, RealizeError> {
    int_property(config, key)?.ok_or_else(|| missing(config, key))
}

pub(crate) fn string_property(
    config: &NodeConfig,
    key: &str,
) -> Result<Option<String>, RealizeError> {
    match config.property(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(RealizeError::InvalidProperty {
            node: config.id.clone(),
            key: key.to_string(),
            expected: "a string",
        }),
    }
}

pub(crate) fn required_string(config: &NodeConfig, key: &str) -> Result<String, RealizeError> {
    string_property(config, key)?.ok_or_else(|| missing(config, key))
}

pub(crate) fn required_value(config: &NodeConfig, key: &str) -> Result<Value, RealizeError> {
    config.property(key).cloned().ok_or_else(|| missing(config, key))
}

fn missing(config: &NodeConfig, key: &str) -> RealizeError {
    RealizeError::MissingProperty {
        node: config.id.clone(),
        key: key.to_string(),
    }
}

pub(crate) fn single_child(
    config: &NodeConfig,
    children: Vec<Arc<dyn BtNode>>,
) -> Result<Arc<dyn BtNode>, RealizeError> {
    children
        .into_iter()
        .next()
        .ok_or_else(|| RealizeError::MissingChild {
            node: config.id.clone(),
        })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use ai_core::{Blackboard, Category, NodeConfig, NodeId, TickContext, TreeId};

    use crate::{execute, Behavior, BtNode, BtStatus, Kind, SubtreeResolver, Tick};

    pub const TREE: &str = "test-tree";

    pub fn config(id: &str, name: &str, category: Category) -> NodeConfig {
        NodeConfig::new(NodeId::from(id), name, category)
    }

    /// Leaf that returns the scripted statuses in order, then repeats the last one.
    pub fn scripted(id: &str, script: &[BtStatus]) -> Arc<dyn BtNode> {
        let script = script.to_vec();
        let kind = Kind::action("Scripted", move |config, tick| {
            let key = ai_core::BbKey::<usize>::new("scripted.calls");
            let calls = tick.memory(&config.id).get(key).copied().unwrap_or(0);
            tick.memory(&config.id).set(key, calls + 1);
            script[calls.min(script.len() - 1)]
        });
        kind.instantiate(&config(id, "Scripted", Category::Action), Vec::new())
            .unwrap()
    }

    pub fn calls(bb: &Blackboard, id: &str) -> usize {
        bb.node(&TreeId::from(TREE), &NodeId::from(id))
            .and_then(|mem| mem.get(ai_core::BbKey::<usize>::new("scripted.calls")))
            .copied()
            .unwrap_or(0)
    }

    pub fn run(node: &dyn BtNode, bb: &mut Blackboard, tick: u64) -> BtStatus {
        let resolver = SubtreeResolver::default();
        let mut t = Tick::new(
            TickContext::new(tick),
            TreeId::from(TREE),
            bb,
            &resolver,
            0,
        );
        execute(node, &mut t)
    }
}
