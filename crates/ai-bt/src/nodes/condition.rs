use std::sync::Arc;

use ai_core::{Category, NodeId, Value};

use super::{required_string, required_value};
use crate::{BtNode, BtStatus, Kind, Tick};

/// Succeeds when the global blackboard value under `key` equals the `value` property.
///
/// A missing key fails. The key must hold a [`Value`] (as written by
/// [`SetValue`](crate::SetValue)); any other stored type is a blackboard type mismatch.
pub struct IsValue {
    id: NodeId,
    key: String,
    value: Value,
}

impl IsValue {
    pub fn new(id: NodeId, key: impl Into<String>, value: Value) -> Self {
        Self {
            id,
            key: key.into(),
            value,
        }
    }

    pub fn kind() -> Kind {
        Kind::new("IsValue", Category::Condition, |config, _children| {
            let key = required_string(config, "key")?;
            let value = required_value(config, "value")?;
            Ok(Arc::new(Self::new(config.id.clone(), key, value)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for IsValue {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        let current = tick.blackboard().global().get_named::<Value>(&self.key);
        if current == Some(&self.value) {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }
}
