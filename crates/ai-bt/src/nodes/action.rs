use std::sync::Arc;

use ai_core::{BbKey, Category, NodeId, Value};

use super::{required_int, required_string, required_value, string_property};
use crate::{BtNode, BtStatus, Kind, Tick};

const ELAPSED: BbKey<i64> = BbKey::new("bt.elapsed");

macro_rules! constant_leaf {
    ($(#[$doc:meta])* $ty:ident => $status:expr) => {
        $(#[$doc])*
        pub struct $ty {
            id: NodeId,
        }

        impl $ty {
            pub fn new(id: NodeId) -> Self {
                Self { id }
            }

            pub fn kind() -> Kind {
                Kind::new(stringify!($ty), Category::Action, |config, _children| {
                    Ok(Arc::new(Self::new(config.id.clone())) as Arc<dyn BtNode>)
                })
            }
        }

        impl BtNode for $ty {
            fn id(&self) -> &NodeId {
                &self.id
            }

            fn tick(&self, _tick: &mut Tick<'_>) -> BtStatus {
                $status
            }
        }
    };
}

constant_leaf!(
    /// Always succeeds.
    Succeeder => BtStatus::Success
);
constant_leaf!(
    /// Always fails.
    Failer => BtStatus::Failure
);
constant_leaf!(
    /// Never finishes.
    Runner => BtStatus::Running
);

/// Reports `Running` until it has been ticked `ticks` times since it opened, then `Success`.
pub struct Wait {
    id: NodeId,
    ticks: i64,
}

impl Wait {
    pub fn new(id: NodeId, ticks: i64) -> Self {
        Self { id, ticks }
    }

    pub fn kind() -> Kind {
        Kind::new("Wait", Category::Action, |config, _children| {
            let ticks = required_int(config, "ticks")?;
            Ok(Arc::new(Self::new(config.id.clone(), ticks)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for Wait {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn open(&self, tick: &mut Tick<'_>) {
        tick.memory(&self.id).set(ELAPSED, 0);
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        let elapsed = tick.memory(&self.id).get(ELAPSED).copied().unwrap_or(0) + 1;
        tick.memory(&self.id).set(ELAPSED, elapsed);
        if elapsed >= self.ticks {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }
}

/// Logs its `info` property and succeeds.
pub struct Log {
    id: NodeId,
    info: String,
}

impl Log {
    pub fn new(id: NodeId, info: impl Into<String>) -> Self {
        Self {
            id,
            info: info.into(),
        }
    }

    pub fn kind() -> Kind {
        Kind::new("Log", Category::Action, |config, _children| {
            let info = string_property(config, "info")?.unwrap_or_default();
            Ok(Arc::new(Self::new(config.id.clone(), info)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for Log {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        tracing::info!(
            tree = %tick.tree_id(),
            node = %self.id,
            tick = tick.ctx.tick,
            info = %self.info,
            "Log"
        );
        tick.trace_detail("bt.log", &self.id, self.info.clone());
        BtStatus::Success
    }
}

/// Writes its `value` property into the global blackboard scope under `key`.
pub struct SetValue {
    id: NodeId,
    key: String,
    value: Value,
}

impl SetValue {
    pub fn new(id: NodeId, key: impl Into<String>, value: Value) -> Self {
        Self {
            id,
            key: key.into(),
            value,
        }
    }

    pub fn kind() -> Kind {
        Kind::new("SetValue", Category::Action, |config, _children| {
            let key = required_string(config, "key")?;
            let value = required_value(config, "value")?;
            Ok(Arc::new(Self::new(config.id.clone(), key, value)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for SetValue {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        tick.global_mut()
            .set_named(self.key.clone(), self.value.clone());
        BtStatus::Success
    }
}
