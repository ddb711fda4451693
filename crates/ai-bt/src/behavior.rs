use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ai_core::{Category, NodeConfig, NodeId};

use crate::{BtNode, BtStatus, RealizeError, Tick};

/// A node kind as seen by the assembler and the realizer.
///
/// The assembler wraps one of these per attached node and calls [`Behavior::initialize`] once,
/// when the node is compiled. The realizer later calls [`Behavior::instantiate`] with the compiled
/// record and the already-realized children (in link order).
pub trait Behavior: Send + Sync + 'static {
    /// Registration name. Must match the name the realizer looks up.
    fn name(&self) -> &str;

    fn category(&self) -> Category;

    fn initialize(&self) {}

    fn instantiate(
        &self,
        config: &NodeConfig,
        children: Vec<Arc<dyn BtNode>>,
    ) -> Result<Arc<dyn BtNode>, RealizeError>;
}

type Make = dyn Fn(&NodeConfig, Vec<Arc<dyn BtNode>>) -> Result<Arc<dyn BtNode>, RealizeError>
    + Send
    + Sync;

/// A [`Behavior`] assembled from a name, a category and a constructor closure.
///
/// All built-in node kinds are `Kind`s; user code can create its own with [`Kind::new`], or with
/// the [`Kind::action`] / [`Kind::condition`] shortcuts for leaves backed by a closure.
pub struct Kind {
    name: Cow<'static, str>,
    category: Category,
    make: Box<Make>,
    init: Option<Box<dyn Fn() + Send + Sync>>,
}

impl Kind {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        category: Category,
        make: impl Fn(&NodeConfig, Vec<Arc<dyn BtNode>>) -> Result<Arc<dyn BtNode>, RealizeError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            make: Box::new(make),
            init: None,
        }
    }

    /// Leaf action that runs `f` on every tick.
    pub fn action(
        name: impl Into<Cow<'static, str>>,
        f: impl Fn(&NodeConfig, &mut Tick<'_>) -> BtStatus + Send + Sync + 'static,
    ) -> Self {
        let f: Arc<LeafFn> = Arc::new(f);
        Self::new(name, Category::Action, move |config, _children| {
            Ok(Arc::new(FnLeaf {
                config: config.clone(),
                f: f.clone(),
            }) as Arc<dyn BtNode>)
        })
    }

    /// Leaf condition: `Success` when `f` returns true, `Failure` otherwise.
    pub fn condition(
        name: impl Into<Cow<'static, str>>,
        f: impl Fn(&NodeConfig, &mut Tick<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        let f = Arc::new(f);
        let leaf: Arc<LeafFn> = Arc::new(move |config: &NodeConfig, tick: &mut Tick<'_>| {
            if f(config, tick) {
                BtStatus::Success
            } else {
                BtStatus::Failure
            }
        });
        Self::new(name, Category::Condition, move |config, _children| {
            Ok(Arc::new(FnLeaf {
                config: config.clone(),
                f: leaf.clone(),
            }) as Arc<dyn BtNode>)
        })
    }

    /// Hook run by [`Behavior::initialize`].
    pub fn on_initialize(mut self, init: impl Fn() + Send + Sync + 'static) -> Self {
        self.init = Some(Box::new(init));
        self
    }
}

impl Behavior for Kind {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Category {
        self.category
    }

    fn initialize(&self) {
        if let Some(init) = self.init.as_ref() {
            init();
        }
    }

    fn instantiate(
        &self,
        config: &NodeConfig,
        children: Vec<Arc<dyn BtNode>>,
    ) -> Result<Arc<dyn BtNode>, RealizeError> {
        (self.make)(config, children)
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kind")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

type LeafFn = dyn Fn(&NodeConfig, &mut Tick<'_>) -> BtStatus + Send + Sync;

struct FnLeaf {
    config: NodeConfig,
    f: Arc<LeafFn>,
}

impl BtNode for FnLeaf {
    fn id(&self) -> &NodeId {
        &self.config.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        (self.f)(&self.config, tick)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ai_core::Blackboard;

    use super::*;
    use crate::nodes::testing::{config, run};

    #[test]
    fn condition_maps_bool_to_status() {
        let kind = Kind::condition("HasKey", |_, tick| tick.blackboard().global().len() > 0);
        assert_eq!(kind.category(), Category::Condition);

        let node = kind
            .instantiate(&config("c", "HasKey", Category::Condition), Vec::new())
            .unwrap();
        let mut bb = Blackboard::new();
        assert_eq!(run(node.as_ref(), &mut bb, 0), BtStatus::Failure);

        bb.global_mut().set_named("anything", 1u8);
        assert_eq!(run(node.as_ref(), &mut bb, 1), BtStatus::Success);
    }

    #[test]
    fn action_sees_its_own_config() {
        let kind = Kind::action("Echo", |config, _| {
            if config.property("ok").is_some() {
                BtStatus::Success
            } else {
                BtStatus::Failure
            }
        });
        let mut with = config("a", "Echo", Category::Action);
        with.properties.insert("ok".into(), true.into());

        let mut bb = Blackboard::new();
        let node = kind.instantiate(&with, Vec::new()).unwrap();
        assert_eq!(run(node.as_ref(), &mut bb, 0), BtStatus::Success);
        assert_eq!(node.id(), &NodeId::from("a"));
    }

    #[test]
    fn initialize_hook_is_optional() {
        let plain = Kind::action("Plain", |_, _| BtStatus::Success);
        plain.initialize();

        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let hooked = Kind::action("Hooked", |_, _| BtStatus::Success).on_initialize(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        hooked.initialize();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(format!("{hooked:?}"), "Kind { name: \"Hooked\", category: Action, .. }");
    }
}
