use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::nodes::builtins;
use crate::Behavior;

/// Named node kinds available to the realizer.
///
/// Cloning is cheap; behaviors are shared.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    kinds: BTreeMap<String, Arc<dyn Behavior>>,
}

impl NodeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in builtins() {
            registry.register(Arc::new(kind));
        }
        registry
    }

    /// Registers `behavior` under its name, replacing any previous entry. Returns the replaced
    /// behavior.
    pub fn register(&mut self, behavior: Arc<dyn Behavior>) -> Option<Arc<dyn Behavior>> {
        self.kinds.insert(behavior.name().to_string(), behavior)
    }

    /// Registers `behavior` unless its name is taken. Returns whether it was added.
    pub fn register_if_absent(&mut self, behavior: Arc<dyn Behavior>) -> bool {
        let name = behavior.name();
        if self.kinds.contains_key(name) {
            return false;
        }
        self.kinds.insert(name.to_string(), behavior);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Behavior>> {
        self.kinds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Copies every entry of `other` in, replacing same-named kinds.
    pub fn extend(&mut self, other: &NodeRegistry) {
        for (name, behavior) in &other.kinds {
            self.kinds.insert(name.clone(), behavior.clone());
        }
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use ai_core::Category;

    use super::*;
    use crate::{BtStatus, Kind};

    #[test]
    fn defaults_cover_builtins() {
        let registry = NodeRegistry::with_defaults();
        for name in ["Sequence", "MemPriority", "Repeater", "Log", "IsValue"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(
            registry.get("Inverter").map(|b| b.category()),
            Some(Category::Decorator)
        );
    }

    #[test]
    fn register_replaces_and_if_absent_keeps() {
        let mut registry = NodeRegistry::with_defaults();
        let before = registry.len();

        let custom = Arc::new(Kind::action("Log", |_, _| BtStatus::Failure));
        assert!(registry.register(custom).is_some());
        assert_eq!(registry.len(), before);

        let again = Arc::new(Kind::action("Log", |_, _| BtStatus::Success));
        assert!(!registry.register_if_absent(again));

        let fresh = Arc::new(Kind::action("Jump", |_, _| BtStatus::Success));
        assert!(registry.register_if_absent(fresh));
        assert_eq!(registry.len(), before + 1);
    }

    #[test]
    fn extend_merges() {
        let mut a = NodeRegistry::new();
        let mut b = NodeRegistry::new();
        b.register(Arc::new(Kind::action("Jump", |_, _| BtStatus::Success)));
        a.extend(&b);
        assert_eq!(a.names().collect::<Vec<_>>(), vec!["Jump"]);
    }
}
