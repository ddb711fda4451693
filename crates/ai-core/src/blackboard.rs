use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::{NodeId, TreeId};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// One typed key/value scope.
///
/// Typed access goes through `BbKey<T>`; the `*_named` variants exist for keys that only become
/// known at runtime (e.g. read from a node's properties).
#[derive(Default)]
pub struct Memory {
    values: BTreeMap<Cow<'static, str>, Box<dyn Any + Send>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.values.contains_key(key.name)
    }

    pub fn set<T: Send + 'static>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(Cow::Borrowed(key.name), Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        self.get_named(key.name)
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        self.get_named_mut(key.name)
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let value = self.values.remove(key.name)?;
        value.downcast::<T>().map(|b| *b).ok().or_else(|| {
            panic!(
                "blackboard type mismatch for key {:?} (stored type differs from requested)",
                key.name
            )
        })
    }

    pub fn set_named<T: Send + 'static>(&mut self, name: impl Into<Cow<'static, str>>, value: T) {
        self.values.insert(name.into(), Box::new(value));
    }

    pub fn get_named<T: 'static>(&self, name: &str) -> Option<&T> {
        let value = self.values.get(name)?;
        value.downcast_ref::<T>().or_else(|| {
            panic!(
                "blackboard type mismatch for key {:?} (stored type differs from requested)",
                name
            )
        })
    }

    pub fn get_named_mut<T: 'static>(&mut self, name: &str) -> Option<&mut T> {
        let value = self.values.get_mut(name)?;
        value.downcast_mut::<T>().or_else(|| {
            panic!(
                "blackboard type mismatch for key {:?} (stored type differs from requested)",
                name
            )
        })
    }
}

#[derive(Default)]
struct TreeScope {
    memory: Memory,
    nodes: BTreeMap<NodeId, Memory>,
}

/// Per-agent memory, scoped three ways: global, per tree, and per node within a tree.
///
/// Realized trees are stateless and shared between agents; everything a node remembers between
/// ticks lives here.
#[derive(Default)]
pub struct Blackboard {
    global: Memory,
    trees: BTreeMap<TreeId, TreeScope>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.global.clear();
        self.trees.clear();
    }

    pub fn global(&self) -> &Memory {
        &self.global
    }

    pub fn global_mut(&mut self) -> &mut Memory {
        &mut self.global
    }

    pub fn tree(&self, tree: &TreeId) -> Option<&Memory> {
        self.trees.get(tree).map(|scope| &scope.memory)
    }

    pub fn tree_mut(&mut self, tree: &TreeId) -> &mut Memory {
        &mut self.trees.entry(tree.clone()).or_default().memory
    }

    pub fn node(&self, tree: &TreeId, node: &NodeId) -> Option<&Memory> {
        self.trees.get(tree)?.nodes.get(node)
    }

    pub fn node_mut(&mut self, tree: &TreeId, node: &NodeId) -> &mut Memory {
        self.trees
            .entry(tree.clone())
            .or_default()
            .nodes
            .entry(node.clone())
            .or_default()
    }

    /// Forget everything stored for one tree (its own scope and all of its nodes).
    pub fn clear_tree(&mut self, tree: &TreeId) {
        self.trees.remove(tree);
    }
}
