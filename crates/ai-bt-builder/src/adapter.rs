use std::fmt;
use std::sync::Arc;

use ai_bt::{Behavior, Kind};
use ai_core::{Category, NodeId, TreeId, ValueMap};

use crate::options::NodeOption;
use crate::AssemblyError;

/// The wrapped native node, tagged by its intrinsic category.
///
/// Only the composite and decorator variants can take children.
#[derive(Clone)]
pub enum Native {
    Action(Arc<dyn Behavior>),
    Condition(Arc<dyn Behavior>),
    Composite {
        behavior: Arc<dyn Behavior>,
        children: Vec<NodeId>,
    },
    Decorator {
        behavior: Arc<dyn Behavior>,
        child: Option<NodeId>,
    },
    Placeholder {
        target: TreeId,
    },
}

impl Native {
    fn new(behavior: Arc<dyn Behavior>) -> Self {
        match behavior.category() {
            Category::Action => Self::Action(behavior),
            Category::Condition => Self::Condition(behavior),
            Category::Composite => Self::Composite {
                behavior,
                children: Vec::new(),
            },
            Category::Decorator => Self::Decorator {
                behavior,
                child: None,
            },
            Category::Tree => Self::Placeholder {
                target: TreeId::from(behavior.name()),
            },
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Action(_) => Category::Action,
            Self::Condition(_) => Category::Condition,
            Self::Composite { .. } => Category::Composite,
            Self::Decorator { .. } => Category::Decorator,
            Self::Placeholder { .. } => Category::Tree,
        }
    }

    pub fn behavior(&self) -> Option<&Arc<dyn Behavior>> {
        match self {
            Self::Action(behavior)
            | Self::Condition(behavior)
            | Self::Composite { behavior, .. }
            | Self::Decorator { behavior, .. } => Some(behavior),
            Self::Placeholder { .. } => None,
        }
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder { target } => f.debug_struct("Placeholder").field("target", target).finish(),
            Self::Composite { behavior, children } => f
                .debug_struct("Composite")
                .field("behavior", &behavior.name())
                .field("children", children)
                .finish(),
            Self::Decorator { behavior, child } => f
                .debug_struct("Decorator")
                .field("behavior", &behavior.name())
                .field("child", child)
                .finish(),
            Self::Action(behavior) => f.debug_tuple("Action").field(&behavior.name()).finish(),
            Self::Condition(behavior) => f.debug_tuple("Condition").field(&behavior.name()).finish(),
        }
    }
}

/// Where a new child goes under a given parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChildSlot {
    /// Appended to a composite's children.
    Append,
    /// Set as a decorator's child, displacing the current one if any.
    Set { current: Option<NodeId> },
}

/// Uniform identity and metadata envelope around one native node.
#[derive(Debug, Clone)]
pub struct NodeAdapter {
    id: NodeId,
    name: String,
    title: String,
    description: String,
    category: Category,
    properties: ValueMap,
    parameters: ValueMap,
    native: Native,
    tree: Option<TreeId>,
}

/// Wraps `behavior` under a fresh id and applies `options` in order.
pub fn adapt(
    behavior: Arc<dyn Behavior>,
    options: impl IntoIterator<Item = NodeOption>,
) -> NodeAdapter {
    NodeAdapter::new(behavior).with_options(options)
}

impl NodeAdapter {
    pub fn new(behavior: Arc<dyn Behavior>) -> Self {
        let name = behavior.name().to_string();
        Self::from_native(name, Native::new(behavior))
    }

    pub fn from_kind(kind: Kind) -> Self {
        Self::new(Arc::new(kind))
    }

    /// Placeholder standing in for tree `target`; its name is the target's id.
    pub fn placeholder(target: TreeId) -> Self {
        let name = target.to_string();
        Self::from_native(name, Native::Placeholder { target })
    }

    fn from_native(name: String, native: Native) -> Self {
        Self {
            id: NodeId::generate(),
            title: name.clone(),
            name,
            description: String::new(),
            category: native.category(),
            properties: ValueMap::new(),
            parameters: ValueMap::new(),
            native,
            tree: None,
        }
    }

    pub fn with(mut self, option: NodeOption) -> Self {
        self.apply(option);
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = NodeOption>) -> Self {
        for option in options {
            self.apply(option);
        }
        self
    }

    fn apply(&mut self, option: NodeOption) {
        match option {
            NodeOption::Title(title) => self.title = title,
            NodeOption::Description(description) => self.description = description,
            NodeOption::Category(category) => self.category = category,
            NodeOption::Property(key, value) => {
                self.properties.insert(key, value);
            }
            NodeOption::Properties(map) => self.properties.extend(map),
            NodeOption::Parameter(key, value) => {
                self.parameters.insert(key, value);
            }
            NodeOption::Parameters(map) => self.parameters.extend(map),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Compiled category: the native category unless overridden by an option.
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn properties(&self) -> &ValueMap {
        &self.properties
    }

    pub fn parameters(&self) -> &ValueMap {
        &self.parameters
    }

    pub fn native(&self) -> &Native {
        &self.native
    }

    /// Tree this node was attached to; `None` until attached.
    pub fn tree(&self) -> Option<&TreeId> {
        self.tree.as_ref()
    }

    /// Children tracked by the native node, in attachment order.
    pub fn children(&self) -> Vec<NodeId> {
        match &self.native {
            Native::Composite { children, .. } => children.clone(),
            Native::Decorator { child, .. } => child.iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn initialize(&self) {
        if let Some(behavior) = self.native.behavior() {
            behavior.initialize();
        }
    }

    pub(crate) fn assign_tree(&mut self, tree: TreeId) {
        debug_assert!(self.tree.is_none(), "node {} attached twice", self.id);
        self.tree = Some(tree);
    }

    /// How this node, acting as a parent, takes a new child.
    pub(crate) fn child_slot(&self) -> Result<ChildSlot, AssemblyError> {
        let mismatch = |expected| AssemblyError::CategoryMismatch {
            node: self.id.clone(),
            expected,
            actual: self.native.category(),
        };
        match self.category {
            Category::Composite => match &self.native {
                Native::Composite { .. } => Ok(ChildSlot::Append),
                _ => Err(mismatch(Category::Composite)),
            },
            Category::Decorator => match &self.native {
                Native::Decorator { child, .. } => Ok(ChildSlot::Set {
                    current: child.clone(),
                }),
                _ => Err(mismatch(Category::Decorator)),
            },
            category @ (Category::Action | Category::Condition | Category::Tree) => {
                Err(AssemblyError::LeafWithChildren {
                    parent: self.id.clone(),
                    category,
                })
            }
        }
    }

    pub(crate) fn add_child(&mut self, id: NodeId) -> Result<(), AssemblyError> {
        match &mut self.native {
            Native::Composite { children, .. } => {
                children.push(id);
                Ok(())
            }
            other => Err(AssemblyError::CategoryMismatch {
                node: self.id.clone(),
                expected: Category::Composite,
                actual: other.category(),
            }),
        }
    }

    /// Returns the displaced child, if any.
    pub(crate) fn set_child(&mut self, id: NodeId) -> Result<Option<NodeId>, AssemblyError> {
        match &mut self.native {
            Native::Decorator { child, .. } => Ok(child.replace(id)),
            other => Err(AssemblyError::CategoryMismatch {
                node: self.id.clone(),
                expected: Category::Decorator,
                actual: other.category(),
            }),
        }
    }
}
