use core::fmt;

use serde::{Deserialize, Serialize};

/// Structural role of a node.
///
/// `Tree` is synthetic: it marks a placeholder that stands in for another tree of the same
/// project and is resolved while ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Action,
    Condition,
    Composite,
    Decorator,
    Tree,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Action => "action",
            Category::Condition => "condition",
            Category::Composite => "composite",
            Category::Decorator => "decorator",
            Category::Tree => "tree",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
