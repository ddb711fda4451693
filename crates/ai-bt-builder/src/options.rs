//! Per-attachment options.
//!
//! Options are applied in order; on a key collision the later option wins.

use ai_core::{Category, Value, ValueMap};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeOption {
    Title(String),
    Description(String),
    /// Overrides the compiled category; the wrapped behavior keeps its own.
    Category(Category),
    Property(String, Value),
    Properties(ValueMap),
    Parameter(String, Value),
    Parameters(ValueMap),
}

pub fn title(title: impl Into<String>) -> NodeOption {
    NodeOption::Title(title.into())
}

pub fn description(description: impl Into<String>) -> NodeOption {
    NodeOption::Description(description.into())
}

pub fn category(category: Category) -> NodeOption {
    NodeOption::Category(category)
}

pub fn property(key: impl Into<String>, value: impl Into<Value>) -> NodeOption {
    NodeOption::Property(key.into(), value.into())
}

/// Merges a copy of `map` into the property bag.
pub fn properties(map: &ValueMap) -> NodeOption {
    NodeOption::Properties(map.clone())
}

pub fn parameter(key: impl Into<String>, value: impl Into<Value>) -> NodeOption {
    NodeOption::Parameter(key.into(), value.into())
}

/// Merges a copy of `map` into the parameter bag.
pub fn parameters(map: &ValueMap) -> NodeOption {
    NodeOption::Parameters(map.clone())
}
