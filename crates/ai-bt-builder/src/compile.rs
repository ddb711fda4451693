use ai_core::{Category, NodeConfig};

use crate::NodeAdapter;

/// Compiles one adapter into its flat record.
///
/// Runs the wrapped behavior's initialization hook. The builder calls this exactly once per node,
/// when the node is attached. Property and parameter bags are copied; child links are whatever the
/// native node tracks at this point (normally none).
pub fn compile(adapter: &NodeAdapter) -> NodeConfig {
    adapter.initialize();

    let mut config = NodeConfig::new(adapter.id().clone(), adapter.name(), adapter.category());
    config.title = adapter.title().to_string();
    config.description = adapter.description().to_string();
    config.properties = adapter.properties().clone();
    config.parameters = adapter.parameters().clone();

    let children = adapter.children();
    match adapter.category() {
        Category::Composite => config.children = children,
        Category::Decorator => config.child = children.into_iter().next(),
        _ => {}
    }
    config
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use ai_bt::{BtStatus, Kind, Repeater};
    use ai_core::Value;

    use super::*;
    use crate::options::{category, property, title};

    #[test]
    fn copies_metadata_and_bags() {
        let adapter = NodeAdapter::from_kind(Repeater::kind())
            .with(title("twice"))
            .with(property("maxLoop", 2));
        let config = compile(&adapter);

        assert_eq!(&config.id, adapter.id());
        assert_eq!(config.name, "Repeater");
        assert_eq!(config.title, "twice");
        assert_eq!(config.category, Category::Decorator);
        assert_eq!(config.properties["maxLoop"], Value::from(2));
        assert_eq!(config.child, None);
        assert!(config.children.is_empty());
    }

    #[test]
    fn category_override_only_changes_the_record() {
        let adapter = NodeAdapter::from_kind(Kind::action("Jump", |_, _| BtStatus::Success))
            .with(category(Category::Condition));
        assert_eq!(compile(&adapter).category, Category::Condition);
        assert_eq!(adapter.native().category(), Category::Action);
    }

    #[test]
    fn runs_initialize_hook() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let kind = Kind::action("Jump", |_, _| BtStatus::Success).on_initialize(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        compile(&NodeAdapter::from_kind(kind));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
