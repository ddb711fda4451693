use std::sync::Arc;

use ai_bt::{realize, BehaviorTree, BtNode, BtStatus, Kind, NodeRegistry, SubtreeResolver, Tick};
use ai_core::{BbKey, Blackboard, Category, NodeConfig, NodeId, TickContext, TreeConfig, TreeId, Value};
use ai_tools::{TraceLog, TRACE_LOG};

const EVENTS: BbKey<Vec<String>> = BbKey::new("test.events");

/// Runs forever and records its open/close calls.
struct Recorder {
    id: NodeId,
}

impl BtNode for Recorder {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn open(&self, tick: &mut Tick<'_>) {
        record(tick, format!("open {}", self.id));
    }

    fn tick(&self, _tick: &mut Tick<'_>) -> BtStatus {
        BtStatus::Running
    }

    fn close(&self, tick: &mut Tick<'_>) {
        record(tick, format!("close {}", self.id));
    }
}

fn record(tick: &mut Tick<'_>, event: String) {
    let global = tick.global_mut();
    if let Some(events) = global.get_mut(EVENTS) {
        events.push(event);
    } else {
        global.set(EVENTS, vec![event]);
    }
}

fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::with_defaults();
    registry.register(Arc::new(Kind::new(
        "Recorder",
        Category::Action,
        |config, _children| Ok(Arc::new(Recorder { id: config.id.clone() }) as Arc<dyn BtNode>),
    )));
    registry
}

fn node(id: &str, name: &str, category: Category) -> NodeConfig {
    NodeConfig::new(NodeId::from(id), name, category)
}

fn tree(id: &str, root: NodeConfig, rest: Vec<NodeConfig>) -> TreeConfig {
    let mut config = TreeConfig::with_root(TreeId::from(id), root);
    for n in rest {
        config.nodes.insert(n.id.clone(), n);
    }
    config
}

fn realize_all(configs: &[TreeConfig]) -> (Vec<Arc<BehaviorTree>>, SubtreeResolver) {
    let registry = registry();
    let trees: Vec<_> = configs
        .iter()
        .map(|c| Arc::new(realize(c, &registry).unwrap()))
        .collect();
    let resolver = SubtreeResolver::new(trees.iter().cloned());
    (trees, resolver)
}

#[test]
fn placeholder_ticks_referenced_tree_in_place() {
    let mut seq = node("seq", "Sequence", Category::Composite);
    seq.children = vec![NodeId::from("call")];
    let main = tree("main", seq, vec![node("call", "helper", Category::Tree)]);

    let mut set = node("set", "SetValue", Category::Action);
    set.properties.insert("key".into(), Value::from("visited"));
    set.properties.insert("value".into(), Value::from(true));
    let helper = tree("helper", set, vec![]);

    let (trees, resolver) = realize_all(&[main, helper]);
    let mut bb = Blackboard::new();

    assert_eq!(
        trees[0].tick(TickContext::new(0), &mut bb, &resolver),
        BtStatus::Success
    );
    assert_eq!(
        bb.global().get_named::<Value>("visited"),
        Some(&Value::from(true))
    );
}

#[test]
fn unresolved_placeholder_fails_and_traces() {
    let main = tree("main", node("call", "nowhere", Category::Tree), vec![]);
    let (trees, resolver) = realize_all(&[main]);
    let mut bb = Blackboard::new();
    bb.global_mut().set(TRACE_LOG, TraceLog::default());

    assert_eq!(
        trees[0].tick(TickContext::new(3), &mut bb, &resolver),
        BtStatus::Failure
    );

    let log = bb.global().get(TRACE_LOG).unwrap();
    let event = log.tagged("bt.subtree.unresolved").next().unwrap();
    assert_eq!(event.tick, 3);
    assert_eq!(event.node, Some(NodeId::from("call")));
    assert_eq!(event.detail.as_deref(), Some("nowhere"));
}

#[test]
fn self_reference_stops_at_depth_limit() {
    let main = tree("main", node("again", "main", Category::Tree), vec![]);
    let (trees, resolver) = realize_all(&[main]);
    let mut bb = Blackboard::new();
    bb.global_mut().set(TRACE_LOG, TraceLog::default());

    assert_eq!(
        trees[0].tick(TickContext::new(0), &mut bb, &resolver),
        BtStatus::Failure
    );
    let log = bb.global().get(TRACE_LOG).unwrap();
    assert_eq!(log.tagged("bt.subtree.depth_exceeded").count(), 1);
}

#[test]
fn preempted_placeholder_closes_running_subtree_nodes() {
    // main: Priority(IsValue(stop), call -> worker)
    let mut sel = node("sel", "Priority", Category::Composite);
    sel.children = vec![NodeId::from("stop"), NodeId::from("call")];
    let mut stop = node("stop", "IsValue", Category::Condition);
    stop.properties.insert("key".into(), Value::from("stop"));
    stop.properties.insert("value".into(), Value::from(true));
    let main = tree("main", sel, vec![stop, node("call", "worker", Category::Tree)]);

    let worker = tree("worker", node("busy", "Recorder", Category::Action), vec![]);

    let (trees, resolver) = realize_all(&[main, worker]);
    let mut bb = Blackboard::new();

    assert_eq!(
        trees[0].tick(TickContext::new(0), &mut bb, &resolver),
        BtStatus::Running
    );
    assert_eq!(
        trees[0].tick(TickContext::new(1), &mut bb, &resolver),
        BtStatus::Running
    );
    assert_eq!(trees[1].open_nodes(&bb), vec![NodeId::from("busy")]);

    bb.global_mut().set_named("stop", Value::from(true));
    assert_eq!(
        trees[0].tick(TickContext::new(2), &mut bb, &resolver),
        BtStatus::Success
    );

    assert_eq!(
        bb.global().get(EVENTS).cloned().unwrap_or_default(),
        vec!["open busy".to_string(), "close busy".to_string()]
    );
    assert!(trees[1].open_nodes(&bb).is_empty());
}

#[test]
fn one_tree_many_agents() {
    let mut wait = node("wait", "Wait", Category::Action);
    wait.properties.insert("ticks".into(), Value::from(2));
    let (trees, resolver) = realize_all(&[tree("main", wait, vec![])]);
    let tree = trees[0].clone();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree = tree.clone();
            let resolver = resolver.clone();
            std::thread::spawn(move || {
                let mut bb = Blackboard::new();
                let first = tree.tick(TickContext::new(0), &mut bb, &resolver);
                let second = tree.tick(TickContext::new(1), &mut bb, &resolver);
                (first, second)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            (BtStatus::Running, BtStatus::Success)
        );
    }
}
