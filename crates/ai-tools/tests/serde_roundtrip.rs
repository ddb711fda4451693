#![cfg(feature = "serde")]

use ai_core::{NodeId, TreeId};
use ai_tools::{TraceEvent, TraceLog};

#[test]
fn trace_log_json_roundtrip() {
    let tree = TreeId::from("t1");
    let node = NodeId::from("n1");
    let log = TraceLog {
        events: vec![
            TraceEvent::new(1, "bt.subtree.enter").with_tree(&tree),
            TraceEvent::new(2, "bt.log")
                .with_tree(&tree)
                .with_node(&node)
                .with_detail("hello"),
            TraceEvent::new(3, "bt.subtree.unresolved").with_detail("missing"),
        ],
    };

    let json = serde_json::to_string(&log).expect("serialize");
    let roundtrip: TraceLog = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, log);
}
