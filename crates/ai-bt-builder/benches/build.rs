use ai_bt::{IsValue, MemSequence, Priority, Repeater, Sequence, SetValue, Succeeder};
use ai_bt_builder::options::property;
use ai_bt_builder::{Builder, BuiltProject, NodeAdapter};
use ai_core::{Blackboard, TickContext, Value};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn assemble(branches: usize) -> Builder {
    let builder = Builder::new();
    let Ok(root) = builder.attach_composite(NodeAdapter::from_kind(Priority::kind())) else {
        unreachable!("first attachment creates the root");
    };
    for i in 0..branches {
        let branch = root
            .attach_composite(NodeAdapter::from_kind(MemSequence::kind()))
            .and_then(|seq| {
                seq.attach_leaf(
                    NodeAdapter::from_kind(IsValue::kind())
                        .with(property("key", "branch"))
                        .with(property("value", i)),
                )?;
                let sub = seq.attach_subtree(NodeAdapter::from_kind(Sequence::kind()))?;
                let repeat = sub.attach_decorator(
                    NodeAdapter::from_kind(Repeater::kind()).with(property("maxLoop", 4)),
                )?;
                repeat.attach_leaf(NodeAdapter::from_kind(Succeeder::kind()))?;
                seq.attach_leaf(
                    NodeAdapter::from_kind(SetValue::kind())
                        .with(property("key", "branch"))
                        .with(property("value", (i + 1) % branches)),
                )
            });
        black_box(branch.is_ok());
    }
    builder
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("ai-bt-builder/assemble+build(branches=16)", |b| {
        b.iter(|| {
            let builder = assemble(16);
            black_box(builder.build().is_ok());
        })
    });
}

fn bench_tick(c: &mut Criterion) {
    let project: BuiltProject = match assemble(16).build() {
        Ok(project) => project,
        Err(err) => panic!("bench project failed to build: {err}"),
    };
    let mut blackboard = Blackboard::new();
    blackboard.global_mut().set_named("branch", Value::from(0));

    let mut tick: u64 = 0;
    c.bench_function("ai-bt-builder/tick(branches=16)", |b| {
        b.iter(|| {
            let status = project.tick(TickContext::new(tick).with_dt(0.1), &mut blackboard);
            black_box(status);
            tick = tick.wrapping_add(1);
        })
    });
}

criterion_group!(benches, bench_build, bench_tick);
criterion_main!(benches);
