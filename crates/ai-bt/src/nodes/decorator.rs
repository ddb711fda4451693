use std::sync::Arc;

use ai_core::{BbKey, Category, NodeId};

use super::{int_property, required_int, single_child};
use crate::{execute, BtNode, BtStatus, Kind, Tick};

const COUNT: BbKey<i64> = BbKey::new("bt.count");
const ELAPSED: BbKey<i64> = BbKey::new("bt.elapsed");

/// Swaps `Success` and `Failure`; `Running` passes through.
pub struct Inverter {
    id: NodeId,
    child: Arc<dyn BtNode>,
}

impl Inverter {
    pub fn new(id: NodeId, child: Arc<dyn BtNode>) -> Self {
        Self { id, child }
    }

    pub fn kind() -> Kind {
        Kind::new("Inverter", Category::Decorator, |config, children| {
            let child = single_child(config, children)?;
            Ok(Arc::new(Self::new(config.id.clone(), child)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for Inverter {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        match execute(self.child.as_ref(), tick) {
            BtStatus::Success => BtStatus::Failure,
            BtStatus::Failure => BtStatus::Success,
            BtStatus::Running => BtStatus::Running,
        }
    }
}

/// Runs its child to completion `maxLoop` times, at most one completed run per tick.
///
/// Reports `Running` until the last run completes, then `Success`. The run count lives in the
/// agent's blackboard and is never reset by the node itself, so every later tick reports
/// `Success` without touching the child. A negative `maxLoop` (the default) repeats forever.
pub struct Repeater {
    id: NodeId,
    child: Arc<dyn BtNode>,
    max_loop: i64,
}

impl Repeater {
    pub fn new(id: NodeId, child: Arc<dyn BtNode>, max_loop: i64) -> Self {
        Self {
            id,
            child,
            max_loop,
        }
    }

    pub fn kind() -> Kind {
        Kind::new("Repeater", Category::Decorator, |config, children| {
            let max_loop = int_property(config, "maxLoop")?.unwrap_or(-1);
            let child = single_child(config, children)?;
            Ok(Arc::new(Self::new(config.id.clone(), child, max_loop)) as Arc<dyn BtNode>)
        })
    }

    fn done(&self, count: i64) -> bool {
        self.max_loop >= 0 && count >= self.max_loop
    }
}

impl BtNode for Repeater {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        let count = tick.memory(&self.id).get(COUNT).copied().unwrap_or(0);
        if self.done(count) {
            return BtStatus::Success;
        }

        if execute(self.child.as_ref(), tick) == BtStatus::Running {
            return BtStatus::Running;
        }

        let count = count + 1;
        tick.memory(&self.id).set(COUNT, count);
        if self.done(count) {
            BtStatus::Success
        } else {
            BtStatus::Running
        }
    }
}

/// Re-runs its child each tick until it succeeds, or until `maxLoop` failed runs.
pub struct RepeatUntilSuccess {
    id: NodeId,
    child: Arc<dyn BtNode>,
    max_loop: i64,
}

impl RepeatUntilSuccess {
    pub fn new(id: NodeId, child: Arc<dyn BtNode>, max_loop: i64) -> Self {
        Self {
            id,
            child,
            max_loop,
        }
    }

    pub fn kind() -> Kind {
        Kind::new("RepeatUntilSuccess", Category::Decorator, |config, children| {
            let max_loop = int_property(config, "maxLoop")?.unwrap_or(-1);
            let child = single_child(config, children)?;
            Ok(Arc::new(Self::new(config.id.clone(), child, max_loop)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for RepeatUntilSuccess {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn open(&self, tick: &mut Tick<'_>) {
        tick.memory(&self.id).set(COUNT, 0);
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        repeat_until(
            &self.id,
            self.child.as_ref(),
            self.max_loop,
            BtStatus::Success,
            tick,
        )
    }
}

/// Re-runs its child each tick until it fails, or until `maxLoop` successful runs.
pub struct RepeatUntilFailure {
    id: NodeId,
    child: Arc<dyn BtNode>,
    max_loop: i64,
}

impl RepeatUntilFailure {
    pub fn new(id: NodeId, child: Arc<dyn BtNode>, max_loop: i64) -> Self {
        Self {
            id,
            child,
            max_loop,
        }
    }

    pub fn kind() -> Kind {
        Kind::new("RepeatUntilFailure", Category::Decorator, |config, children| {
            let max_loop = int_property(config, "maxLoop")?.unwrap_or(-1);
            let child = single_child(config, children)?;
            Ok(Arc::new(Self::new(config.id.clone(), child, max_loop)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for RepeatUntilFailure {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn open(&self, tick: &mut Tick<'_>) {
        tick.memory(&self.id).set(COUNT, 0);
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        repeat_until(
            &self.id,
            self.child.as_ref(),
            self.max_loop,
            BtStatus::Failure,
            tick,
        )
    }
}

fn repeat_until(
    id: &NodeId,
    child: &dyn BtNode,
    max_loop: i64,
    stop_on: BtStatus,
    tick: &mut Tick<'_>,
) -> BtStatus {
    let status = execute(child, tick);
    if status == BtStatus::Running || status == stop_on {
        return status;
    }

    let count = tick.memory(id).get(COUNT).copied().unwrap_or(0) + 1;
    tick.memory(id).set(COUNT, count);
    if max_loop >= 0 && count >= max_loop {
        status
    } else {
        BtStatus::Running
    }
}

/// Lets its child complete at most `maxLoop` times (default 1) over the blackboard's lifetime;
/// after that it fails without ticking the child.
pub struct Limiter {
    id: NodeId,
    child: Arc<dyn BtNode>,
    max_loop: i64,
}

impl Limiter {
    pub fn new(id: NodeId, child: Arc<dyn BtNode>, max_loop: i64) -> Self {
        Self {
            id,
            child,
            max_loop,
        }
    }

    pub fn kind() -> Kind {
        Kind::new("Limiter", Category::Decorator, |config, children| {
            let max_loop = int_property(config, "maxLoop")?.unwrap_or(1);
            let child = single_child(config, children)?;
            Ok(Arc::new(Self::new(config.id.clone(), child, max_loop)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for Limiter {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        let count = tick.memory(&self.id).get(COUNT).copied().unwrap_or(0);
        if count >= self.max_loop {
            return BtStatus::Failure;
        }

        let status = execute(self.child.as_ref(), tick);
        if status != BtStatus::Running {
            tick.memory(&self.id).set(COUNT, count + 1);
        }
        status
    }
}

/// Fails once its child has been running for more than `maxTicks` ticks in a row.
pub struct MaxTicks {
    id: NodeId,
    child: Arc<dyn BtNode>,
    max_ticks: i64,
}

impl MaxTicks {
    pub fn new(id: NodeId, child: Arc<dyn BtNode>, max_ticks: i64) -> Self {
        Self {
            id,
            child,
            max_ticks,
        }
    }

    pub fn kind() -> Kind {
        Kind::new("MaxTicks", Category::Decorator, |config, children| {
            let max_ticks = required_int(config, "maxTicks")?;
            let child = single_child(config, children)?;
            Ok(Arc::new(Self::new(config.id.clone(), child, max_ticks)) as Arc<dyn BtNode>)
        })
    }
}

impl BtNode for MaxTicks {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn open(&self, tick: &mut Tick<'_>) {
        tick.memory(&self.id).set(ELAPSED, 0);
    }

    fn tick(&self, tick: &mut Tick<'_>) -> BtStatus {
        let elapsed = tick.memory(&self.id).get(ELAPSED).copied().unwrap_or(0) + 1;
        tick.memory(&self.id).set(ELAPSED, elapsed);

        let status = execute(self.child.as_ref(), tick);
        if status == BtStatus::Running && elapsed >= self.max_ticks {
            return BtStatus::Failure;
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use ai_core::Blackboard;

    use super::*;
    use crate::nodes::testing::{calls, run, scripted};
    use crate::BtStatus::{Failure, Running, Success};

    #[test]
    fn inverter_swaps_outcomes() {
        let mut bb = Blackboard::new();
        let inv = Inverter::new(NodeId::from("inv"), scripted("a", &[Success, Running, Failure]));
        assert_eq!(run(&inv, &mut bb, 0), Failure);
        assert_eq!(run(&inv, &mut bb, 1), Running);
        assert_eq!(run(&inv, &mut bb, 2), Success);
    }

    #[test]
    fn repeater_completes_after_max_loop_runs_and_stays_complete() {
        let mut bb = Blackboard::new();
        let rep = Repeater::new(NodeId::from("rep"), scripted("a", &[Success]), 2);

        assert_eq!(run(&rep, &mut bb, 0), Running);
        assert_eq!(run(&rep, &mut bb, 1), Success);
        assert_eq!(run(&rep, &mut bb, 2), Success);
        assert_eq!(run(&rep, &mut bb, 3), Success);
        assert_eq!(calls(&bb, "a"), 2);
    }

    #[test]
    fn repeater_does_not_count_running_child() {
        let mut bb = Blackboard::new();
        let rep = Repeater::new(
            NodeId::from("rep"),
            scripted("a", &[Running, Failure, Success]),
            2,
        );

        assert_eq!(run(&rep, &mut bb, 0), Running);
        assert_eq!(run(&rep, &mut bb, 1), Running);
        assert_eq!(run(&rep, &mut bb, 2), Success);
        assert_eq!(calls(&bb, "a"), 3);
    }

    #[test]
    fn negative_max_loop_repeats_forever() {
        let mut bb = Blackboard::new();
        let rep = Repeater::new(NodeId::from("rep"), scripted("a", &[Success]), -1);
        for t in 0..10 {
            assert_eq!(run(&rep, &mut bb, t), Running);
        }
        assert_eq!(calls(&bb, "a"), 10);
    }

    #[test]
    fn repeat_until_success_stops_on_success() {
        let mut bb = Blackboard::new();
        let rep = RepeatUntilSuccess::new(
            NodeId::from("rep"),
            scripted("a", &[Failure, Failure, Success]),
            -1,
        );
        assert_eq!(run(&rep, &mut bb, 0), Running);
        assert_eq!(run(&rep, &mut bb, 1), Running);
        assert_eq!(run(&rep, &mut bb, 2), Success);
    }

    #[test]
    fn repeat_until_failure_gives_up_after_max_loop() {
        let mut bb = Blackboard::new();
        let rep = RepeatUntilFailure::new(NodeId::from("rep"), scripted("a", &[Success]), 2);
        assert_eq!(run(&rep, &mut bb, 0), Running);
        assert_eq!(run(&rep, &mut bb, 1), Success);
    }

    #[test]
    fn limiter_fails_after_budget_is_spent() {
        let mut bb = Blackboard::new();
        let lim = Limiter::new(NodeId::from("lim"), scripted("a", &[Success]), 2);
        assert_eq!(run(&lim, &mut bb, 0), Success);
        assert_eq!(run(&lim, &mut bb, 1), Success);
        assert_eq!(run(&lim, &mut bb, 2), Failure);
        assert_eq!(calls(&bb, "a"), 2);
    }

    #[test]
    fn max_ticks_fails_long_running_child() {
        let mut bb = Blackboard::new();
        let guard = MaxTicks::new(NodeId::from("guard"), scripted("a", &[Running]), 3);
        assert_eq!(run(&guard, &mut bb, 0), Running);
        assert_eq!(run(&guard, &mut bb, 1), Running);
        assert_eq!(run(&guard, &mut bb, 2), Failure);
    }
}
