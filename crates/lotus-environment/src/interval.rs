//! Fixed-period interval timers on a virtual clock.
//!
//! Each timer is a boxed [`IntervalTask`] plus an [`IntervalHandle`] shared
//! with whoever scheduled it. Ticks fire in chronological order across all
//! timers; equal due times fire in scheduling order. A handle that was
//! cancelled before its tick is due never ticks again.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::{EnvironmentBinding, HandoffGate, ParameterStore};

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Waiting on a precondition; nothing was written.
    Idle,
    /// Parameters were written and the environment recomputed.
    Stepped,
    /// Stop condition reached; the timer disposes itself.
    Finished,
}

/// Mutable state a tick is allowed to touch.
pub struct TickContext<'a> {
    pub params: &'a mut ParameterStore,
    pub gate: &'a mut HandoffGate,
    pub binding: &'a mut dyn EnvironmentBinding,
}

/// Step function and stop predicate of one interval timer.
pub trait IntervalTask {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> TickOutcome;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerStatus {
    Armed,
    Finished,
    Cancelled,
}

#[derive(Debug)]
struct TimerShared {
    status: Cell<TimerStatus>,
    ticks: Cell<u32>,
    steps: Cell<u32>,
}

/// Cancellable token for one scheduled timer.
///
/// Clones share state. Once the timer finishes or is cancelled the handle
/// stays inactive; cancelling again is a no-op.
#[derive(Clone, Debug)]
pub struct IntervalHandle {
    id: u64,
    name: &'static str,
    shared: Rc<TimerShared>,
}

impl IntervalHandle {
    fn new(id: u64, name: &'static str) -> Self {
        Self {
            id,
            name,
            shared: Rc::new(TimerShared {
                status: Cell::new(TimerStatus::Armed),
                ticks: Cell::new(0),
                steps: Cell::new(0),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the timer before its next tick. Idempotent, and a no-op on a
    /// timer that already finished.
    pub fn cancel(&self) {
        if self.shared.status.get() == TimerStatus::Armed {
            self.shared.status.set(TimerStatus::Cancelled);
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared.status.get() == TimerStatus::Armed
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.status.get() == TimerStatus::Cancelled
    }

    /// The task reached its stop condition.
    pub fn is_finished(&self) -> bool {
        self.shared.status.get() == TimerStatus::Finished
    }

    /// Ticks executed, including idle and finishing ticks.
    pub fn ticks(&self) -> u32 {
        self.shared.ticks.get()
    }

    /// Ticks that wrote parameters and recomputed the environment.
    pub fn steps(&self) -> u32 {
        self.shared.steps.get()
    }

    fn record(&self, outcome: TickOutcome) {
        self.shared.ticks.set(self.shared.ticks.get() + 1);
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Stepped => self.shared.steps.set(self.shared.steps.get() + 1),
            TickOutcome::Finished => self.shared.status.set(TimerStatus::Finished),
        }
    }
}

struct IntervalTimer {
    handle: IntervalHandle,
    period: Duration,
    next_due: Duration,
    task: Box<dyn IntervalTask>,
}

/// Owns every live interval timer and the virtual clock they run on.
#[derive(Default)]
pub struct IntervalScheduler {
    now: Duration,
    timers: Vec<IntervalTimer>,
    next_id: u64,
}

/// Shortest accepted period; a zero period would never let time advance.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Arm a timer whose first tick is due one `period` from now.
    pub fn schedule(&mut self, period: Duration, task: Box<dyn IntervalTask>) -> IntervalHandle {
        let period = period.max(MIN_PERIOD);
        let handle = IntervalHandle::new(self.next_id, task.name());
        self.next_id += 1;
        self.timers.push(IntervalTimer {
            handle: handle.clone(),
            period,
            next_due: self.now + period,
            task,
        });
        handle
    }

    /// Move the clock forward by `dt`, firing every tick due on the way.
    pub fn advance(&mut self, dt: Duration, ctx: &mut TickContext<'_>) {
        let target = self.now + dt;

        loop {
            self.timers.retain(|timer| timer.handle.is_active());

            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, timer)| timer.next_due <= target)
                .min_by_key(|(_, timer)| (timer.next_due, timer.handle.id))
                .map(|(index, _)| index);
            let Some(index) = next else {
                break;
            };

            let timer = &mut self.timers[index];
            self.now = timer.next_due;
            timer.next_due += timer.period;

            let outcome = timer.task.tick(ctx);
            timer.handle.record(outcome);
            trace!(
                timer = timer.handle.name,
                at_ms = self.now.as_millis() as u64,
                ?outcome,
                "interval tick"
            );
        }

        self.now = target;
    }

    /// Number of timers that are still armed.
    pub fn active_count(&self) -> usize {
        self.timers
            .iter()
            .filter(|timer| timer.handle.is_active())
            .count()
    }

    /// Cancel every armed timer.
    pub fn cancel_all(&mut self) {
        for timer in &self.timers {
            timer.handle.cancel();
        }
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParameterUpdate, RecordingBinding};
    use std::cell::RefCell;

    /// Appends its label to a shared log; finishes after `limit` ticks.
    struct Probe {
        label: &'static str,
        limit: u32,
        seen: u32,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl IntervalTask for Probe {
        fn name(&self) -> &'static str {
            self.label
        }

        fn tick(&mut self, ctx: &mut TickContext<'_>) -> TickOutcome {
            self.seen += 1;
            self.log.borrow_mut().push(self.label);
            if self.seen >= self.limit {
                return TickOutcome::Finished;
            }
            let next = ctx.params.get().elevation + 1.0;
            ctx.params.set(ParameterUpdate::elevation(next));
            ctx.binding.recompute_environment(ctx.params.get(), false);
            TickOutcome::Stepped
        }
    }

    fn probe(label: &'static str, limit: u32, log: &Rc<RefCell<Vec<&'static str>>>) -> Box<Probe> {
        Box::new(Probe {
            label,
            limit,
            seen: 0,
            log: Rc::clone(log),
        })
    }

    struct Fixture {
        params: ParameterStore,
        gate: HandoffGate,
        binding: RecordingBinding,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                params: ParameterStore::default(),
                gate: HandoffGate::new(),
                binding: RecordingBinding::default(),
            }
        }

        fn advance(&mut self, scheduler: &mut IntervalScheduler, ms: u64) {
            let mut ctx = TickContext {
                params: &mut self.params,
                gate: &mut self.gate,
                binding: &mut self.binding,
            };
            scheduler.advance(Duration::from_millis(ms), &mut ctx);
        }
    }

    #[test]
    fn test_first_tick_after_one_period() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = IntervalScheduler::new();
        let mut fx = Fixture::new();
        let handle = scheduler.schedule(Duration::from_millis(50), probe("a", 100, &log));

        fx.advance(&mut scheduler, 49);
        assert_eq!(handle.ticks(), 0);
        fx.advance(&mut scheduler, 1);
        assert_eq!(handle.ticks(), 1);
    }

    #[test]
    fn test_ticks_interleave_chronologically() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = IntervalScheduler::new();
        let mut fx = Fixture::new();
        scheduler.schedule(Duration::from_millis(50), probe("slow", 100, &log));
        scheduler.schedule(Duration::from_millis(20), probe("fast", 100, &log));

        // One big step must still fire in time order: 20, 40, 50, 60, 80, 100(slow first).
        fx.advance(&mut scheduler, 100);
        assert_eq!(
            *log.borrow(),
            vec!["fast", "fast", "slow", "fast", "fast", "slow", "fast"]
        );
        assert_eq!(scheduler.now(), Duration::from_millis(100));
    }

    #[test]
    fn test_finished_timer_disposes_itself() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = IntervalScheduler::new();
        let mut fx = Fixture::new();
        let handle = scheduler.schedule(Duration::from_millis(10), probe("a", 3, &log));

        fx.advance(&mut scheduler, 100);
        assert!(handle.is_finished());
        assert_eq!(handle.ticks(), 3);
        assert_eq!(handle.steps(), 2);
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(fx.binding.len(), 2);
    }

    #[test]
    fn test_cancel_before_due_prevents_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = IntervalScheduler::new();
        let mut fx = Fixture::new();
        let handle = scheduler.schedule(Duration::from_millis(20), probe("a", 100, &log));

        fx.advance(&mut scheduler, 30);
        handle.cancel();
        fx.advance(&mut scheduler, 100);
        assert_eq!(handle.ticks(), 1);
        assert!(handle.is_cancelled());
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = IntervalScheduler::new();
        let handle = scheduler.schedule(Duration::from_millis(20), probe("a", 100, &log));
        handle.cancel();
        handle.cancel();
        handle.clone().cancel();
        assert!(handle.is_cancelled());
        assert!(!handle.is_active());
    }

    #[test]
    fn test_cancel_after_finish_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = IntervalScheduler::new();
        let mut fx = Fixture::new();
        let handle = scheduler.schedule(Duration::from_millis(5), probe("a", 1, &log));
        fx.advance(&mut scheduler, 5);
        handle.cancel();
        assert!(handle.is_finished());
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = IntervalScheduler::new();
        let mut fx = Fixture::new();
        let handle = scheduler.schedule(Duration::ZERO, probe("a", 1000, &log));
        fx.advance(&mut scheduler, 10);
        assert_eq!(handle.ticks(), 10);
    }

    #[test]
    fn test_cancel_all() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = IntervalScheduler::new();
        let a = scheduler.schedule(Duration::from_millis(5), probe("a", 100, &log));
        let b = scheduler.schedule(Duration::from_millis(7), probe("b", 100, &log));
        assert_eq!(scheduler.active_count(), 2);
        scheduler.cancel_all();
        assert_eq!(scheduler.active_count(), 0);
        assert!(a.is_cancelled() && b.is_cancelled());
    }
}
