//! Delayed work that must run back on the simulation thread.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use lobby_shared::PlayerId;

/// Work deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduledTask {
    /// Evaluate proximity for a player whose world context has settled
    RangeCheck { player: PlayerId },
}

/// "Run later, on the simulation thread" facility
pub trait Scheduler {
    /// Queue a task `delay_ticks` after the current tick
    fn run_later(&mut self, delay_ticks: u64, task: ScheduledTask);

    /// Remove and return every task due at or before `now`, in due order
    fn take_due(&mut self, now: u64) -> Vec<ScheduledTask>;
}

/// Tick-ordered scheduler; tasks due on the same tick keep submission order
#[derive(Debug, Default)]
pub struct TickScheduler {
    now: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<(u64, u64, ScheduledTask)>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Scheduler for TickScheduler {
    fn run_later(&mut self, delay_ticks: u64, task: ScheduledTask) {
        let due = self.now.saturating_add(delay_ticks);
        self.queue.push(Reverse((due, self.seq, task)));
        self.seq += 1;
    }

    fn take_due(&mut self, now: u64) -> Vec<ScheduledTask> {
        self.now = self.now.max(now);
        let mut due = Vec::new();
        while let Some(Reverse((at, _, _))) = self.queue.peek() {
            if *at > self.now {
                break;
            }
            if let Some(Reverse((_, _, task))) = self.queue.pop() {
                due.push(task);
            }
        }
        due
    }
}
