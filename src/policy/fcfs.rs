//! First-come, first-served.
//!
//! Non-preemptive: tasks run to completion in (arrival, id) order. When the
//! unit is idle before the next arrival the clock jumps forward; idle gaps
//! are not recorded as slices.

use super::{arrival_order, PolicyState, SchedulingPolicy};
use crate::error::Result;
use crate::models::{Task, Trace};

/// First-come, first-served policy.
#[derive(Debug, Clone, Default)]
pub struct Fcfs {
    state: PolicyState,
}

impl Fcfs {
    const NAME: &'static str = "FIFO";

    /// Creates the policy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedulingPolicy for Fcfs {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn execute(&mut self, tasks: &mut [Task], _quantum: Option<i64>) -> Result<()> {
        self.state.begin(Self::NAME, tasks)?;

        let mut clock = 0;
        for idx in arrival_order(tasks) {
            let task = &mut tasks[idx];
            clock = clock.max(task.arrival);
            let end = clock + task.burst;
            self.state.record(task.id, clock, end)?;
            task.remaining = 0;
            clock = end;
        }

        self.state.finish(tasks);
        Ok(())
    }

    fn trace(&self) -> &Trace {
        self.state.trace()
    }
}
