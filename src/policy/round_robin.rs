//! Round Robin (preemptive, fixed quantum).
//!
//! # Algorithm
//! 1. Admit every task that has arrived by the current clock into a FIFO
//!    ready queue, in (arrival, id) order. Zero-burst tasks finish on
//!    admission and never enter the queue.
//! 2. If the queue is empty, jump to the next arrival and retry.
//! 3. Run the head task for `min(quantum, remaining)`.
//! 4. Admit tasks that arrived during that slice.
//! 5. Re-enqueue the preempted task behind them if it still has work left.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3.4

use std::collections::VecDeque;

use super::{arrival_order, PolicyState, SchedulingPolicy};
use crate::error::{Result, SimError};
use crate::models::{Task, Trace};

/// Round Robin policy.
///
/// The quantum either comes from the `execute` argument or is fixed at
/// construction with [`RoundRobin::with_quantum`]; a fixed quantum takes
/// precedence.
#[derive(Debug, Clone, Default)]
pub struct RoundRobin {
    quantum: Option<i64>,
    state: PolicyState,
}

impl RoundRobin {
    const NAME: &'static str = "Round Robin";

    /// Creates a policy that takes its quantum from `execute`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy with a fixed quantum.
    pub fn with_quantum(quantum: i64) -> Self {
        Self {
            quantum: Some(quantum),
            state: PolicyState::default(),
        }
    }

    /// The fixed quantum, if one was configured.
    pub fn fixed_quantum(&self) -> Option<i64> {
        self.quantum
    }

    fn resolve_quantum(&self, quantum: Option<i64>) -> Result<i64> {
        match self.quantum.or(quantum) {
            Some(q) if q > 0 => Ok(q),
            Some(q) => Err(SimError::invalid(format!("quantum must be > 0, got {q}"))),
            None => Err(SimError::invalid("Round Robin requires a quantum")),
        }
    }
}

/// Moves every arrived task from `order[next..]` into the ready queue.
///
/// Returns the new admission cursor.
fn admit(
    tasks: &mut [Task],
    order: &[usize],
    mut next: usize,
    clock: i64,
    ready: &mut VecDeque<usize>,
) -> usize {
    while next < order.len() && tasks[order[next]].arrival <= clock {
        let idx = order[next];
        if tasks[idx].burst == 0 {
            tasks[idx].remaining = 0;
        } else {
            ready.push_back(idx);
        }
        next += 1;
    }
    next
}

impl SchedulingPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn execute(&mut self, tasks: &mut [Task], quantum: Option<i64>) -> Result<()> {
        let quantum = self.resolve_quantum(quantum)?;
        self.state.begin(Self::NAME, tasks)?;

        let order = arrival_order(tasks);
        let mut ready: VecDeque<usize> = VecDeque::with_capacity(tasks.len());
        let mut next = 0;
        let mut clock = 0;

        while next < order.len() || !ready.is_empty() {
            next = admit(tasks, &order, next, clock, &mut ready);

            let Some(idx) = ready.pop_front() else {
                if next < order.len() {
                    clock = clock.max(tasks[order[next]].arrival);
                }
                continue;
            };

            let task = &mut tasks[idx];
            let run = quantum.min(task.remaining);
            self.state.record(task.id, clock, clock + run)?;
            task.remaining -= run;
            clock += run;

            // Arrivals during the slice queue ahead of the preempted task.
            next = admit(tasks, &order, next, clock, &mut ready);
            if tasks[idx].remaining > 0 {
                ready.push_back(idx);
            }
        }

        self.state.finish(tasks);
        Ok(())
    }

    fn check_quantum(&self, quantum: Option<i64>) -> Result<()> {
        self.resolve_quantum(quantum).map(|_| ())
    }

    fn trace(&self) -> &Trace {
        self.state.trace()
    }
}
