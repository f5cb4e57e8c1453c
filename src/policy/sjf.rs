//! Shortest job first (non-preemptive).
//!
//! # Algorithm
//! 1. Among pending tasks that have arrived, pick the one with the smallest
//!    burst; ties go to the earlier arrival, then the lower id.
//! 2. If nothing has arrived yet, jump the clock to the earliest pending
//!    arrival and retry.
//! 3. Run the chosen task to completion and remove it from the pending set.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3.2

use super::{PolicyState, SchedulingPolicy};
use crate::error::Result;
use crate::models::{Task, Trace};

/// Non-preemptive shortest-job-first policy.
#[derive(Debug, Clone, Default)]
pub struct Sjf {
    state: PolicyState,
}

impl Sjf {
    const NAME: &'static str = "SJF (non-preemptive)";

    /// Creates the policy.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Picks the shortest arrived task, or `None` if nothing has arrived.
fn select_shortest(tasks: &[Task], pending: &[usize], clock: i64) -> Option<usize> {
    pending
        .iter()
        .copied()
        .filter(|&i| tasks[i].arrival <= clock)
        .min_by_key(|&i| (tasks[i].burst, tasks[i].arrival, tasks[i].id))
}

impl SchedulingPolicy for Sjf {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn execute(&mut self, tasks: &mut [Task], _quantum: Option<i64>) -> Result<()> {
        self.state.begin(Self::NAME, tasks)?;

        let mut pending: Vec<usize> = (0..tasks.len()).collect();
        let mut clock = 0;

        while !pending.is_empty() {
            let chosen = match select_shortest(tasks, &pending, clock) {
                Some(idx) => idx,
                None => {
                    // Idle until the next arrival
                    let next_arrival = pending
                        .iter()
                        .map(|&i| tasks[i].arrival)
                        .min()
                        .unwrap_or(clock);
                    clock = clock.max(next_arrival);
                    continue;
                }
            };

            let task = &mut tasks[chosen];
            let end = clock + task.burst;
            self.state.record(task.id, clock, end)?;
            task.remaining = 0;
            clock = end;
            pending.retain(|&i| i != chosen);
        }

        self.state.finish(tasks);
        Ok(())
    }

    fn trace(&self) -> &Trace {
        self.state.trace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slice;

    #[test]
    fn test_sjf_textbook_example() {
        let mut tasks = vec![
            Task::new(1, 0, 7),
            Task::new(2, 2, 4),
            Task::new(3, 4, 1),
            Task::new(4, 5, 4),
        ];
        let mut sjf = Sjf::new();
        sjf.execute(&mut tasks, None).unwrap();

        assert_eq!(
            sjf.trace().slices(),
            &[
                Slice::new(1, 0, 7),
                Slice::new(3, 7, 8),
                Slice::new(2, 8, 12),
                Slice::new(4, 12, 16),
            ]
        );
        let waits: Vec<i64> = tasks.iter().map(|t| t.wait).collect();
        assert_eq!(waits, vec![0, 6, 3, 7]);
    }

    #[test]
    fn test_sjf_tie_breaks_by_id() {
        let mut tasks = vec![Task::new(5, 0, 3), Task::new(2, 0, 3)];
        let mut sjf = Sjf::new();
        sjf.execute(&mut tasks, None).unwrap();
        assert_eq!(sjf.trace().slices()[0].task_id, 2);
    }

    #[test]
    fn test_sjf_idle_jump() {
        let mut tasks = vec![Task::new(1, 4, 2), Task::new(2, 10, 1)];
        let mut sjf = Sjf::new();
        sjf.execute(&mut tasks, None).unwrap();
        assert_eq!(
            sjf.trace().slices(),
            &[Slice::new(1, 4, 6), Slice::new(2, 10, 11)]
        );
    }

    #[test]
    fn test_sjf_does_not_preempt() {
        // A short job arriving mid-run waits for the long one.
        let mut tasks = vec![Task::new(1, 0, 10), Task::new(2, 1, 1)];
        let mut sjf = Sjf::new();
        sjf.execute(&mut tasks, None).unwrap();
        assert_eq!(sjf.trace().slices()[1], Slice::new(2, 10, 11));
    }

    #[test]
    fn test_sjf_zero_burst() {
        let mut tasks = vec![Task::new(1, 0, 3), Task::new(2, 0, 0)];
        let mut sjf = Sjf::new();
        sjf.execute(&mut tasks, None).unwrap();
        assert_eq!(sjf.trace().slices()[0], Slice::new(2, 0, 0));
        assert_eq!(tasks[1].wait, 0);
    }
}
