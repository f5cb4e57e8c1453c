//! Scheduling policies.
//!
//! Every policy implements [`SchedulingPolicy`]: `reset()` discards the
//! retained trace, `execute()` runs the algorithm to completion on a task
//! list, populating each task's metrics and appending slices to the trace.
//!
//! | Policy | Preemptive | Tie-break |
//! |--------|-----------|-----------|
//! | [`Fcfs`] | no | arrival, id |
//! | [`Sjf`] | no | burst, arrival, id |
//! | [`RoundRobin`] | yes (quantum) | arrival, id; late arrivals ahead of the preempted task |
//! | [`MultilevelQueue`] | per level | strict level order, then the level's sub-policy |
//!
//! # Usage
//!
//! ```
//! use queue_sim::models::Task;
//! use queue_sim::policy::{RoundRobin, SchedulingPolicy};
//!
//! let mut tasks = vec![Task::new(1, 0, 5), Task::new(2, 1, 3)];
//! let mut rr = RoundRobin::new();
//! rr.execute(&mut tasks, Some(2)).unwrap();
//! assert_eq!(rr.trace().len(), 5);
//! assert_eq!(tasks[0].finish, 8);
//! ```

mod descriptor;
mod fcfs;
mod mlq;
mod round_robin;
mod sjf;

pub use descriptor::{PolicyDescriptor, PolicyKind, DEFAULT_RR_QUANTUM};
pub use fcfs::Fcfs;
pub use mlq::MultilevelQueue;
pub use round_robin::RoundRobin;
pub use sjf::Sjf;

use std::fmt::Debug;

use crate::error::{Result, SimError};
use crate::models::{Task, Trace};

/// A CPU scheduling policy.
///
/// `execute` may be called once per `reset`; a fresh policy starts reset.
/// Given identical input, `execute` always yields an identical trace.
pub trait SchedulingPolicy: Debug {
    /// Human-readable policy name.
    fn name(&self) -> &'static str;

    /// Discards the retained trace and re-arms the policy.
    fn reset(&mut self);

    /// Runs the policy over `tasks`, mutating their scheduling metrics.
    ///
    /// `quantum` is ignored by non-preemptive policies.
    ///
    /// # Errors
    /// `InvalidArgument` on negative burst or arrival, times beyond the
    /// `i64` range, a missing or non-positive quantum where one is
    /// required, or a repeated call without `reset()`. Errors are raised
    /// before any slice is emitted.
    fn execute(&mut self, tasks: &mut [Task], quantum: Option<i64>) -> Result<()>;

    /// Checks that `execute` would accept `quantum`, without running.
    ///
    /// Non-preemptive policies accept any quantum.
    fn check_quantum(&self, _quantum: Option<i64>) -> Result<()> {
        Ok(())
    }

    /// Slices emitted by the last `execute`.
    fn trace(&self) -> &Trace;
}

/// Trace plus run-once bookkeeping shared by all policies.
#[derive(Debug, Clone, Default)]
pub(crate) struct PolicyState {
    trace: Trace,
    executed: bool,
}

impl PolicyState {
    pub(crate) fn reset(&mut self) {
        self.trace.clear();
        self.executed = false;
    }

    /// Validates input and clears task metrics before the first slice.
    pub(crate) fn begin(&mut self, policy: &str, tasks: &mut [Task]) -> Result<()> {
        if self.executed {
            return Err(SimError::invalid(format!(
                "{policy} already executed; call reset() before running again"
            )));
        }
        check_tasks(tasks)?;

        for task in tasks.iter_mut() {
            task.reset_metrics();
        }
        self.executed = true;
        log::debug!("[{policy}] scheduling {} tasks", tasks.len());
        Ok(())
    }

    pub(crate) fn record(&mut self, task_id: u32, start: i64, end: i64) -> Result<()> {
        self.trace.record(task_id, start, end)
    }

    /// Derives final metrics for every task from the trace.
    pub(crate) fn finish(&self, tasks: &mut [Task]) {
        for task in tasks.iter_mut() {
            task.apply_trace(&self.trace);
        }
    }

    pub(crate) fn trace(&self) -> &Trace {
        &self.trace
    }
}

/// Rejects tasks no policy can schedule.
///
/// Every clock value a policy reaches is bounded by the latest arrival plus
/// the total burst, so checking that sum here keeps all later clock
/// arithmetic in range.
pub(crate) fn check_tasks(tasks: &[Task]) -> Result<()> {
    let mut latest_arrival: i64 = 0;
    let mut total_burst: i64 = 0;
    for task in tasks {
        if task.burst < 0 {
            return Err(SimError::invalid(format!(
                "task {} has negative burst {}",
                task.id, task.burst
            )));
        }
        if task.arrival < 0 {
            return Err(SimError::invalid(format!(
                "task {} has negative arrival {}",
                task.id, task.arrival
            )));
        }
        latest_arrival = latest_arrival.max(task.arrival);
        total_burst = total_burst.checked_add(task.burst).ok_or_else(horizon_overflow)?;
    }
    latest_arrival
        .checked_add(total_burst)
        .ok_or_else(horizon_overflow)?;
    Ok(())
}

fn horizon_overflow() -> SimError {
    SimError::invalid("latest arrival plus total burst exceeds the representable time range")
}

/// Indices of `tasks` sorted by (arrival, id).
pub(crate) fn arrival_order(tasks: &[Task]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by_key(|&i| (tasks[i].arrival, tasks[i].id));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_runs_once_per_reset() {
        let mut state = PolicyState::default();
        let mut tasks = vec![Task::new(1, 0, 2)];
        state.begin("test", &mut tasks).unwrap();
        assert!(state.begin("test", &mut tasks).is_err());

        state.reset();
        assert!(state.begin("test", &mut tasks).is_ok());
    }

    #[test]
    fn test_negative_burst_rejected() {
        let mut state = PolicyState::default();
        let mut tasks = vec![Task::new(1, 0, 2), Task::new(2, 0, -1)];
        let err = state.begin("test", &mut tasks).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
        // Failed validation does not consume the run.
        tasks[1].burst = 1;
        assert!(state.begin("test", &mut tasks).is_ok());
    }

    #[test]
    fn test_negative_arrival_rejected() {
        assert!(check_tasks(&[Task::new(1, -3, 2)]).is_err());
        assert!(check_tasks(&[Task::new(1, 0, 0)]).is_ok());
    }

    #[test]
    fn test_time_horizon_overflow_rejected() {
        assert!(check_tasks(&[Task::new(1, i64::MAX - 5, 5)]).is_ok());
        assert!(check_tasks(&[Task::new(1, i64::MAX - 1, 5)]).is_err());
        assert!(check_tasks(&[Task::new(1, 0, i64::MAX), Task::new(2, 0, 1)]).is_err());

        let mut state = PolicyState::default();
        let mut tasks = vec![Task::new(1, i64::MAX - 1, 5)];
        let err = state.begin("test", &mut tasks).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_arrival_order_breaks_ties_by_id() {
        let tasks = vec![Task::new(3, 1, 1), Task::new(1, 1, 1), Task::new(2, 0, 1)];
        let order = arrival_order(&tasks);
        let ids: Vec<u32> = order.iter().map(|&i| tasks[i].id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
