//! Multilevel queue with strict priority between levels.
//!
//! # Algorithm
//! Tasks are partitioned by priority level (non-positive priorities share the
//! lowest level). Levels run in ascending order, 1 first. For each level:
//!
//! 1. Copy the level's tasks with arrivals re-based onto a local clock:
//!    `max(0, arrival - elapsed)`.
//! 2. Run the level's sub-policy (FCFS when unconfigured) from local t=0.
//! 3. Shift every produced slice by `elapsed` into the global trace.
//! 4. Advance `elapsed` to the latest shifted slice end.
//!
//! A level always drains completely before the next one starts, even when
//! lower-priority tasks arrived earlier. There is no preemption across levels.

use std::collections::{BTreeMap, BTreeSet};

use super::{arrival_order, Fcfs, PolicyState, SchedulingPolicy};
use crate::error::{Result, SimError};
use crate::models::{Task, Trace};

/// Multilevel queue policy.
#[derive(Debug, Default)]
pub struct MultilevelQueue {
    levels: BTreeMap<i32, Box<dyn SchedulingPolicy>>,
    state: PolicyState,
}

impl MultilevelQueue {
    const NAME: &'static str = "MLQ (strict priority)";

    /// Creates a queue where every level uses FCFS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a sub-policy to a priority level, replacing any previous one.
    ///
    /// # Errors
    /// `InvalidArgument` if `priority <= 0`.
    pub fn configure_level(
        &mut self,
        priority: i32,
        policy: Box<dyn SchedulingPolicy>,
    ) -> Result<()> {
        if priority <= 0 {
            return Err(SimError::invalid(format!(
                "queue level must be >= 1 (1 = highest), got {priority}"
            )));
        }
        self.levels.insert(priority, policy);
        Ok(())
    }

    /// Builder form of [`configure_level`](Self::configure_level).
    pub fn with_level(mut self, priority: i32, policy: Box<dyn SchedulingPolicy>) -> Result<Self> {
        self.configure_level(priority, policy)?;
        Ok(self)
    }

    /// Name of the sub-policy serving `priority`.
    pub fn level_policy_name(&self, priority: i32) -> &'static str {
        self.levels
            .get(&priority)
            .map(|p| p.name())
            .unwrap_or("FIFO")
    }

    /// Number of explicitly configured levels.
    pub fn configured_levels(&self) -> usize {
        self.levels.len()
    }

    fn run_levels(&mut self, tasks: &mut [Task], quantum: Option<i64>) -> Result<()> {
        let levels: BTreeSet<i32> = tasks.iter().map(Task::queue_level).collect();
        let order = arrival_order(tasks);
        let mut elapsed = 0;

        for level in levels {
            let members: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&i| tasks[i].queue_level() == level)
                .collect();

            let mut local: Vec<Task> = members
                .iter()
                .map(|&i| {
                    let mut copy = tasks[i].fresh_copy();
                    copy.arrival = (copy.arrival - elapsed).max(0);
                    copy
                })
                .collect();

            let mut fallback = Fcfs::new();
            let policy: &mut dyn SchedulingPolicy = match self.levels.get_mut(&level) {
                Some(policy) => &mut **policy,
                None => &mut fallback,
            };
            log::debug!(
                "[MLQ] level {level}: {} tasks via {} at t={elapsed}",
                local.len(),
                policy.name()
            );

            policy.reset();
            policy.execute(&mut local, quantum)?;

            let mut level_end = elapsed;
            for slice in policy.trace().slices() {
                let global = slice.shifted(elapsed);
                self.state.record(global.task_id, global.start, global.end)?;
                level_end = level_end.max(global.end);
            }

            for (copy, &idx) in local.iter().zip(&members) {
                tasks[idx].remaining = copy.remaining;
            }
            elapsed = level_end;
        }
        Ok(())
    }
}

impl SchedulingPolicy for MultilevelQueue {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn execute(&mut self, tasks: &mut [Task], quantum: Option<i64>) -> Result<()> {
        self.check_quantum(quantum)?;
        self.state.begin(Self::NAME, tasks)?;
        self.run_levels(tasks, quantum)?;
        self.state.finish(tasks);
        Ok(())
    }

    /// Every configured level must accept `quantum`.
    fn check_quantum(&self, quantum: Option<i64>) -> Result<()> {
        for (level, policy) in &self.levels {
            policy.check_quantum(quantum).map_err(|err| {
                SimError::invalid(format!("queue level {level} ({}): {err}", policy.name()))
            })?;
        }
        Ok(())
    }

    fn trace(&self) -> &Trace {
        self.state.trace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Slice, LOWEST_LEVEL};
    use crate::policy::{RoundRobin, Sjf};

    #[test]
    fn test_mlq_strict_level_order() {
        // Level 2 task arrives first but waits for level 1 to drain.
        let mut tasks = vec![
            Task::new(1, 0, 3).with_priority(2),
            Task::new(2, 4, 2).with_priority(1),
        ];
        let mut mlq = MultilevelQueue::new();
        mlq.execute(&mut tasks, None).unwrap();

        assert_eq!(
            mlq.trace().slices(),
            &[Slice::new(2, 4, 6), Slice::new(1, 6, 9)]
        );
        assert_eq!(tasks[0].wait, 6);
        assert_eq!(tasks[1].wait, 0);
    }

    #[test]
    fn test_mlq_rebases_arrivals() {
        // Level 2 tasks arriving before level 1 ends start immediately after it.
        let mut tasks = vec![
            Task::new(1, 0, 5).with_priority(1),
            Task::new(2, 2, 1).with_priority(2),
            Task::new(3, 9, 1).with_priority(2),
        ];
        let mut mlq = MultilevelQueue::new();
        mlq.execute(&mut tasks, None).unwrap();

        assert_eq!(
            mlq.trace().slices(),
            &[Slice::new(1, 0, 5), Slice::new(2, 5, 6), Slice::new(3, 9, 10)]
        );
    }

    #[test]
    fn test_mlq_sub_policies() {
        let mut tasks = vec![
            Task::new(1, 0, 4).with_priority(1),
            Task::new(2, 0, 1).with_priority(1),
            Task::new(3, 0, 3).with_priority(2),
            Task::new(4, 0, 3).with_priority(2),
        ];
        let mut mlq = MultilevelQueue::new()
            .with_level(1, Box::new(Sjf::new()))
            .unwrap()
            .with_level(2, Box::new(RoundRobin::with_quantum(2)))
            .unwrap();
        mlq.execute(&mut tasks, None).unwrap();

        assert_eq!(
            mlq.trace().slices(),
            &[
                Slice::new(2, 0, 1),
                Slice::new(1, 1, 5),
                Slice::new(3, 5, 7),
                Slice::new(4, 7, 9),
                Slice::new(3, 9, 10),
                Slice::new(4, 10, 11),
            ]
        );
        assert!(tasks.iter().all(Task::is_finished));
    }

    #[test]
    fn test_mlq_non_positive_priority_runs_last() {
        let mut tasks = vec![
            Task::new(1, 0, 2).with_priority(0),
            Task::new(2, 0, 2).with_priority(7),
            Task::new(3, 0, 2).with_priority(-1),
        ];
        let mut mlq = MultilevelQueue::new();
        mlq.execute(&mut tasks, None).unwrap();

        let ids: Vec<u32> = mlq.trace().slices().iter().map(|s| s.task_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(tasks[0].queue_level(), LOWEST_LEVEL);
    }

    #[test]
    fn test_mlq_rejects_non_positive_level() {
        let mut mlq = MultilevelQueue::new();
        assert!(mlq.configure_level(0, Box::new(Fcfs::new())).is_err());
        assert!(mlq.configure_level(-2, Box::new(Fcfs::new())).is_err());
        assert!(mlq.configure_level(1, Box::new(Fcfs::new())).is_ok());
        assert_eq!(mlq.configured_levels(), 1);
    }

    #[test]
    fn test_mlq_level_names() {
        let mlq = MultilevelQueue::new()
            .with_level(2, Box::new(RoundRobin::with_quantum(3)))
            .unwrap();
        assert_eq!(mlq.level_policy_name(2), "Round Robin");
        assert_eq!(mlq.level_policy_name(1), "FIFO");
    }

    #[test]
    fn test_mlq_reused_sub_policy_is_reset() {
        let mut mlq = MultilevelQueue::new()
            .with_level(1, Box::new(Fcfs::new()))
            .unwrap();
        let mut tasks = vec![Task::new(1, 0, 2).with_priority(1)];
        mlq.execute(&mut tasks, None).unwrap();

        mlq.reset();
        mlq.execute(&mut tasks, None).unwrap();
        assert_eq!(mlq.trace().slices(), &[Slice::new(1, 0, 2)]);
    }

    #[test]
    fn test_mlq_level_quantum_checked_before_any_level_runs() {
        // Round Robin level without any quantum
        let mut mlq = MultilevelQueue::new()
            .with_level(2, Box::new(RoundRobin::new()))
            .unwrap();
        let mut tasks = vec![
            Task::new(1, 0, 2).with_priority(1),
            Task::new(2, 0, 2).with_priority(2),
        ];
        assert!(mlq.check_quantum(None).is_err());
        let err = mlq.execute(&mut tasks, None).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
        assert!(mlq.trace().is_empty());
        // Level 1 never ran: its task is untouched.
        assert_eq!(tasks[0].remaining, 2);
        assert_eq!(tasks[0].finish, 0);

        // The rejected call does not consume the run.
        mlq.configure_level(2, Box::new(RoundRobin::with_quantum(1)))
            .unwrap();
        mlq.execute(&mut tasks, None).unwrap();
        assert_eq!(mlq.trace().len(), 3);
    }

    #[test]
    fn test_mlq_forwards_quantum() {
        let mut mlq = MultilevelQueue::new()
            .with_level(1, Box::new(RoundRobin::new()))
            .unwrap();
        let mut tasks = vec![Task::new(1, 0, 3).with_priority(1)];
        mlq.execute(&mut tasks, Some(1)).unwrap();
        assert_eq!(mlq.trace().len(), 3);
    }
}
