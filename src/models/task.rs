//! Task (customer) model.
//!
//! A task is one customer waiting in a service line: it arrives at some
//! instant, needs a fixed amount of service (its burst), and belongs to a
//! priority level used by the multilevel queue.
//!
//! # Time Representation
//! All times are integer time units relative to the simulation epoch (t=0).

use serde::{Deserialize, Serialize};

use super::Trace;

/// Priority assigned to tasks that do not specify one.
pub const DEFAULT_PRIORITY: i32 = 3;

/// Category tag assigned to tasks that do not specify one.
pub const DEFAULT_CATEGORY: &str = "Regular";

/// Queue level used for tasks whose priority is zero or negative.
///
/// Such tasks share a single bucket serviced after every positive level.
pub const LOWEST_LEVEL: i32 = i32::MAX;

/// A task to be scheduled on the single execution unit.
///
/// Input fields (`id`, `arrival`, `burst`, `priority`, `category`) are set by
/// the caller. The remaining fields are scheduling state, populated by a
/// policy while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier within one simulation.
    pub id: u32,
    /// Arrival time.
    pub arrival: i64,
    /// Total execution time required.
    pub burst: i64,
    /// Execution time still owed (decremented by preemptive policies).
    #[serde(default)]
    pub remaining: i64,
    /// Priority level (1 = highest).
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Opaque client category, carried through to reports.
    #[serde(default = "default_category")]
    pub category: String,
    /// Start of the first slice, or `arrival` if never scheduled.
    #[serde(default)]
    pub start: i64,
    /// End of the last slice, or `arrival` if never scheduled.
    #[serde(default)]
    pub finish: i64,
    /// `finish - arrival`.
    #[serde(default)]
    pub turnaround: i64,
    /// `max(0, turnaround - burst)`.
    #[serde(default)]
    pub wait: i64,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Task {
    /// Creates a task with default priority and category.
    pub fn new(id: u32, arrival: i64, burst: i64) -> Self {
        Self {
            id,
            arrival,
            burst,
            remaining: burst,
            priority: DEFAULT_PRIORITY,
            category: DEFAULT_CATEGORY.to_string(),
            start: 0,
            finish: 0,
            turnaround: 0,
            wait: 0,
        }
    }

    /// Sets the priority level.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the client category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Copies the input fields only, with `remaining` reset to `burst`.
    pub fn fresh_copy(&self) -> Self {
        Self::new(self.id, self.arrival, self.burst)
            .with_priority(self.priority)
            .with_category(self.category.clone())
    }

    /// Clears all scheduling state.
    pub fn reset_metrics(&mut self) {
        self.remaining = self.burst;
        self.start = 0;
        self.finish = 0;
        self.turnaround = 0;
        self.wait = 0;
    }

    /// Queue level used by the multilevel queue.
    ///
    /// Non-positive priorities fold into [`LOWEST_LEVEL`].
    pub fn queue_level(&self) -> i32 {
        if self.priority <= 0 {
            LOWEST_LEVEL
        } else {
            self.priority
        }
    }

    /// Whether no execution time is owed.
    pub fn is_finished(&self) -> bool {
        self.remaining <= 0
    }

    /// Derives start, finish, turnaround and wait from this task's slices.
    pub fn apply_trace(&mut self, trace: &Trace) {
        let (start, finish) = trace
            .interval_of(self.id)
            .unwrap_or((self.arrival, self.arrival));
        self.start = start;
        self.finish = finish;
        self.turnaround = finish - self.arrival;
        self.wait = (self.turnaround - self.burst).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new(7, 3, 5).with_priority(1).with_category("VIP");
        assert_eq!(task.id, 7);
        assert_eq!(task.arrival, 3);
        assert_eq!(task.burst, 5);
        assert_eq!(task.remaining, 5);
        assert_eq!(task.priority, 1);
        assert_eq!(task.category, "VIP");
    }

    #[test]
    fn test_task_defaults() {
        let task = Task::new(1, 0, 4);
        assert_eq!(task.priority, DEFAULT_PRIORITY);
        assert_eq!(task.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_fresh_copy_drops_state() {
        let mut task = Task::new(1, 2, 6).with_category("Foraneo");
        task.remaining = 0;
        task.finish = 40;
        task.wait = 12;

        let copy = task.fresh_copy();
        assert_eq!(copy.remaining, 6);
        assert_eq!(copy.finish, 0);
        assert_eq!(copy.wait, 0);
        assert_eq!(copy.category, "Foraneo");
    }

    #[test]
    fn test_queue_level_folds_non_positive() {
        assert_eq!(Task::new(1, 0, 1).with_priority(2).queue_level(), 2);
        assert_eq!(Task::new(1, 0, 1).with_priority(0).queue_level(), LOWEST_LEVEL);
        assert_eq!(Task::new(1, 0, 1).with_priority(-4).queue_level(), LOWEST_LEVEL);
    }

    #[test]
    fn test_apply_trace() {
        let mut trace = Trace::new();
        trace.record(1, 2, 4).unwrap();
        trace.record(2, 4, 6).unwrap();
        trace.record(1, 6, 9).unwrap();

        let mut task = Task::new(1, 1, 5);
        task.apply_trace(&trace);
        assert_eq!(task.start, 2);
        assert_eq!(task.finish, 9);
        assert_eq!(task.turnaround, 8);
        assert_eq!(task.wait, 3);
    }

    #[test]
    fn test_apply_trace_never_scheduled() {
        let mut task = Task::new(3, 5, 0);
        task.apply_trace(&Trace::new());
        assert_eq!(task.start, 5);
        assert_eq!(task.finish, 5);
        assert_eq!(task.turnaround, 0);
        assert_eq!(task.wait, 0);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let task: Task = serde_json::from_str(r#"{"id": 4, "arrival": 3, "burst": 2}"#).unwrap();
        assert_eq!(task.priority, 3);
        assert_eq!(task.category, "Regular");
        assert_eq!(task.remaining, 0);
        assert_eq!(task.fresh_copy().remaining, 2);
    }
}
