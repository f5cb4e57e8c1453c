//! Execution trace model.
//!
//! A trace is the ordered list of slices emitted by one simulation run.
//! Slices stay in the order policies produced them; only the timeline
//! renderer sorts and merges them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// One contiguous interval during which a single task held the execution unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// Task occupying the unit.
    pub task_id: u32,
    /// Start time (inclusive).
    pub start: i64,
    /// End time (exclusive).
    pub end: i64,
}

impl Slice {
    /// Creates a slice.
    pub fn new(task_id: u32, start: i64, end: i64) -> Self {
        Self {
            task_id,
            start,
            end,
        }
    }

    /// Duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// The same slice moved `offset` units later.
    #[inline]
    pub fn shifted(&self, offset: i64) -> Self {
        Self::new(self.task_id, self.start + offset, self.end + offset)
    }
}

/// Ordered sequence of slices produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    slices: Vec<Slice>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slice.
    ///
    /// # Errors
    /// `InvalidArgument` if `end < start`.
    pub fn record(&mut self, task_id: u32, start: i64, end: i64) -> Result<()> {
        if end < start {
            return Err(SimError::invalid(format!(
                "slice for task {task_id} ends at {end} before it starts at {start}"
            )));
        }
        log::trace!("slice P{task_id} [{start}, {end})");
        self.slices.push(Slice::new(task_id, start, end));
        Ok(())
    }

    /// Removes all slices.
    pub fn clear(&mut self) {
        self.slices.clear();
    }

    /// Slices in emission order.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether no slice was emitted.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Sum of all slice durations.
    pub fn busy_time(&self) -> i64 {
        self.slices.iter().map(Slice::duration).sum()
    }

    /// Earliest slice start, if any.
    pub fn first_start(&self) -> Option<i64> {
        self.slices.iter().map(|s| s.start).min()
    }

    /// Latest slice end, if any.
    pub fn last_end(&self) -> Option<i64> {
        self.slices.iter().map(|s| s.end).max()
    }

    /// Latest end minus earliest start; 0 for an empty trace.
    pub fn span(&self) -> i64 {
        match (self.first_start(), self.last_end()) {
            (Some(start), Some(end)) => (end - start).max(0),
            _ => 0,
        }
    }

    /// All slices belonging to a task.
    pub fn slices_for(&self, task_id: u32) -> Vec<&Slice> {
        self.slices.iter().filter(|s| s.task_id == task_id).collect()
    }

    /// First start and last end of a task's slices.
    pub fn interval_of(&self, task_id: u32) -> Option<(i64, i64)> {
        self.slices
            .iter()
            .filter(|s| s.task_id == task_id)
            .fold(None, |acc, s| match acc {
                None => Some((s.start, s.end)),
                Some((lo, hi)) => Some((lo.min(s.start), hi.max(s.end))),
            })
    }

    /// Completion time of a task (latest end of its slices).
    pub fn completion_time(&self, task_id: u32) -> Option<i64> {
        self.interval_of(task_id).map(|(_, end)| end)
    }

    /// Total execution time granted to a task.
    pub fn executed_time(&self, task_id: u32) -> i64 {
        self.slices_for(task_id).iter().map(|s| s.duration()).sum()
    }

    /// Slices sorted by (start, task id) with contiguous same-task slices
    /// merged into single runs.
    ///
    /// The trace itself is left untouched.
    pub fn merged_runs(&self) -> Vec<Slice> {
        let mut sorted = self.slices.clone();
        sorted.sort_by_key(|s| (s.start, s.task_id));

        let mut runs: Vec<Slice> = Vec::with_capacity(sorted.len());
        for slice in sorted {
            match runs.last_mut() {
                Some(last) if last.task_id == slice.task_id && last.end == slice.start => {
                    last.end = slice.end;
                }
                _ => runs.push(slice),
            }
        }
        runs
    }
}
