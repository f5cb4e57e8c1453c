//! Trace-derived metrics and timeline rendering.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Start | Earliest slice start of the task (arrival if never scheduled) |
//! | Finish | Latest slice end of the task (arrival if never scheduled) |
//! | Turnaround | finish - arrival |
//! | Wait | max(0, turnaround - burst) |
//! | Busy time | Sum of slice durations |
//! | Span | Latest slice end - earliest slice start |
//! | Utilization | busy / span (0 when span is 0) |
//!
//! Averages divide by the task count and are 0 for an empty task list.

use serde::{Deserialize, Serialize};

use crate::models::{Task, Trace};

/// Text rendered for a trace with no slices.
pub const EMPTY_TIMELINE: &str = "(no execution)";

/// Per-task row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    /// Task identifier.
    pub id: u32,
    /// Arrival time.
    pub arrival: i64,
    /// Required execution time.
    pub burst: i64,
    /// First slice start.
    pub start: i64,
    /// Last slice end.
    pub finish: i64,
    /// Time spent not executing.
    pub wait: i64,
    /// Finish minus arrival.
    pub turnaround: i64,
    /// Priority level.
    pub priority: i32,
    /// Client category.
    pub category: String,
}

impl TaskRow {
    /// Builds the row from a task whose metrics are already populated.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            arrival: task.arrival,
            burst: task.burst,
            start: task.start,
            finish: task.finish,
            wait: task.wait,
            turnaround: task.turnaround,
            priority: task.priority,
            category: task.category.clone(),
        }
    }

    /// Builds the row for `task` from its slices in `trace`.
    pub fn from_trace(task: &Task, trace: &Trace) -> Self {
        let mut measured = task.clone();
        measured.apply_trace(trace);
        Self::from_task(&measured)
    }
}

/// Aggregate statistics of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Mean wait across tasks.
    pub avg_wait: f64,
    /// Mean turnaround across tasks.
    pub avg_turnaround: f64,
    /// Sum of slice durations.
    pub busy_time: i64,
    /// Latest end minus earliest start of the trace.
    pub span: i64,
    /// busy_time / span, or 0 when span is 0.
    pub utilization: f64,
}

impl Statistics {
    /// Computes statistics from the results table and the trace.
    pub fn calculate(rows: &[TaskRow], trace: &Trace) -> Self {
        let (avg_wait, avg_turnaround) = if rows.is_empty() {
            (0.0, 0.0)
        } else {
            let n = rows.len() as f64;
            let wait: i64 = rows.iter().map(|r| r.wait).sum();
            let turnaround: i64 = rows.iter().map(|r| r.turnaround).sum();
            (wait as f64 / n, turnaround as f64 / n)
        };

        let busy_time = trace.busy_time();
        let span = trace.span();
        let utilization = if span > 0 {
            busy_time as f64 / span as f64
        } else {
            0.0
        };

        Self {
            avg_wait,
            avg_turnaround,
            busy_time,
            span,
            utilization,
        }
    }
}

/// Report engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Report;

impl Report {
    /// Results table, one row per task in ascending id order.
    pub fn task_rows(tasks: &[Task], trace: &Trace) -> Vec<TaskRow> {
        let mut rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::from_trace(t, trace)).collect();
        rows.sort_by_key(|r| r.id);
        rows
    }

    /// Aggregate statistics for `tasks` under `trace`.
    pub fn statistics(tasks: &[Task], trace: &Trace) -> Statistics {
        Statistics::calculate(&Self::task_rows(tasks, trace), trace)
    }

    /// Two-line text timeline.
    ///
    /// Contiguous slices of the same task are drawn as one run:
    ///
    /// ```text
    /// | P1 | P2 | P1 |
    /// 0    2    4    8
    /// ```
    pub fn render_timeline(trace: &Trace) -> String {
        let runs = trace.merged_runs();
        let Some(first) = runs.first() else {
            return EMPTY_TIMELINE.to_string();
        };

        let mut bars = String::from("|");
        let mut times = first.start.to_string();
        for run in &runs {
            let label = format!(" P{} ", run.task_id);
            times.push_str(&format!("{:>width$}", run.end, width = label.len() + 1));
            bars.push_str(&label);
            bars.push('|');
        }

        format!("{bars}\n{times}")
    }
}
