//! Simulation orchestrator.
//!
//! # Flow
//! 1. Copy the caller's tasks (the input is never mutated).
//! 2. Resolve the selected policy, including per-level descriptors for the
//!    multilevel queue.
//! 3. Execute it.
//! 4. Hand the trace and tasks to the report engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::report::{Report, Statistics, TaskRow};
use crate::error::{Result, SimError};
use crate::models::{Task, Trace};
use crate::policy::{
    Fcfs, MultilevelQueue, PolicyDescriptor, PolicyKind, RoundRobin, SchedulingPolicy, Sjf,
    DEFAULT_RR_QUANTUM,
};

/// Per-level descriptors for the multilevel queue (priority → descriptor).
///
/// Unset levels use FCFS. See [`PolicyDescriptor::parse`] for the grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelConfig {
    levels: BTreeMap<i32, String>,
}

impl LevelConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the descriptor for a level.
    pub fn with_level(mut self, priority: i32, descriptor: impl Into<String>) -> Self {
        self.set(priority, descriptor);
        self
    }

    /// Sets the descriptor for a level, replacing any previous one.
    pub fn set(&mut self, priority: i32, descriptor: impl Into<String>) {
        self.levels.insert(priority, descriptor.into());
    }

    /// Descriptor configured for a level.
    pub fn get(&self, priority: i32) -> Option<&str> {
        self.levels.get(&priority).map(String::as_str)
    }

    /// Configured levels in ascending priority order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.levels.iter().map(|(&p, d)| (p, d.as_str()))
    }

    /// Whether no level is configured.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Input container for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Policy to run.
    pub policy: PolicyKind,
    /// Tasks to schedule.
    pub tasks: Vec<Task>,
    /// Round Robin quantum; default quantum for bare `RR` levels.
    #[serde(default)]
    pub quantum: Option<i64>,
    /// Multilevel queue level descriptors.
    #[serde(default)]
    pub levels: LevelConfig,
}

impl SimulationRequest {
    /// Creates a request.
    pub fn new(policy: PolicyKind, tasks: Vec<Task>) -> Self {
        Self {
            policy,
            tasks,
            quantum: None,
            levels: LevelConfig::new(),
        }
    }

    /// Sets the quantum.
    pub fn with_quantum(mut self, quantum: i64) -> Self {
        self.quantum = Some(quantum);
        self
    }

    /// Sets the descriptor for a multilevel queue level.
    pub fn with_level(mut self, priority: i32, descriptor: impl Into<String>) -> Self {
        self.levels.set(priority, descriptor);
        self
    }

    /// Replaces the level configuration.
    pub fn with_levels(mut self, levels: LevelConfig) -> Self {
        self.levels = levels;
        self
    }
}

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    policy_name: String,
    trace: Trace,
    rows: Vec<TaskRow>,
    statistics: Statistics,
    timeline: String,
}

impl SimulationResult {
    fn from_run(policy_name: &str, tasks: &[Task], trace: &Trace) -> Self {
        let rows = Report::task_rows(tasks, trace);
        let statistics = Statistics::calculate(&rows, trace);
        Self {
            policy_name: policy_name.to_string(),
            trace: trace.clone(),
            rows,
            statistics,
            timeline: Report::render_timeline(trace),
        }
    }

    /// Name of the policy that produced this result.
    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    /// Full execution trace.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Per-task results, ascending by id.
    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// Row for a single task.
    pub fn row(&self, task_id: u32) -> Option<&TaskRow> {
        self.rows.iter().find(|r| r.id == task_id)
    }

    /// Aggregate statistics.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Rendered text timeline.
    pub fn timeline(&self) -> &str {
        &self.timeline
    }
}

/// Simulation orchestrator.
///
/// # Example
///
/// ```
/// use queue_sim::models::Task;
/// use queue_sim::simulator::{LevelConfig, Simulator};
///
/// let tasks = vec![
///     Task::new(1, 0, 5).with_priority(1),
///     Task::new(2, 1, 3).with_priority(2),
///     Task::new(3, 2, 2).with_priority(1),
/// ];
/// let levels = LevelConfig::new().with_level(1, "SJF").with_level(2, "RR:2");
///
/// let result = Simulator::new().run_mlq(&tasks, &levels, None).unwrap();
/// assert_eq!(result.policy_name(), "MLQ (strict priority)");
/// assert_eq!(result.statistics().busy_time, 10);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    fallback_quantum: i64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            fallback_quantum: DEFAULT_RR_QUANTUM,
        }
    }
}

impl Simulator {
    /// Creates an orchestrator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quantum used for bare `RR` levels when a run supplies none.
    pub fn with_fallback_quantum(mut self, quantum: i64) -> Self {
        self.fallback_quantum = quantum;
        self
    }

    /// Runs `kind` over a copy of `tasks`.
    ///
    /// # Errors
    /// `InvalidArgument` for unschedulable input (see
    /// [`SchedulingPolicy::execute`]), a non-positive quantum, or a
    /// non-positive configured level. Nothing is simulated on error.
    pub fn run(
        &self,
        kind: PolicyKind,
        tasks: &[Task],
        quantum: Option<i64>,
        levels: Option<&LevelConfig>,
    ) -> Result<SimulationResult> {
        let mut working: Vec<Task> = tasks.iter().map(Task::fresh_copy).collect();
        let mut policy = self.resolve_policy(kind, quantum, levels)?;

        log::debug!(
            "running {} over {} tasks (quantum {:?})",
            policy.name(),
            working.len(),
            quantum
        );
        policy.execute(&mut working, quantum)?;

        Ok(SimulationResult::from_run(
            policy.name(),
            &working,
            policy.trace(),
        ))
    }

    /// Runs a request.
    pub fn run_request(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        self.run(
            request.policy,
            &request.tasks,
            request.quantum,
            Some(&request.levels),
        )
    }

    /// Runs first-come, first-served.
    pub fn run_fcfs(&self, tasks: &[Task]) -> Result<SimulationResult> {
        self.run(PolicyKind::Fcfs, tasks, None, None)
    }

    /// Runs non-preemptive shortest job first.
    pub fn run_sjf(&self, tasks: &[Task]) -> Result<SimulationResult> {
        self.run(PolicyKind::Sjf, tasks, None, None)
    }

    /// Runs Round Robin with the given quantum.
    pub fn run_round_robin(&self, tasks: &[Task], quantum: i64) -> Result<SimulationResult> {
        self.run(PolicyKind::RoundRobin, tasks, Some(quantum), None)
    }

    /// Runs the multilevel queue.
    ///
    /// `default_quantum` applies to bare `RR` levels.
    pub fn run_mlq(
        &self,
        tasks: &[Task],
        levels: &LevelConfig,
        default_quantum: Option<i64>,
    ) -> Result<SimulationResult> {
        self.run(
            PolicyKind::MultilevelQueue,
            tasks,
            default_quantum,
            Some(levels),
        )
    }

    /// Builds a runnable policy for a selection.
    pub fn resolve_policy(
        &self,
        kind: PolicyKind,
        quantum: Option<i64>,
        levels: Option<&LevelConfig>,
    ) -> Result<Box<dyn SchedulingPolicy>> {
        let policy: Box<dyn SchedulingPolicy> = match kind {
            PolicyKind::Fcfs => Box::new(Fcfs::new()),
            PolicyKind::Sjf => Box::new(Sjf::new()),
            PolicyKind::RoundRobin => {
                if let Some(q) = quantum.filter(|&q| q <= 0) {
                    return Err(SimError::invalid(format!("quantum must be > 0, got {q}")));
                }
                Box::new(RoundRobin::new())
            }
            PolicyKind::MultilevelQueue => Box::new(self.build_mlq(levels, quantum)?),
        };
        Ok(policy)
    }

    fn build_mlq(
        &self,
        levels: Option<&LevelConfig>,
        default_quantum: Option<i64>,
    ) -> Result<MultilevelQueue> {
        let default_quantum = default_quantum.unwrap_or(self.fallback_quantum);

        let mut mlq = MultilevelQueue::new();
        for (priority, descriptor) in levels.into_iter().flat_map(|l| l.iter()) {
            let sub = PolicyDescriptor::parse(descriptor, default_quantum);
            // Only a bare `RR` level takes the default quantum.
            if let PolicyDescriptor::RoundRobin { quantum } = sub {
                if quantum <= 0 {
                    return Err(SimError::invalid(format!(
                        "queue level {priority} uses {descriptor:?} but the default quantum is {quantum}; it must be > 0"
                    )));
                }
            }
            mlq.configure_level(priority, sub.build())?;
        }
        Ok(mlq)
    }
}
