//! Workload construction: the demo customer line and random task sets.
//!
//! Random workloads are reproducible: the generator draws only from the
//! `Rng` it is given, so a seeded generator always yields the same tasks.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Task, DEFAULT_CATEGORY};

/// The six-customer demo line.
///
/// | ID | Arrival | Burst | Priority | Category |
/// |----|---------|-------|----------|----------|
/// | 1 | 0 | 5 | 1 | VIP |
/// | 2 | 1 | 3 | 2 | Regular |
/// | 3 | 2 | 2 | 1 | AdultoMayor |
/// | 4 | 3 | 1 | 3 | Regular |
/// | 5 | 5 | 4 | 2 | Foraneo |
/// | 6 | 6 | 2 | 3 | Embarazada |
pub fn demo_workload() -> Vec<Task> {
    [
        (1, 0, 5, 1, "VIP"),
        (2, 1, 3, 2, "Regular"),
        (3, 2, 2, 1, "AdultoMayor"),
        (4, 3, 1, 3, "Regular"),
        (5, 5, 4, 2, "Foraneo"),
        (6, 6, 2, 3, "Embarazada"),
    ]
    .into_iter()
    .map(|(id, arrival, burst, priority, category)| {
        Task::new(id, arrival, burst)
            .with_priority(priority)
            .with_category(category)
    })
    .collect()
}

/// Random workload generator.
///
/// # Example
///
/// ```
/// use queue_sim::workload::WorkloadGenerator;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let generator = WorkloadGenerator::new(5).with_burst_range(1, 4);
/// let tasks = generator.generate(&mut StdRng::seed_from_u64(42));
/// assert_eq!(tasks.len(), 5);
/// assert!(tasks.iter().all(|t| (1..=4).contains(&t.burst)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadGenerator {
    /// Number of tasks.
    pub count: usize,
    /// Latest possible arrival (inclusive).
    pub max_arrival: i64,
    /// Shortest burst (inclusive).
    pub min_burst: i64,
    /// Longest burst (inclusive).
    pub max_burst: i64,
    /// Priorities are drawn from `1..=levels`.
    pub levels: i32,
    /// Category pool; empty means every task is `Regular`.
    pub categories: Vec<String>,
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self {
            count: 10,
            max_arrival: 20,
            min_burst: 1,
            max_burst: 10,
            levels: 3,
            categories: Vec::new(),
        }
    }
}

impl WorkloadGenerator {
    /// Creates a generator for `count` tasks with default ranges.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    /// Sets the latest arrival.
    pub fn with_max_arrival(mut self, max_arrival: i64) -> Self {
        self.max_arrival = max_arrival;
        self
    }

    /// Sets the burst range.
    pub fn with_burst_range(mut self, min_burst: i64, max_burst: i64) -> Self {
        self.min_burst = min_burst;
        self.max_burst = max_burst;
        self
    }

    /// Sets the number of priority levels.
    pub fn with_levels(mut self, levels: i32) -> Self {
        self.levels = levels;
        self
    }

    /// Sets the category pool.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Generates tasks with ids `1..=count`, numbered in arrival order.
    ///
    /// Out-of-range settings are clamped: arrivals and bursts are never
    /// negative and there is always at least one priority level.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Task> {
        let max_arrival = self.max_arrival.max(0);
        let min_burst = self.min_burst.max(0);
        let max_burst = self.max_burst.max(min_burst);
        let levels = self.levels.max(1);

        let mut drawn: Vec<(i64, i64, i32, String)> = (0..self.count)
            .map(|_| {
                let category = if self.categories.is_empty() {
                    DEFAULT_CATEGORY.to_string()
                } else {
                    self.categories[rng.random_range(0..self.categories.len())].clone()
                };
                (
                    rng.random_range(0..=max_arrival),
                    rng.random_range(min_burst..=max_burst),
                    rng.random_range(1..=levels),
                    category,
                )
            })
            .collect();
        drawn.sort_by_key(|d| d.0);

        drawn
            .into_iter()
            .zip(1u32..)
            .map(|((arrival, burst, priority, category), id)| {
                Task::new(id, arrival, burst)
                    .with_priority(priority)
                    .with_category(category)
            })
            .collect()
    }
}
