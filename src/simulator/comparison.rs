//! Comparison across a history of runs.

use serde::{Deserialize, Serialize};

use super::SimulationResult;

/// Summary of several runs, usually the same workload under different
/// policies.
///
/// Best-run fields are indices into the compared history; the earliest run
/// wins ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Number of runs compared.
    pub runs: usize,
    /// Run with the lowest average wait.
    pub best_wait: usize,
    /// Run with the lowest average turnaround.
    pub best_turnaround: usize,
    /// Run with the highest utilization.
    pub best_utilization: usize,
    /// Mean of the runs' average waits.
    pub mean_wait: f64,
    /// Mean of the runs' average turnarounds.
    pub mean_turnaround: f64,
    /// Mean utilization across runs.
    pub mean_utilization: f64,
}

impl Comparison {
    /// Compares a history of runs. Returns `None` for an empty history.
    pub fn of(history: &[SimulationResult]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }

        let metric = |f: fn(&SimulationResult) -> f64| history.iter().map(f).collect::<Vec<_>>();
        let waits = metric(|r| r.statistics().avg_wait);
        let turnarounds = metric(|r| r.statistics().avg_turnaround);
        let utilizations = metric(|r| r.statistics().utilization);

        let n = history.len() as f64;
        Some(Self {
            runs: history.len(),
            best_wait: position_by(&waits, |candidate, best| candidate < best),
            best_turnaround: position_by(&turnarounds, |candidate, best| candidate < best),
            best_utilization: position_by(&utilizations, |candidate, best| candidate > best),
            mean_wait: waits.iter().sum::<f64>() / n,
            mean_turnaround: turnarounds.iter().sum::<f64>() / n,
            mean_utilization: utilizations.iter().sum::<f64>() / n,
        })
    }
}

/// Index of the first value that `better` prefers over all earlier ones.
fn position_by(values: &[f64], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if better(v, values[best]) {
            best = i;
        }
    }
    best
}
