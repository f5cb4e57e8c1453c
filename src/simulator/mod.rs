//! Simulation orchestration, reporting and run comparison.
//!
//! [`Simulator`] copies the caller's tasks, resolves the selected policy,
//! executes it, and hands the trace to [`Report`], which derives the
//! per-task table, aggregate [`Statistics`], and the text timeline.
//! [`Comparison`] summarizes a history of results.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

mod comparison;
mod engine;
mod report;

pub use comparison::Comparison;
pub use engine::{LevelConfig, SimulationRequest, SimulationResult, Simulator};
pub use report::{Report, Statistics, TaskRow, EMPTY_TIMELINE};
