//! CPU scheduling simulator for service lines.
//!
//! Simulates classic scheduling policies over a finite batch of tasks
//! (customers in a service line), producing an execution trace and the
//! metrics derived from it.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Slice`, `Trace`
//! - **`policy`**: The `SchedulingPolicy` trait and the FCFS, SJF,
//!   Round Robin and multilevel queue policies
//! - **`simulator`**: Orchestrator, report engine, run comparison
//! - **`validation`**: Input integrity checks (duplicate IDs, negative times)
//! - **`workload`**: Demo and random workloads
//!
//! # Example
//!
//! ```
//! use queue_sim::models::Task;
//! use queue_sim::simulator::Simulator;
//!
//! let tasks = vec![Task::new(1, 0, 5), Task::new(2, 1, 3), Task::new(3, 2, 2)];
//! let result = Simulator::new().run_fcfs(&tasks).unwrap();
//!
//! assert_eq!(result.statistics().busy_time, 10);
//! println!("{}", result.timeline());
//! ```
//!
//! # Architecture
//!
//! Single-threaded and synchronous. Every run works on a copy of the
//! caller's tasks; policies never share state across runs.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

pub mod error;
pub mod models;
pub mod policy;
pub mod simulator;
pub mod validation;
pub mod workload;

pub use error::{Result, SimError};
