//! Simulation domain models.
//!
//! | queue-sim | Service line | Operating system |
//! |-----------|--------------|------------------|
//! | Task | Customer | Process |
//! | burst | Service time | CPU burst |
//! | Slice | Attention interval | Time slice |
//! | Trace | Service log | Gantt chart |

mod task;
mod trace;

pub use task::{Task, DEFAULT_CATEGORY, DEFAULT_PRIORITY, LOWEST_LEVEL};
pub use trace::{Slice, Trace};
