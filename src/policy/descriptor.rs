//! Policy selection and per-level descriptors.
//!
//! [`PolicyKind`] selects the top-level policy for a run.
//! [`PolicyDescriptor`] is plain configuration data describing a
//! multilevel-queue sub-policy, parsed from the level grammar:
//!
//! | Descriptor | Sub-policy |
//! |------------|-----------|
//! | `FIFO` | FCFS |
//! | `SJF` | SJF |
//! | `RR` | Round Robin with the default quantum |
//! | `RR:<n>` | Round Robin with quantum `n > 0` |
//! | anything else | FCFS (logged) |
//!
//! Matching is case-insensitive and ignores surrounding whitespace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Fcfs, RoundRobin, SchedulingPolicy, Sjf};
use crate::error::SimError;

/// Quantum used for a bare `RR` level when the caller supplied none.
pub const DEFAULT_RR_QUANTUM: i64 = 2;

/// Top-level policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    /// First-come, first-served.
    Fcfs,
    /// Shortest job first (non-preemptive).
    Sjf,
    /// Round Robin with a fixed quantum.
    RoundRobin,
    /// Multilevel queue with strict priority between levels.
    MultilevelQueue,
}

impl PolicyKind {
    /// All selectable policies.
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Fcfs,
        PolicyKind::Sjf,
        PolicyKind::RoundRobin,
        PolicyKind::MultilevelQueue,
    ];
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Fcfs => "FCFS",
            PolicyKind::Sjf => "SJF",
            PolicyKind::RoundRobin => "RR",
            PolicyKind::MultilevelQueue => "MLQ",
        };
        f.write_str(name)
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FCFS" | "FIFO" => Ok(PolicyKind::Fcfs),
            "SJF" => Ok(PolicyKind::Sjf),
            "RR" | "ROUNDROBIN" | "ROUND_ROBIN" => Ok(PolicyKind::RoundRobin),
            "MLQ" | "MULTILEVEL" => Ok(PolicyKind::MultilevelQueue),
            _ => Err(SimError::Unsupported(s.to_string())),
        }
    }
}

/// Description of a leaf policy, used for multilevel-queue levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyDescriptor {
    /// First-come, first-served.
    #[default]
    Fcfs,
    /// Shortest job first.
    Sjf,
    /// Round Robin with its own quantum.
    RoundRobin {
        /// Time units granted per turn.
        quantum: i64,
    },
}

impl PolicyDescriptor {
    /// Parses a level descriptor.
    ///
    /// `default_quantum` is used for a bare `RR`. Malformed descriptors fall
    /// back to FCFS.
    pub fn parse(descriptor: &str, default_quantum: i64) -> Self {
        let normalized = descriptor.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "FIFO" | "FCFS" => return PolicyDescriptor::Fcfs,
            "SJF" => return PolicyDescriptor::Sjf,
            "RR" => {
                return PolicyDescriptor::RoundRobin {
                    quantum: default_quantum,
                }
            }
            _ => {}
        }

        if let Some(quantum) = normalized
            .strip_prefix("RR:")
            .and_then(|q| q.trim().parse::<i64>().ok())
            .filter(|&q| q > 0)
        {
            return PolicyDescriptor::RoundRobin { quantum };
        }

        log::warn!("[MLQ] unrecognized level descriptor {descriptor:?}; using FIFO");
        PolicyDescriptor::Fcfs
    }

    /// Builds a fresh policy instance.
    pub fn build(&self) -> Box<dyn SchedulingPolicy> {
        match *self {
            PolicyDescriptor::Fcfs => Box::new(Fcfs::new()),
            PolicyDescriptor::Sjf => Box::new(Sjf::new()),
            PolicyDescriptor::RoundRobin { quantum } => Box::new(RoundRobin::with_quantum(quantum)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("fifo".parse::<PolicyKind>().unwrap(), PolicyKind::Fcfs);
        assert_eq!("FCFS".parse::<PolicyKind>().unwrap(), PolicyKind::Fcfs);
        assert_eq!(" sjf ".parse::<PolicyKind>().unwrap(), PolicyKind::Sjf);
        assert_eq!("Round_Robin".parse::<PolicyKind>().unwrap(), PolicyKind::RoundRobin);
        assert_eq!("mlq".parse::<PolicyKind>().unwrap(), PolicyKind::MultilevelQueue);
    }

    #[test]
    fn test_kind_unsupported() {
        let err = "LOTTERY".parse::<PolicyKind>().unwrap_err();
        assert_eq!(err, SimError::Unsupported("LOTTERY".into()));
    }

    #[test]
    fn test_kind_display_round_trips() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.to_string().parse::<PolicyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_descriptor_grammar() {
        assert_eq!(PolicyDescriptor::parse("FIFO", 2), PolicyDescriptor::Fcfs);
        assert_eq!(PolicyDescriptor::parse("sjf", 2), PolicyDescriptor::Sjf);
        assert_eq!(
            PolicyDescriptor::parse("rr", 5),
            PolicyDescriptor::RoundRobin { quantum: 5 }
        );
        assert_eq!(
            PolicyDescriptor::parse(" RR:4 ", 2),
            PolicyDescriptor::RoundRobin { quantum: 4 }
        );
    }

    #[test]
    fn test_descriptor_malformed_falls_back() {
        for bad in ["", "LIFO", "RR:0", "RR:-3", "RR:abc", "RR:", "RRR", "SJF:2"] {
            assert_eq!(PolicyDescriptor::parse(bad, 2), PolicyDescriptor::Fcfs, "{bad}");
        }
    }

    #[test]
    fn test_descriptor_build() {
        assert_eq!(PolicyDescriptor::Fcfs.build().name(), "FIFO");
        assert_eq!(PolicyDescriptor::Sjf.build().name(), "SJF (non-preemptive)");
        assert_eq!(
            PolicyDescriptor::RoundRobin { quantum: 3 }.build().name(),
            "Round Robin"
        );
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&PolicyKind::RoundRobin).unwrap();
        let back: PolicyKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PolicyKind::RoundRobin);
    }
}
