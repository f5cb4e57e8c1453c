//! Input validation for task lists.
//!
//! Caller-level integrity checks, run before handing tasks to the
//! simulator. Detects:
//! - Duplicate IDs
//! - Negative arrival times
//! - Negative bursts
//! - Non-positive priorities (scheduled, but folded into the lowest
//!   multilevel-queue level)
//!
//! The simulator itself only rejects what it cannot schedule; duplicate ids
//! are not re-checked there.

use std::collections::HashSet;

use crate::models::Task;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending task.
    pub task_id: u32,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// Arrival time below zero.
    NegativeArrival,
    /// Burst below zero.
    NegativeBurst,
    /// Priority of zero or less.
    NonPositivePriority,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, task_id: u32, message: impl Into<String>) -> Self {
        Self {
            kind,
            task_id,
            message: message.into(),
        }
    }
}

/// Validates a task list.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for task in tasks {
        if !seen.insert(task.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                task.id,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        if task.arrival < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeArrival,
                task.id,
                format!("Task {} arrives at {}", task.id, task.arrival),
            ));
        }

        if task.burst < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeBurst,
                task.id,
                format!("Task {} has burst {}", task.id, task.burst),
            ));
        }

        if task.priority <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositivePriority,
                task.id,
                format!(
                    "Task {} has priority {}; it will share the lowest queue level",
                    task.id, task.priority
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
