//! Automatic curriculum projection and plan metrics.
//!
//! # Algorithm
//!
//! `ProjectionEngine` is a greedy, priority-driven bin packer: each semester
//! takes the eligible courses in rule-engine order while the credit cap and
//! the level-dispersion window allow. It is not optimal (it does not
//! minimize the number of semesters), but it is fast and deterministic.
//!
//! # Summary
//!
//! `PlanSummary` reports semester count, credit load and level spread.

mod engine;
mod summary;

pub use engine::ProjectionEngine;
pub use summary::PlanSummary;

use crate::models::{Course, Plan};

/// Projects `courses` with default rules and the standard priority chain.
pub fn project(courses: &[Course]) -> Plan {
    ProjectionEngine::new().project(courses)
}
