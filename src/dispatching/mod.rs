//! Priority rules and rule engine for ordering eligible courses.
//!
//! When several courses are eligible for the same semester, the planner
//! fills it greedily in the order produced here. The default order is the
//! institutional tie-break chain:
//!
//! 1. Courses attempted `retake_threshold` times or more.
//! 2. Courses inside the level-dispersion window.
//! 3. Courses with more prerequisites.
//! 4. Lower level.
//! 5. More credits.
//!
//! # Usage
//!
//! ```
//! use u_curriculum::dispatching::{PlanningContext, RuleEngine};
//! use u_curriculum::dispatching::rules;
//! use u_curriculum::models::Course;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::LowestLevel)
//!     .with_rule(rules::MostCredits);
//!
//! let courses = vec![
//!     Course::new("B").with_level(2).with_credits(6),
//!     Course::new("A").with_level(1).with_credits(4),
//! ];
//! let order = engine.sort_indices(&courses, &PlanningContext::at_floor(1));
//! assert_eq!(order, vec![1, 0]);
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::PlanningContext;
pub use engine::{RuleEngine, TieBreaker};

use crate::models::Course;
use std::fmt::Debug;

/// Score returned by a priority rule.
///
/// Lower scores = placed first.
pub type RuleScore = f64;

/// A rule that ranks eligible courses.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait PriorityRule: Send + Sync + Debug {
    /// Short rule name.
    fn name(&self) -> &'static str;

    /// Scores a course in the current planning context.
    fn evaluate(&self, course: &Course, context: &PlanningContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
