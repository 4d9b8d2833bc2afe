//! Built-in priority rules.
//!
//! # Score Convention
//! All rules return lower scores for courses that should be placed first.

use super::{PlanningContext, PriorityRule, RuleScore};
use crate::models::Course;

/// Courses attempted `retake_threshold` times or more go first.
///
/// Institutional policy: a course failed repeatedly must be retaken at the
/// next opportunity.
#[derive(Debug, Clone, Copy)]
pub struct RetakeFirst;

impl PriorityRule for RetakeFirst {
    fn name(&self) -> &'static str {
        "RETAKE"
    }

    fn evaluate(&self, course: &Course, context: &PlanningContext) -> RuleScore {
        if context.rules.must_retake(course.attempt_count) {
            0.0
        } else {
            1.0
        }
    }

    fn description(&self) -> &'static str {
        "Mandatory retake first"
    }
}

/// Courses below `level_floor + max_level_spread` go before the rest.
#[derive(Debug, Clone, Copy)]
pub struct WithinDispersionWindow;

impl PriorityRule for WithinDispersionWindow {
    fn name(&self) -> &'static str {
        "WINDOW"
    }

    fn evaluate(&self, course: &Course, context: &PlanningContext) -> RuleScore {
        if context.rules.within_window(course.level, context.level_floor) {
            0.0
        } else {
            1.0
        }
    }

    fn description(&self) -> &'static str {
        "Inside the level-dispersion window"
    }
}

/// More prerequisites first.
///
/// Proxy for "further along the curriculum"; clearing these early reduces
/// later bottlenecks.
#[derive(Debug, Clone, Copy)]
pub struct MostPrerequisites;

impl PriorityRule for MostPrerequisites {
    fn name(&self) -> &'static str {
        "PREREQS"
    }

    fn evaluate(&self, course: &Course, _context: &PlanningContext) -> RuleScore {
        -(course.prerequisites.len() as f64)
    }

    fn description(&self) -> &'static str {
        "Most prerequisites"
    }
}

/// Lower curriculum level first.
#[derive(Debug, Clone, Copy)]
pub struct LowestLevel;

impl PriorityRule for LowestLevel {
    fn name(&self) -> &'static str {
        "LEVEL"
    }

    fn evaluate(&self, course: &Course, _context: &PlanningContext) -> RuleScore {
        course.level as f64
    }

    fn description(&self) -> &'static str {
        "Lowest level"
    }
}

/// More credits first, so semesters pack fuller.
#[derive(Debug, Clone, Copy)]
pub struct MostCredits;

impl PriorityRule for MostCredits {
    fn name(&self) -> &'static str {
        "CREDITS"
    }

    fn evaluate(&self, course: &Course, _context: &PlanningContext) -> RuleScore {
        -(course.credits as f64)
    }

    fn description(&self) -> &'static str {
        "Most credits"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PlanningRules;

    #[test]
    fn test_retake_first() {
        let ctx = PlanningContext::at_floor(1);
        assert_eq!(RetakeFirst.evaluate(&Course::new("A").with_attempts(3), &ctx), 0.0);
        assert_eq!(RetakeFirst.evaluate(&Course::new("A").with_attempts(2), &ctx), 1.0);
    }

    #[test]
    fn test_retake_threshold_from_rules() {
        let ctx = PlanningContext::at_floor(1)
            .with_rules(PlanningRules::default().with_retake_threshold(2));
        assert_eq!(RetakeFirst.evaluate(&Course::new("A").with_attempts(2), &ctx), 0.0);
    }

    #[test]
    fn test_window() {
        let ctx = PlanningContext::at_floor(2);
        assert_eq!(WithinDispersionWindow.evaluate(&Course::new("A").with_level(4), &ctx), 0.0);
        assert_eq!(WithinDispersionWindow.evaluate(&Course::new("A").with_level(5), &ctx), 1.0);
    }

    #[test]
    fn test_most_prerequisites() {
        let ctx = PlanningContext::at_floor(1);
        let c = Course::new("A").with_prerequisites(["X", "Y", "Z"]);
        assert_eq!(MostPrerequisites.evaluate(&c, &ctx), -3.0);
    }

    #[test]
    fn test_level_and_credits() {
        let ctx = PlanningContext::at_floor(1);
        let c = Course::new("A").with_level(4).with_credits(7);
        assert_eq!(LowestLevel.evaluate(&c, &ctx), 4.0);
        assert_eq!(MostCredits.evaluate(&c, &ctx), -7.0);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(RetakeFirst.description(), "Mandatory retake first");
        assert_eq!(MostCredits.name(), "CREDITS");
    }
}
