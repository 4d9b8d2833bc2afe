//! Rule engine for multi-criteria course ordering.
//!
//! Rules are applied in sequence: the next rule is consulted only when all
//! previous rules tie.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, PlanningContext, PriorityRule, RuleScore};
use crate::models::Course;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep input order (the sort is stable).
    #[default]
    InputOrder,
    /// Deterministic by course code (lexicographic).
    ByCode,
}

/// A composable rule engine for course prioritization.
///
/// # Example
/// ```
/// use u_curriculum::dispatching::RuleEngine;
///
/// let engine = RuleEngine::standard();
/// assert_eq!(engine.rule_names(), vec!["RETAKE", "WINDOW", "PREREQS", "LEVEL", "CREDITS"]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn PriorityRule>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::InputOrder,
            epsilon: 1e-9,
        }
    }

    /// The institutional tie-break chain used by the planner.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(rules::RetakeFirst)
            .with_rule(rules::WithinDispersionWindow)
            .with_rule(rules::MostPrerequisites)
            .with_rule(rules::LowestLevel)
            .with_rule(rules::MostCredits)
    }

    /// Appends a rule.
    pub fn with_rule<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts courses by priority (highest priority first).
    ///
    /// Returns indices into the original slice.
    pub fn sort_indices(&self, courses: &[Course], context: &PlanningContext) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..courses.len()).collect();
        indices.sort_by(|&a, &b| self.compare(&courses[a], &courses[b], context));
        indices
    }

    /// Sorts borrowed courses in place (highest priority first).
    pub fn sort_refs(&self, courses: &mut [&Course], context: &PlanningContext) {
        courses.sort_by(|a, b| self.compare(a, b, context));
    }

    /// Index of the highest-priority course.
    pub fn select_best(&self, courses: &[Course], context: &PlanningContext) -> Option<usize> {
        self.sort_indices(courses, context).first().copied()
    }

    /// Scores from each rule for one course.
    pub fn evaluate(&self, course: &Course, context: &PlanningContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|rule| rule.evaluate(course, context))
            .collect()
    }

    fn compare(&self, a: &Course, b: &Course, context: &PlanningContext) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a, context);
            let score_b = rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        match self.tie_breaker {
            TieBreaker::InputOrder => Ordering::Equal,
            TieBreaker::ByCode => a.code.cmp(&b.code),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;

    fn course(code: &str, level: u32, credits: u32, prereqs: &[&str], attempts: u32) -> Course {
        Course::new(code)
            .with_level(level)
            .with_credits(credits)
            .with_prerequisites(prereqs.iter().copied())
            .with_attempts(attempts)
    }

    #[test]
    fn test_retake_beats_everything() {
        let courses = vec![
            course("A", 1, 10, &["X", "Y"], 0),
            course("B", 3, 2, &[], 3),
        ];
        let ctx = PlanningContext::at_floor(1);
        let order = RuleEngine::standard().sort_indices(&courses, &ctx);
        assert_eq!(courses[order[0]].code, "B");
    }

    #[test]
    fn test_window_before_prerequisites() {
        // Floor 1, window is levels 1..=3; D (level 4) is outside.
        let courses = vec![
            course("D", 4, 6, &["P1", "P2", "P3"], 0),
            course("C", 3, 6, &[], 0),
        ];
        let ctx = PlanningContext::at_floor(1);
        let order = RuleEngine::standard().sort_indices(&courses, &ctx);
        assert_eq!(courses[order[0]].code, "C");
    }

    #[test]
    fn test_prerequisites_then_level_then_credits() {
        let courses = vec![
            course("LOW-CREDITS", 1, 4, &[], 0),
            course("HIGH-LEVEL", 2, 6, &[], 0),
            course("MANY-PREREQS", 2, 6, &["A", "B"], 0),
            course("HIGH-CREDITS", 1, 8, &[], 0),
        ];
        let ctx = PlanningContext::at_floor(1);
        let order = RuleEngine::standard().sort_indices(&courses, &ctx);
        let codes: Vec<&str> = order.iter().map(|&i| courses[i].code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["MANY-PREREQS", "HIGH-CREDITS", "LOW-CREDITS", "HIGH-LEVEL"]
        );
    }

    #[test]
    fn test_input_order_kept_on_full_tie() {
        let courses = vec![course("Z", 1, 5, &[], 0), course("A", 1, 5, &[], 0)];
        let ctx = PlanningContext::at_floor(1);
        let order = RuleEngine::standard().sort_indices(&courses, &ctx);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_by_code_tie_breaker() {
        let courses = vec![course("Z", 1, 5, &[], 0), course("A", 1, 5, &[], 0)];
        let ctx = PlanningContext::at_floor(1);
        let engine = RuleEngine::standard().with_tie_breaker(TieBreaker::ByCode);
        assert_eq!(engine.select_best(&courses, &ctx), Some(1));
    }

    #[test]
    fn test_sort_refs_matches_indices() {
        let courses = vec![
            course("A", 2, 4, &[], 0),
            course("B", 1, 4, &[], 0),
            course("C", 1, 9, &[], 0),
        ];
        let ctx = PlanningContext::at_floor(1);
        let engine = RuleEngine::standard();

        let by_index: Vec<&str> = engine
            .sort_indices(&courses, &ctx)
            .into_iter()
            .map(|i| courses[i].code.as_str())
            .collect();

        let mut refs: Vec<&Course> = courses.iter().collect();
        engine.sort_refs(&mut refs, &ctx);
        let by_ref: Vec<&str> = refs.iter().map(|c| c.code.as_str()).collect();

        assert_eq!(by_index, by_ref);
        assert_eq!(by_ref, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_empty_courses() {
        let ctx = PlanningContext::at_floor(1);
        let engine = RuleEngine::new().with_rule(rules::LowestLevel);
        assert!(engine.sort_indices(&[], &ctx).is_empty());
        assert!(engine.select_best(&[], &ctx).is_none());
    }

    #[test]
    fn test_evaluate_scores() {
        let c = course("A", 2, 6, &["X"], 0);
        let ctx = PlanningContext::at_floor(1);
        let scores = RuleEngine::standard().evaluate(&c, &ctx);
        assert_eq!(scores.len(), 5);
        assert!((scores[2] - -1.0).abs() < 1e-10); // one prerequisite
        assert!((scores[3] - 2.0).abs() < 1e-10); // level
        assert!((scores[4] - -6.0).abs() < 1e-10); // credits
    }
}
