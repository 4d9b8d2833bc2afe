//! Greedy semester-by-semester projection.
//!
//! # Algorithm
//!
//! 1. Split courses into pending and satisfied (approved or enrolled).
//! 2. Withhold pending capstones. The first one is appended alone at the
//!    end; any further capstone is reported as unplaced.
//! 3. Drop prerequisite codes that do not exist in the catalog.
//! 4. Until nothing is pending:
//!    - eligible = pending courses whose prerequisites are all satisfied;
//!    - if none is eligible, force the least-blocked course into a
//!      semester of its own (degradation path);
//!    - otherwise sort eligible courses with the rule engine and fill the
//!      semester greedily under the credit cap and the level window;
//!    - mark the semester's courses satisfied.
//! 5. Append the capstone once every other course is placed.
//!
//! Prerequisites resolve across semesters only: a course placed in a
//! semester never unlocks a dependent in that same semester.
//!
//! # Complexity
//! O(s * n log n) where s = semesters emitted, n = pending courses.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::dispatching::{PlanningContext, RuleEngine};
use crate::models::{Course, Plan, SemesterPlan, Violation};
use crate::rules::PlanningRules;

/// Greedy curriculum projection engine.
///
/// Stateless between calls: every [`project`](Self::project) builds a
/// fresh plan from its input.
///
/// # Example
///
/// ```
/// use u_curriculum::models::Course;
/// use u_curriculum::projection::ProjectionEngine;
///
/// let courses = vec![
///     Course::new("MAT-100").with_credits(10).with_level(1),
///     Course::new("FIS-100").with_credits(10).with_level(1).with_prerequisite("MAT-100"),
/// ];
///
/// let plan = ProjectionEngine::new().project(&courses);
/// assert_eq!(plan.semester_count(), 2);
/// assert_eq!(plan.semester_of("FIS-100"), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    rules: PlanningRules,
    rule_engine: RuleEngine,
}

impl ProjectionEngine {
    /// Creates an engine with default rules and the standard priority chain.
    pub fn new() -> Self {
        Self {
            rules: PlanningRules::default(),
            rule_engine: RuleEngine::standard(),
        }
    }

    /// Sets the rule constants.
    pub fn with_rules(mut self, rules: PlanningRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the priority chain.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Rule constants in force.
    pub fn rules(&self) -> &PlanningRules {
        &self.rules
    }

    /// Projects the remaining courses into semesters.
    ///
    /// Returns an empty plan when nothing is pending. Degradations (forced
    /// placements, unplaceable courses) are logged and recorded in
    /// [`Plan::violations`].
    pub fn project(&self, courses: &[Course]) -> Plan {
        let mut plan = Plan::new();
        let known: HashSet<&str> = courses.iter().map(|c| c.code.as_str()).collect();
        let mut satisfied: HashSet<String> = courses
            .iter()
            .filter(|c| c.status.is_satisfied())
            .map(|c| c.code.clone())
            .collect();

        let mut pending: Vec<Course> = Vec::new();
        let mut capstones: Vec<Course> = Vec::new();
        let mut left_out = false;

        for course in courses.iter().filter(|c| c.is_pending()) {
            let mut course = course.clone();
            course.prerequisites.retain(|p| {
                let exists = known.contains(p.as_str());
                if !exists {
                    warn!(course = %course.code, prerequisite = %p, "ignoring prerequisite missing from catalog");
                }
                exists
            });

            if !self.rules.fits_credits(course.credits) {
                warn!(
                    course = %course.code,
                    credits = course.credits,
                    cap = self.rules.max_credits,
                    "course exceeds the semester credit cap on its own"
                );
                plan.violations.push(Violation::unplaced(
                    &course.code,
                    format!(
                        "{} credits exceed the {}-credit cap",
                        course.credits, self.rules.max_credits
                    ),
                ));
                left_out |= !course.capstone;
                continue;
            }

            if course.capstone {
                capstones.push(course);
            } else {
                pending.push(course);
            }
        }

        let mut number: u32 = 1;
        while !pending.is_empty() {
            if number > self.rules.max_semesters {
                warn!(
                    remaining = pending.len(),
                    max_semesters = self.rules.max_semesters,
                    "semester cap reached with courses left"
                );
                for course in &pending {
                    plan.violations.push(Violation::unplaced(
                        &course.code,
                        format!("not placed within {} semesters", self.rules.max_semesters),
                    ));
                }
                left_out = true;
                break;
            }

            let semester = self.next_semester(number, &pending, &satisfied, &mut plan);

            satisfied.extend(semester.courses.iter().cloned());
            pending.retain(|c| !semester.contains(&c.code));

            debug!(
                semester = semester.number,
                courses = ?semester.courses,
                credits = semester.total_credits,
                "semester projected"
            );
            plan.semesters.push(semester);
            number += 1;
        }

        let mut capstones = capstones.into_iter();
        if let Some(capstone) = capstones.next() {
            if left_out {
                plan.violations.push(Violation::unplaced(
                    &capstone.code,
                    "capstone withheld: other courses could not be placed",
                ));
            } else {
                let mut semester = SemesterPlan::new(number);
                semester.push(capstone.code.clone(), capstone.credits);
                debug!(semester = number, course = %capstone.code, "capstone projected");
                plan.semesters.push(semester);
            }
        }
        // A plan holds at most one capstone.
        for extra in capstones {
            warn!(course = %extra.code, "more than one pending capstone; leaving it out");
            plan.violations.push(Violation::unplaced(
                &extra.code,
                "only one capstone can be scheduled",
            ));
        }

        plan
    }

    /// Builds one semester from the pending set.
    fn next_semester(
        &self,
        number: u32,
        pending: &[Course],
        satisfied: &HashSet<String>,
        plan: &mut Plan,
    ) -> SemesterPlan {
        let mut semester = SemesterPlan::new(number);
        let unmet = |c: &Course| {
            c.prerequisites
                .iter()
                .filter(|p| !satisfied.contains(p.as_str()))
                .count()
        };

        let mut eligible: Vec<&Course> = pending.iter().filter(|c| unmet(*c) == 0).collect();

        if eligible.is_empty() {
            // min_by_key keeps the first of equal minima.
            if let Some(forced) = pending.iter().min_by_key(|c| unmet(*c)) {
                let missing: Vec<&str> = forced
                    .prerequisites
                    .iter()
                    .filter(|p| !satisfied.contains(p.as_str()))
                    .map(String::as_str)
                    .collect();
                warn!(
                    course = %forced.code,
                    missing = ?missing,
                    semester = number,
                    "no course is eligible; forcing the least-blocked one"
                );
                plan.violations.push(Violation::forced_placement(
                    &forced.code,
                    format!("placed without prerequisites: {}", missing.join(", ")),
                ));
                semester.push(forced.code.clone(), forced.credits);
            }
            return semester;
        }

        let floor = pending.iter().map(|c| c.level).min().unwrap_or(0);
        let context = PlanningContext::at_floor(floor).with_rules(self.rules);
        self.rule_engine.sort_refs(&mut eligible, &context);

        let mut levels: Vec<u32> = Vec::new();
        for course in eligible {
            if !self.rules.fits_credits(semester.total_credits.saturating_add(course.credits)) {
                continue;
            }
            let spread_ok = self
                .rules
                .fits_spread(levels.iter().copied().chain(std::iter::once(course.level)));
            if !spread_ok {
                continue;
            }
            levels.push(course.level);
            semester.push(course.code.clone(), course.credits);
        }

        semester
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
