//! Plan load metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Semesters | Number of semesters in the plan |
//! | Courses | Number of placed courses |
//! | Total credits | Sum of semester totals |
//! | Average credits | Total credits / semesters |
//! | Max spread | Largest `max(level) - min(level)` in any semester |
//! | Final semester | Number of the last semester |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Course, Plan};
use crate::rules::level_spread;

/// Summary indicators for a projected or edited plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Number of semesters.
    pub semester_count: usize,
    /// Number of placed courses.
    pub course_count: usize,
    /// Sum of all semester credit totals.
    pub total_credits: u32,
    /// Mean credits per semester (0.0 for an empty plan).
    pub avg_credits: f64,
    /// Heaviest single semester.
    pub max_credits: u32,
    /// Largest level spread inside one semester.
    pub max_level_spread: u32,
    /// Whether a capstone course appears in the plan.
    pub capstone_scheduled: bool,
    /// Number of the last semester, if any.
    pub final_semester: Option<u32>,
}

impl PlanSummary {
    /// Computes the summary of `plan` against its catalog.
    ///
    /// Codes absent from `courses` contribute neither a level nor a
    /// capstone flag.
    pub fn calculate(plan: &Plan, courses: &[Course]) -> Self {
        let by_code: HashMap<&str, &Course> =
            courses.iter().map(|c| (c.code.as_str(), c)).collect();

        let mut max_spread = 0;
        let mut max_credits = 0;
        let mut capstone_scheduled = false;

        for semester in &plan.semesters {
            let placed: Vec<&Course> = semester
                .courses
                .iter()
                .filter_map(|code| by_code.get(code.as_str()).copied())
                .collect();

            max_spread = max_spread.max(level_spread(placed.iter().map(|c| c.level)));
            max_credits = max_credits.max(semester.total_credits);
            capstone_scheduled |= placed.iter().any(|c| c.capstone);
        }

        let semester_count = plan.semester_count();
        let total_credits = plan.total_credits();
        let avg_credits = if semester_count == 0 {
            0.0
        } else {
            total_credits as f64 / semester_count as f64
        };

        Self {
            semester_count,
            course_count: plan.course_count(),
            total_credits,
            avg_credits,
            max_credits,
            max_level_spread: max_spread,
            capstone_scheduled,
            final_semester: plan.last_semester_number(),
        }
    }

    /// Whether the plan carries at least `min_avg_credits` per semester on
    /// average and never spreads levels beyond `max_spread`.
    pub fn meets_load(&self, min_avg_credits: f64, max_spread: u32) -> bool {
        self.avg_credits >= min_avg_credits && self.max_level_spread <= max_spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SemesterPlan;

    fn catalog() -> Vec<Course> {
        vec![
            Course::new("A").with_credits(10).with_level(1),
            Course::new("B").with_credits(10).with_level(3),
            Course::new("C").with_credits(6).with_level(2),
            Course::new("CAP").with_credits(20).with_level(10).as_capstone(),
        ]
    }

    fn semester(number: u32, courses: &[(&str, u32)]) -> SemesterPlan {
        let mut s = SemesterPlan::new(number);
        for (code, credits) in courses {
            s.push(*code, *credits);
        }
        s
    }

    #[test]
    fn test_summary_basic() {
        let plan = Plan::from_semesters(vec![
            semester(1, &[("A", 10), ("B", 10)]),
            semester(2, &[("C", 6)]),
            semester(3, &[("CAP", 20)]),
        ]);

        let summary = PlanSummary::calculate(&plan, &catalog());
        assert_eq!(summary.semester_count, 3);
        assert_eq!(summary.course_count, 4);
        assert_eq!(summary.total_credits, 46);
        assert!((summary.avg_credits - 46.0 / 3.0).abs() < 1e-10);
        assert_eq!(summary.max_credits, 20);
        assert_eq!(summary.max_level_spread, 2); // A(1) and B(3)
        assert!(summary.capstone_scheduled);
        assert_eq!(summary.final_semester, Some(3));
    }

    #[test]
    fn test_summary_empty() {
        let summary = PlanSummary::calculate(&Plan::new(), &catalog());
        assert_eq!(summary.semester_count, 0);
        assert!((summary.avg_credits - 0.0).abs() < 1e-10);
        assert!(!summary.capstone_scheduled);
        assert_eq!(summary.final_semester, None);
    }

    #[test]
    fn test_unknown_codes_are_skipped() {
        let plan = Plan::from_semesters(vec![semester(1, &[("A", 10), ("GHOST", 4)])]);
        let summary = PlanSummary::calculate(&plan, &catalog());
        assert_eq!(summary.max_level_spread, 0);
        assert_eq!(summary.total_credits, 14);
    }

    #[test]
    fn test_meets_load() {
        let plan = Plan::from_semesters(vec![
            semester(1, &[("A", 10), ("B", 10)]),
            semester(2, &[("C", 6)]),
        ]);
        let summary = PlanSummary::calculate(&plan, &catalog());
        assert!(summary.meets_load(13.0, 2));
        assert!(!summary.meets_load(13.5, 2));
        assert!(!summary.meets_load(10.0, 1));
    }
}
