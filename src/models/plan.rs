//! Plan (projection) model.
//!
//! A plan is an ordered sequence of semesters, each a set of course codes
//! with a credit total. It may carry violations recording where the
//! planner had to degrade (forced placements, courses it could not place).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Course;

/// One slot of a projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterPlan {
    /// 1-based position in the plan.
    pub number: u32,
    /// Course codes, in display order.
    pub courses: Vec<String>,
    /// Sum of the courses' credits.
    pub total_credits: u32,
}

impl SemesterPlan {
    /// Creates an empty semester.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            courses: Vec::new(),
            total_credits: 0,
        }
    }

    /// Whether the semester lists `code`.
    pub fn contains(&self, code: &str) -> bool {
        self.courses.iter().any(|c| c == code)
    }

    /// Appends a course and its credits. The total saturates at `u32::MAX`.
    pub fn push(&mut self, code: impl Into<String>, credits: u32) {
        self.courses.push(code.into());
        self.total_credits = self.total_credits.saturating_add(credits);
    }

    /// Removes a course and its credits. Returns `false` if it wasn't there.
    pub fn remove(&mut self, code: &str, credits: u32) -> bool {
        match self.courses.iter().position(|c| c == code) {
            Some(pos) => {
                self.courses.remove(pos);
                self.total_credits = self.total_credits.saturating_sub(credits);
                true
            }
            None => false,
        }
    }

    /// Whether the semester holds no course.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Number of courses.
    #[inline]
    pub fn len(&self) -> usize {
        self.courses.len()
    }
}

/// A flattened `(semester, course, credits)` row, the shape plans are
/// stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRow {
    /// Semester number.
    pub semester_number: u32,
    /// Course code.
    pub course_code: String,
    /// Course credits at the time the row was written.
    pub credits: u32,
}

/// A planning violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related course code (or semester number, for semester-level issues).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of planning violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Course placed despite unmet prerequisites (degradation path).
    ForcedPlacement,
    /// Pending course left out of the plan.
    Unplaced,
    /// Semester total above the credit cap.
    CreditCapExceeded,
    /// Stored semester total disagrees with the catalog credits.
    CreditTotalMismatch,
    /// Course placed in the same or an earlier semester than a prerequisite.
    PrerequisiteOrder,
    /// Level spread inside a semester above the allowed window.
    DispersionExceeded,
    /// Course listed more than once across the plan.
    DuplicateCourse,
    /// Capstone not alone or not last.
    CapstoneMisplaced,
    /// Semester numbers not strictly increasing.
    NumberingGap,
    /// Plan references a code absent from the catalog.
    UnknownCourse,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }

    /// Creates a forced placement violation.
    pub fn forced_placement(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::ForcedPlacement, code, message)
    }

    /// Creates an unplaced course violation.
    pub fn unplaced(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::Unplaced, code, message)
    }
}

/// A projection: semesters in order plus any recorded violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Semesters, ordered by number.
    pub semesters: Vec<SemesterPlan>,
    /// Violations recorded while building this plan.
    pub violations: Vec<Violation>,
}

impl Plan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing semesters.
    pub fn from_semesters(semesters: Vec<SemesterPlan>) -> Self {
        Self {
            semesters,
            violations: Vec::new(),
        }
    }

    /// Whether the plan has no semesters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    /// Whether no violations were recorded.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of semesters.
    #[inline]
    pub fn semester_count(&self) -> usize {
        self.semesters.len()
    }

    /// Finds a semester by number.
    pub fn semester(&self, number: u32) -> Option<&SemesterPlan> {
        self.semesters.iter().find(|s| s.number == number)
    }

    /// Number of the semester holding `code`.
    pub fn semester_of(&self, code: &str) -> Option<u32> {
        self.semesters
            .iter()
            .find(|s| s.contains(code))
            .map(|s| s.number)
    }

    /// Number of course placements.
    pub fn course_count(&self) -> usize {
        self.semesters.iter().map(SemesterPlan::len).sum()
    }

    /// Sum of all semester totals, saturating at `u32::MAX`.
    pub fn total_credits(&self) -> u32 {
        self.semesters
            .iter()
            .fold(0, |acc, s| acc.saturating_add(s.total_credits))
    }

    /// Number of the last semester, if any.
    pub fn last_semester_number(&self) -> Option<u32> {
        self.semesters.iter().map(|s| s.number).max()
    }

    /// Flattens the plan into storage rows.
    ///
    /// Credits come from `courses`; codes missing from the catalog are
    /// written with zero credits.
    pub fn to_rows(&self, courses: &[Course]) -> Vec<PlanRow> {
        self.semesters
            .iter()
            .flat_map(|s| {
                s.courses.iter().map(move |code| PlanRow {
                    semester_number: s.number,
                    course_code: code.clone(),
                    credits: courses
                        .iter()
                        .find(|c| &c.code == code)
                        .map(|c| c.credits)
                        .unwrap_or(0),
                })
            })
            .collect()
    }

    /// Rebuilds a plan from storage rows.
    ///
    /// Rows are grouped by semester number (ascending); row order within a
    /// semester is kept. Totals are recomputed from the row credits.
    pub fn from_rows(rows: &[PlanRow]) -> Self {
        let mut grouped: BTreeMap<u32, SemesterPlan> = BTreeMap::new();
        for row in rows {
            grouped
                .entry(row.semester_number)
                .or_insert_with(|| SemesterPlan::new(row.semester_number))
                .push(row.course_code.clone(), row.credits);
        }
        Self::from_semesters(grouped.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        let mut s1 = SemesterPlan::new(1);
        s1.push("MAT-100", 10);
        s1.push("QUI-100", 8);
        let mut s2 = SemesterPlan::new(2);
        s2.push("FIS-100", 10);
        Plan::from_semesters(vec![s1, s2])
    }

    #[test]
    fn test_semester_push_remove() {
        let mut s = SemesterPlan::new(3);
        s.push("A", 6);
        s.push("B", 4);
        assert_eq!(s.total_credits, 10);
        assert_eq!(s.len(), 2);

        assert!(s.remove("A", 6));
        assert!(!s.remove("A", 6));
        assert_eq!(s.courses, vec!["B"]);
        assert_eq!(s.total_credits, 4);
    }

    #[test]
    fn test_semester_total_saturates() {
        let mut s = SemesterPlan::new(1);
        s.push("A", 6);
        s.push("HUGE", u32::MAX);
        assert_eq!(s.total_credits, u32::MAX);

        let mut plan = Plan::new();
        plan.semesters.push(s);
        plan.semesters.push(SemesterPlan::new(2));
        plan.semesters[1].push("B", 4);
        assert_eq!(plan.total_credits(), u32::MAX);
    }

    #[test]
    fn test_plan_lookup() {
        let plan = sample_plan();
        assert_eq!(plan.semester_count(), 2);
        assert_eq!(plan.semester_of("FIS-100"), Some(2));
        assert_eq!(plan.semester_of("XXX"), None);
        assert_eq!(plan.semester(1).map(|s| s.total_credits), Some(18));
        assert!(plan.semester(7).is_none());
        assert_eq!(plan.course_count(), 3);
        assert_eq!(plan.total_credits(), 28);
        assert_eq!(plan.last_semester_number(), Some(2));
        assert!(plan.is_clean());
    }

    #[test]
    fn test_rows_roundtrip_keeps_grouping() {
        let plan = sample_plan();
        let catalog = vec![
            Course::new("MAT-100").with_credits(10),
            Course::new("QUI-100").with_credits(8),
            Course::new("FIS-100").with_credits(10),
        ];

        let rows = plan.to_rows(&catalog);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].semester_number, 1);
        assert_eq!(rows[2].course_code, "FIS-100");

        let rebuilt = Plan::from_rows(&rows);
        assert_eq!(rebuilt, plan);
    }

    #[test]
    fn test_from_rows_sorts_semesters() {
        let rows = vec![
            PlanRow {
                semester_number: 3,
                course_code: "C".into(),
                credits: 5,
            },
            PlanRow {
                semester_number: 1,
                course_code: "A".into(),
                credits: 6,
            },
            PlanRow {
                semester_number: 3,
                course_code: "D".into(),
                credits: 5,
            },
        ];
        let plan = Plan::from_rows(&rows);
        assert_eq!(plan.semesters.len(), 2);
        assert_eq!(plan.semesters[0].number, 1);
        assert_eq!(plan.semesters[1].courses, vec!["C", "D"]);
        assert_eq!(plan.semesters[1].total_credits, 10);
    }

    #[test]
    fn test_violation_factories() {
        let v1 = Violation::forced_placement("INF-300", "missing INF-200");
        assert_eq!(v1.violation_type, ViolationType::ForcedPlacement);
        assert_eq!(v1.entity_id, "INF-300");

        let v2 = Violation::unplaced("INF-400", "semester cap reached");
        assert_eq!(v2.violation_type, ViolationType::Unplaced);
    }
}
