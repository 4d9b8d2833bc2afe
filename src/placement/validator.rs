//! Placement admissibility for manual edits.
//!
//! Checks run in a fixed order and the first failure is returned:
//!
//! 1. the course exists
//! 2. the course is not approved
//! 3. capstone rules (alone, last, unique, everything else done first)
//! 4. not already in the target semester
//! 5. credit cap
//! 6. prerequisites placed strictly earlier (or already satisfied)
//! 7. no dependent placed at or before the target
//! 8. level dispersion
//!
//! The candidate is treated as lifted out of the plan: wherever it sits
//! now is ignored, so a move can be validated before its origin changes.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Course, SemesterPlan};
use crate::rules::{level_spread, PlanningRules};

/// Why a placement was refused.
///
/// `Display` gives the reason shown to the student; [`kind`](Self::kind)
/// gives a stable tag for localized messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The code is not in the catalog.
    #[error("course {code} not found")]
    NotFound {
        /// Requested code.
        code: String,
    },

    /// The course is already approved.
    #[error("course {code} is already approved")]
    AlreadyApproved {
        /// Course code.
        code: String,
    },

    /// Another capstone already sits in the plan.
    #[error("capstone {existing} is already scheduled")]
    CapstoneAlreadyPlaced {
        /// Code of the capstone already placed.
        existing: String,
    },

    /// The capstone would share a semester.
    #[error("the capstone must be the only course in semester {semester}")]
    CapstoneNotAlone {
        /// Target semester.
        semester: u32,
    },

    /// A course would follow the capstone.
    #[error("no course may be scheduled after the capstone (semester {semester})")]
    CapstoneNotLast {
        /// Target semester.
        semester: u32,
    },

    /// Other courses are still neither approved nor scheduled earlier.
    #[error("{remaining} course(s) must be completed before the capstone")]
    CapstonePrerequisitesPending {
        /// How many courses remain.
        remaining: usize,
    },

    /// Taking the course out would leave a placed capstone with work
    /// still pending.
    #[error("course {code} must be completed before the capstone {capstone}")]
    NeededBeforeCapstone {
        /// Course code.
        code: String,
        /// Code of the placed capstone.
        capstone: String,
    },

    /// The course is already in the target semester.
    #[error("course {code} is already in semester {semester}")]
    DuplicateInSemester {
        /// Course code.
        code: String,
        /// Target semester.
        semester: u32,
    },

    /// The semester would exceed the credit cap.
    #[error("exceeds the {cap}-credit limit (would be {total})")]
    CreditCapExceeded {
        /// Would-be semester total.
        total: u32,
        /// Credit cap.
        cap: u32,
    },

    /// Prerequisites are not satisfied before the target semester.
    #[error("missing prerequisites: {}", .missing.join(", "))]
    MissingPrerequisites {
        /// Codes still missing.
        missing: Vec<String>,
    },

    /// A course that depends on this one is placed too early.
    #[error("{dependent} ({name}) depends on this course and is in semester {semester}")]
    DependentConflict {
        /// Dependent course code.
        dependent: String,
        /// Dependent course name.
        name: String,
        /// Semester holding the dependent.
        semester: u32,
    },

    /// The semester's level spread would exceed the window.
    #[error("level spread {spread} exceeds the maximum of {max}")]
    DispersionExceeded {
        /// Would-be spread.
        spread: u32,
        /// Allowed spread.
        max: u32,
    },
}

/// Field-less tag of a [`Rejection`], one per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    NotFound,
    AlreadyApproved,
    CapstoneAlreadyPlaced,
    CapstoneNotAlone,
    CapstoneNotLast,
    CapstonePrerequisitesPending,
    NeededBeforeCapstone,
    DuplicateInSemester,
    CreditCapExceeded,
    MissingPrerequisites,
    DependentConflict,
    DispersionExceeded,
}

impl Rejection {
    /// Tag for this rejection.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::NotFound { .. } => RejectionKind::NotFound,
            Self::AlreadyApproved { .. } => RejectionKind::AlreadyApproved,
            Self::CapstoneAlreadyPlaced { .. } => RejectionKind::CapstoneAlreadyPlaced,
            Self::CapstoneNotAlone { .. } => RejectionKind::CapstoneNotAlone,
            Self::CapstoneNotLast { .. } => RejectionKind::CapstoneNotLast,
            Self::CapstonePrerequisitesPending { .. } => {
                RejectionKind::CapstonePrerequisitesPending
            }
            Self::NeededBeforeCapstone { .. } => RejectionKind::NeededBeforeCapstone,
            Self::DuplicateInSemester { .. } => RejectionKind::DuplicateInSemester,
            Self::CreditCapExceeded { .. } => RejectionKind::CreditCapExceeded,
            Self::MissingPrerequisites { .. } => RejectionKind::MissingPrerequisites,
            Self::DependentConflict { .. } => RejectionKind::DependentConflict,
            Self::DispersionExceeded { .. } => RejectionKind::DispersionExceeded,
        }
    }
}

/// Validates single-course placements against the planning rules.
///
/// # Example
///
/// ```
/// use u_curriculum::models::{Course, CourseStatus, SemesterPlan};
/// use u_curriculum::placement::{PlacementValidator, RejectionKind};
///
/// let courses = vec![Course::new("ALG-100").with_status(CourseStatus::Approved)];
/// let plan = vec![SemesterPlan::new(1)];
///
/// let err = PlacementValidator::new()
///     .can_place("ALG-100", &plan[0], &courses, &plan)
///     .unwrap_err();
/// assert_eq!(err.kind(), RejectionKind::AlreadyApproved);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlacementValidator {
    rules: PlanningRules,
}

impl PlacementValidator {
    /// Creates a validator with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule constants.
    pub fn with_rules(mut self, rules: PlanningRules) -> Self {
        self.rules = rules;
        self
    }

    /// Rule constants in force.
    pub fn rules(&self) -> &PlanningRules {
        &self.rules
    }

    /// Decides whether `code` may be placed into `target`.
    ///
    /// `plan` is the whole current plan; `target` is normally one of its
    /// semesters.
    pub fn can_place(
        &self,
        code: &str,
        target: &SemesterPlan,
        courses: &[Course],
        plan: &[SemesterPlan],
    ) -> Result<(), Rejection> {
        let by_code: HashMap<&str, &Course> =
            courses.iter().map(|c| (c.code.as_str(), c)).collect();

        let course = by_code.get(code).copied().ok_or_else(|| Rejection::NotFound {
            code: code.to_string(),
        })?;

        if course.is_approved() {
            return Err(Rejection::AlreadyApproved {
                code: code.to_string(),
            });
        }

        self.check_capstone(course, target, courses, plan, &by_code)?;

        if target.contains(code) {
            return Err(Rejection::DuplicateInSemester {
                code: code.to_string(),
                semester: target.number,
            });
        }

        let total = target.total_credits.saturating_add(course.credits);
        if !self.rules.fits_credits(total) {
            return Err(Rejection::CreditCapExceeded {
                total,
                cap: self.rules.max_credits,
            });
        }

        let satisfied: HashSet<&str> = courses
            .iter()
            .filter(|c| c.status.is_satisfied())
            .map(|c| c.code.as_str())
            .chain(
                plan.iter()
                    .filter(|s| s.number < target.number)
                    .flat_map(|s| s.courses.iter().map(String::as_str)),
            )
            .filter(|c| *c != code)
            .collect();

        let missing: Vec<String> = course
            .prerequisites
            .iter()
            .filter(|p| by_code.contains_key(p.as_str()) && !satisfied.contains(p.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(Rejection::MissingPrerequisites { missing });
        }

        for dependent in courses.iter().filter(|c| c.code != code && c.requires(code)) {
            if let Some(semester) = placed_at_or_before(&dependent.code, target, plan) {
                return Err(Rejection::DependentConflict {
                    dependent: dependent.code.clone(),
                    name: dependent.name.clone(),
                    semester,
                });
            }
        }

        let levels = target
            .courses
            .iter()
            .filter_map(|c| by_code.get(c.as_str()).map(|c| c.level))
            .chain(std::iter::once(course.level));
        let spread = level_spread(levels);
        if spread > self.rules.max_level_spread {
            return Err(Rejection::DispersionExceeded {
                spread,
                max: self.rules.max_level_spread,
            });
        }

        Ok(())
    }

    fn check_capstone(
        &self,
        course: &Course,
        target: &SemesterPlan,
        courses: &[Course],
        plan: &[SemesterPlan],
        by_code: &HashMap<&str, &Course>,
    ) -> Result<(), Rejection> {
        let is_capstone = |code: &str| by_code.get(code).is_some_and(|c| c.capstone);

        if course.capstone {
            let other = plan
                .iter()
                .flat_map(|s| s.courses.iter())
                .find(|c| *c != &course.code && is_capstone(c.as_str()));
            if let Some(existing) = other {
                return Err(Rejection::CapstoneAlreadyPlaced {
                    existing: existing.clone(),
                });
            }

            if target.courses.iter().any(|c| c != &course.code) {
                return Err(Rejection::CapstoneNotAlone {
                    semester: target.number,
                });
            }

            let later_busy = plan
                .iter()
                .filter(|s| s.number > target.number)
                .any(|s| s.courses.iter().any(|c| c != &course.code));
            if later_busy {
                return Err(Rejection::CapstoneNotLast {
                    semester: target.number,
                });
            }

            let remaining = courses
                .iter()
                .filter(|c| c.code != course.code && !c.capstone && c.is_pending())
                .filter(|c| {
                    !plan
                        .iter()
                        .any(|s| s.number < target.number && s.contains(&c.code))
                })
                .count();
            if remaining > 0 {
                return Err(Rejection::CapstonePrerequisitesPending { remaining });
            }

            return Ok(());
        }

        if target.courses.iter().any(|c| is_capstone(c.as_str())) {
            return Err(Rejection::CapstoneNotAlone {
                semester: target.number,
            });
        }

        let capstone_at = plan
            .iter()
            .filter(|s| s.courses.iter().any(|c| is_capstone(c.as_str())))
            .map(|s| s.number)
            .min();
        match capstone_at {
            Some(at) if target.number == at => Err(Rejection::CapstoneNotAlone {
                semester: target.number,
            }),
            Some(at) if target.number > at => Err(Rejection::CapstoneNotLast {
                semester: target.number,
            }),
            _ => Ok(()),
        }
    }
}

/// Semester number holding `code` if it is at or before `target`.
fn placed_at_or_before(code: &str, target: &SemesterPlan, plan: &[SemesterPlan]) -> Option<u32> {
    if target.contains(code) {
        return Some(target.number);
    }
    plan.iter()
        .filter(|s| s.number <= target.number)
        .find(|s| s.contains(code))
        .map(|s| s.number)
}

/// Checks a placement with default rules.
pub fn can_place(
    code: &str,
    target: &SemesterPlan,
    courses: &[Course],
    plan: &[SemesterPlan],
) -> Result<(), Rejection> {
    PlacementValidator::new().can_place(code, target, courses, plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseStatus;

    fn make_course(code: &str, credits: u32, level: u32, prereqs: &[&str]) -> Course {
        Course::new(code)
            .with_name(format!("{code} name"))
            .with_credits(credits)
            .with_level(level)
            .with_prerequisites(prereqs.iter().copied())
    }

    fn semester(number: u32, courses: &[(&str, u32)]) -> SemesterPlan {
        let mut s = SemesterPlan::new(number);
        for (code, credits) in courses {
            s.push(*code, *credits);
        }
        s
    }

    fn catalog() -> Vec<Course> {
        vec![
            make_course("MAT100", 10, 1, &[]),
            make_course("FIS100", 10, 1, &["MAT100"]),
            make_course("PRO200", 12, 2, &["FIS100"]),
            make_course("ALG100", 10, 1, &[]).with_status(CourseStatus::Approved),
            make_course("QUI100", 8, 1, &[]),
            make_course("ADV500", 6, 5, &[]),
        ]
    }

    fn plan() -> Vec<SemesterPlan> {
        vec![
            semester(1, &[("MAT100", 10), ("QUI100", 8)]),
            semester(2, &[("FIS100", 10)]),
            semester(3, &[("PRO200", 12)]),
        ]
    }

    fn check(code: &str, target: u32, courses: &[Course], plan: &[SemesterPlan]) -> Result<(), Rejection> {
        let target = plan.iter().find(|s| s.number == target).unwrap();
        can_place(code, target, courses, plan)
    }

    #[test]
    fn test_valid_move() {
        assert!(check("QUI100", 2, &catalog(), &plan()).is_ok());
    }

    #[test]
    fn test_not_found() {
        let err = check("XXX", 1, &catalog(), &plan()).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::NotFound);
    }

    #[test]
    fn test_already_approved() {
        let err = check("ALG100", 1, &catalog(), &plan()).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::AlreadyApproved);
        assert_eq!(err.to_string(), "course ALG100 is already approved");
    }

    #[test]
    fn test_duplicate_in_semester() {
        let err = check("MAT100", 1, &catalog(), &plan()).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::DuplicateInSemester);
    }

    #[test]
    fn test_credit_cap_exceeded() {
        let mut courses = catalog();
        courses.push(make_course("BIG", 15, 1, &[]));
        let plan = vec![
            semester(1, &[("MAT100", 10), ("BIG", 15)]),
            semester(2, &[("FIS100", 10), ("X1", 10)]),
            semester(3, &[("PRO200", 12)]),
        ];
        // 20 + 15 = 35 > 32
        let err = check("BIG", 2, &courses, &plan).unwrap_err();
        assert_eq!(err, Rejection::CreditCapExceeded { total: 35, cap: 32 });
        assert_eq!(err.to_string(), "exceeds the 32-credit limit (would be 35)");
    }

    #[test]
    fn test_custom_credit_cap() {
        let validator = PlacementValidator::new()
            .with_rules(PlanningRules::default().with_max_credits(17));
        let plan = plan();
        let err = validator
            .can_place("QUI100", &plan[1], &catalog(), &plan)
            .unwrap_err();
        assert_eq!(err, Rejection::CreditCapExceeded { total: 18, cap: 17 });
    }

    #[test]
    fn test_huge_credits_saturate() {
        let mut courses = catalog();
        courses.push(make_course("HUGE", u32::MAX, 1, &[]));
        let err = check("HUGE", 1, &courses, &plan()).unwrap_err();
        assert_eq!(
            err,
            Rejection::CreditCapExceeded {
                total: u32::MAX,
                cap: 32
            }
        );
    }

    #[test]
    fn test_missing_prerequisites() {
        // FIS100 into semester 1: MAT100 is in 1, not strictly before.
        let err = check("FIS100", 1, &catalog(), &plan()).unwrap_err();
        assert_eq!(
            err,
            Rejection::MissingPrerequisites {
                missing: vec!["MAT100".into()]
            }
        );
        assert_eq!(err.to_string(), "missing prerequisites: MAT100");
    }

    #[test]
    fn test_approved_prerequisite_is_satisfied() {
        let mut courses = catalog();
        courses.push(make_course("ALG200", 6, 2, &["ALG100"]));
        assert!(check("ALG200", 1, &courses, &plan()).is_ok());
    }

    #[test]
    fn test_enrolled_prerequisite_is_satisfied() {
        let mut courses = catalog();
        courses.push(make_course("BIO100", 6, 1, &[]).with_status(CourseStatus::Enrolled));
        courses.push(make_course("BIO200", 6, 2, &["BIO100"]));
        assert!(check("BIO200", 1, &courses, &plan()).is_ok());
    }

    #[test]
    fn test_dangling_prerequisite_ignored() {
        let mut courses = catalog();
        courses.push(make_course("ELE100", 6, 1, &["GHOST"]));
        assert!(check("ELE100", 1, &courses, &plan()).is_ok());
    }

    #[test]
    fn test_dependent_conflict() {
        // MAT100 cannot move to semester 2: FIS100 depends on it there.
        let err = check("MAT100", 2, &catalog(), &plan()).unwrap_err();
        assert_eq!(
            err,
            Rejection::DependentConflict {
                dependent: "FIS100".into(),
                name: "FIS100 name".into(),
                semester: 2,
            }
        );
    }

    #[test]
    fn test_dispersion_exceeded() {
        let err = check("ADV500", 1, &catalog(), &plan()).unwrap_err();
        assert_eq!(err, Rejection::DispersionExceeded { spread: 4, max: 3 });
    }

    #[test]
    fn test_move_ignores_current_position() {
        let mut plan = plan();
        plan.push(semester(4, &[]));
        let err = check("FIS100", 4, &catalog(), &plan).unwrap_err();
        // PRO200 (semester 3) depends on FIS100.
        assert_eq!(err.kind(), RejectionKind::DependentConflict);

        // QUI100's own slot in semester 1 is not held against it.
        assert!(check("QUI100", 4, &catalog(), &plan).is_ok());
    }

    fn capstone_catalog() -> Vec<Course> {
        vec![
            make_course("A", 10, 1, &[]),
            make_course("B", 10, 2, &["A"]),
            make_course("CAP", 20, 10, &[]).as_capstone(),
        ]
    }

    #[test]
    fn test_capstone_after_everything() {
        let plan = vec![
            semester(1, &[("A", 10)]),
            semester(2, &[("B", 10)]),
            semester(3, &[]),
        ];
        assert!(check("CAP", 3, &capstone_catalog(), &plan).is_ok());
    }

    #[test]
    fn test_capstone_not_alone() {
        let plan = vec![semester(1, &[("A", 10)]), semester(2, &[("B", 10)])];
        let err = check("CAP", 2, &capstone_catalog(), &plan).unwrap_err();
        assert_eq!(err, Rejection::CapstoneNotAlone { semester: 2 });
    }

    #[test]
    fn test_capstone_not_last() {
        let plan = vec![
            semester(1, &[("A", 10)]),
            semester(2, &[]),
            semester(3, &[("B", 10)]),
        ];
        let err = check("CAP", 2, &capstone_catalog(), &plan).unwrap_err();
        assert_eq!(err, Rejection::CapstoneNotLast { semester: 2 });
    }

    #[test]
    fn test_capstone_with_pending_courses() {
        let plan = vec![semester(1, &[("A", 10)]), semester(2, &[])];
        let err = check("CAP", 2, &capstone_catalog(), &plan).unwrap_err();
        assert_eq!(err, Rejection::CapstonePrerequisitesPending { remaining: 1 });
        assert_eq!(err.to_string(), "1 course(s) must be completed before the capstone");
    }

    #[test]
    fn test_second_capstone_rejected() {
        let mut courses = capstone_catalog();
        courses.push(make_course("CAP2", 20, 10, &[]).as_capstone());
        let plan = vec![
            semester(1, &[("A", 10)]),
            semester(2, &[("B", 10)]),
            semester(3, &[("CAP", 20)]),
            semester(4, &[]),
        ];
        let err = check("CAP2", 4, &courses, &plan).unwrap_err();
        assert_eq!(
            err,
            Rejection::CapstoneAlreadyPlaced {
                existing: "CAP".into()
            }
        );
    }

    #[test]
    fn test_capstone_ignores_other_unplaced_capstone() {
        let mut courses = capstone_catalog();
        courses.push(make_course("CAP2", 20, 10, &[]).as_capstone());
        let plan = vec![
            semester(1, &[("A", 10)]),
            semester(2, &[("B", 10)]),
            semester(3, &[]),
        ];
        assert!(check("CAP", 3, &courses, &plan).is_ok());
    }

    #[test]
    fn test_course_into_capstone_semester() {
        let mut courses = capstone_catalog();
        courses.push(make_course("C", 4, 1, &[]));
        let plan = vec![
            semester(1, &[("A", 10), ("C", 4)]),
            semester(2, &[("B", 10)]),
            semester(3, &[("CAP", 20)]),
            semester(4, &[]),
        ];
        let err = check("C", 3, &courses, &plan).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::CapstoneNotAlone);

        let err = check("C", 4, &courses, &plan).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::CapstoneNotLast);

        assert!(check("C", 2, &courses, &plan).is_ok());
    }

    #[test]
    fn test_kind_serializes() {
        let json = serde_json::to_string(&RejectionKind::DependentConflict).unwrap();
        assert_eq!(json, "\"DependentConflict\"");
    }
}
