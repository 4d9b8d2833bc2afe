//! Catalog integrity checks and plan auditing.
//!
//! [`validate_catalog`] inspects the course list before planning. Detects:
//! - Duplicate codes
//! - Prerequisites missing from the catalog
//! - Self-referencing prerequisites
//! - Circular prerequisite chains (DAG validation)
//! - More than one capstone
//! - Courses too large for any semester
//!
//! The planner tolerates all of these (it drops dangling prerequisites and
//! force-places around cycles), so this is diagnostic.
//!
//! [`audit_plan`] re-checks a finished plan, automatic or hand-edited,
//! against the planning rules.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::models::{Course, Plan, Violation, ViolationType};
use crate::rules::{level_spread, PlanningRules};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two courses share the same code.
    DuplicateCode,
    /// A prerequisite code is not in the catalog.
    InvalidPrerequisite,
    /// A course lists itself as prerequisite.
    SelfPrerequisite,
    /// The prerequisite graph contains a cycle.
    CyclicDependency,
    /// More than one course is flagged as capstone.
    MultipleCapstones,
    /// A course has more credits than a semester allows.
    OversizedCourse,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a course catalog.
///
/// Checks:
/// 1. No duplicate codes
/// 2. Every prerequisite exists
/// 3. No course requires itself
/// 4. At most one capstone
/// 5. No course exceeds the credit cap
/// 6. No circular prerequisite chains
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(courses: &[Course], rules: &PlanningRules) -> ValidationResult {
    let mut errors = Vec::new();

    let mut codes = HashSet::new();
    for course in courses {
        if !codes.insert(course.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCode,
                format!("Duplicate course code: {}", course.code),
            ));
        }
    }

    for course in courses {
        for prereq in &course.prerequisites {
            if prereq == &course.code {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfPrerequisite,
                    format!("Course '{}' requires itself", course.code),
                ));
            } else if !codes.contains(prereq.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPrerequisite,
                    format!(
                        "Course '{}' requires unknown course '{}'",
                        course.code, prereq
                    ),
                ));
            }
        }

        if !rules.fits_credits(course.credits) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OversizedCourse,
                format!(
                    "Course '{}' has {} credits, above the {}-credit cap",
                    course.code, course.credits, rules.max_credits
                ),
            ));
        }
    }

    let capstones: Vec<&str> = courses
        .iter()
        .filter(|c| c.capstone)
        .map(|c| c.code.as_str())
        .collect();
    if capstones.len() > 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::MultipleCapstones,
            format!("Multiple capstones: {}", capstones.join(", ")),
        ));
    }

    if let Some(cycle_err) = detect_cycles(courses) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the prerequisite graph using DFS.
///
/// # Algorithm
/// If a back-edge is found (visiting a node currently in the recursion
/// stack), a cycle exists. Roots are tried in catalog order so the
/// reported course is stable. Self-edges are reported separately and
/// skipped here.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(courses: &[Course]) -> Option<ValidationError> {
    // course → its prerequisites
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let codes: HashSet<&str> = courses.iter().map(|c| c.code.as_str()).collect();

    for course in courses {
        let edges = adj.entry(course.code.as_str()).or_default();
        for prereq in &course.prerequisites {
            if prereq != &course.code && codes.contains(prereq.as_str()) {
                edges.push(prereq.as_str());
            }
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for course in courses {
        let node = course.code.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular prerequisite chain involving course '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}

/// Audits a plan against the planning rules.
///
/// Checks numbering (1, 2, 3, ... with no gaps), unknown and duplicated
/// codes, the credit cap, stored totals, prerequisite order, level
/// dispersion and capstone placement. Returns every violation found; an
/// empty list means the plan is legal.
pub fn audit_plan(plan: &Plan, courses: &[Course], rules: &PlanningRules) -> Vec<Violation> {
    let by_code: HashMap<&str, &Course> = courses.iter().map(|c| (c.code.as_str(), c)).collect();
    let mut violations = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, semester) in plan.semesters.iter().enumerate() {
        let label = semester.number.to_string();

        if semester.number as usize != i + 1 {
            violations.push(Violation::new(
                ViolationType::NumberingGap,
                &label,
                format!("semester at position {} is numbered {}", i + 1, semester.number),
            ));
        }

        let mut known: Vec<&Course> = Vec::with_capacity(semester.len());
        for code in &semester.courses {
            if !seen.insert(code.as_str()) {
                violations.push(Violation::new(
                    ViolationType::DuplicateCourse,
                    code,
                    format!("{code} is placed more than once"),
                ));
            }
            match by_code.get(code.as_str()) {
                Some(course) => known.push(course),
                None => violations.push(Violation::new(
                    ViolationType::UnknownCourse,
                    code,
                    format!("{code} is not in the catalog"),
                )),
            }
        }

        let credits = known.iter().fold(0u32, |acc, c| acc.saturating_add(c.credits));
        if !rules.fits_credits(credits) {
            violations.push(Violation::new(
                ViolationType::CreditCapExceeded,
                &label,
                format!("{credits} credits exceed the {}-credit cap", rules.max_credits),
            ));
        }
        if known.len() == semester.len() && credits != semester.total_credits {
            violations.push(Violation::new(
                ViolationType::CreditTotalMismatch,
                &label,
                format!(
                    "stored total {} differs from course credits {credits}",
                    semester.total_credits
                ),
            ));
        }

        let spread = level_spread(known.iter().map(|c| c.level));
        if spread > rules.max_level_spread {
            violations.push(Violation::new(
                ViolationType::DispersionExceeded,
                &label,
                format!("level spread {spread} exceeds {}", rules.max_level_spread),
            ));
        }

        for course in &known {
            for prereq in &course.prerequisites {
                let Some(required) = by_code.get(prereq.as_str()) else {
                    continue;
                };
                if required.status.is_satisfied() {
                    continue;
                }
                let earlier = plan
                    .semester_of(prereq)
                    .is_some_and(|n| n < semester.number);
                if !earlier {
                    violations.push(Violation::new(
                        ViolationType::PrerequisiteOrder,
                        &course.code,
                        format!(
                            "{} needs {prereq} before semester {}",
                            course.code, semester.number
                        ),
                    ));
                }
            }
        }

        for capstone in known.iter().filter(|c| c.capstone) {
            if let Some(reason) = capstone_problem(plan, courses, &capstone.code, semester.number)
            {
                violations.push(Violation::new(
                    ViolationType::CapstoneMisplaced,
                    &capstone.code,
                    reason,
                ));
            }
        }
    }

    violations
}

fn capstone_problem(plan: &Plan, courses: &[Course], code: &str, at: u32) -> Option<String> {
    let semester = plan.semester(at)?;
    if semester.len() > 1 {
        return Some(format!("{code} shares semester {at}"));
    }
    if plan.semesters.iter().any(|s| s.number > at && !s.is_empty()) {
        return Some(format!("courses follow {code} in semester {at}"));
    }
    let pending = courses
        .iter()
        .filter(|c| !c.capstone && c.is_pending())
        .filter(|c| !plan.semester_of(&c.code).is_some_and(|n| n < at))
        .count();
    if pending > 0 {
        return Some(format!("{pending} course(s) are not done before {code}"));
    }
    None
}
