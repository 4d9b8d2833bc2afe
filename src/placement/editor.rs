//! Manual editing session over an automatic plan.
//!
//! The session keeps the automatic plan and the number of semesters it
//! produced, fixed at creation. Those base semesters can never be removed;
//! only semesters the student added afterwards can.
//!
//! The manual plan starts as a copy of the automatic one without its
//! violations; those describe the projection and stay on
//! [`PlanEditor::automatic_plan`].

use tracing::debug;

use super::{can_remove_semester, PlacementValidator, Rejection, RemovalRejection};
use crate::error::EditError;
use crate::models::{Course, Plan, SemesterPlan};
use crate::projection::ProjectionEngine;
use crate::rules::PlanningRules;

/// One student's editing session.
///
/// # Example
///
/// ```
/// use u_curriculum::models::Course;
/// use u_curriculum::placement::PlanEditor;
/// use u_curriculum::rules::PlanningRules;
///
/// let courses = vec![
///     Course::new("A").with_credits(10),
///     Course::new("B").with_credits(10),
/// ];
/// let mut editor = PlanEditor::new(courses, PlanningRules::default());
///
/// let extra = editor.add_semester();
/// editor.move_course("B", 1, extra).unwrap();
/// assert_eq!(editor.plan().semester_of("B"), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct PlanEditor {
    courses: Vec<Course>,
    validator: PlacementValidator,
    automatic: Plan,
    base_semesters: u32,
    plan: Plan,
}

impl PlanEditor {
    /// Projects `courses` and opens a session on the result.
    pub fn new(courses: Vec<Course>, rules: PlanningRules) -> Self {
        let automatic = ProjectionEngine::new().with_rules(rules).project(&courses);
        let base_semesters = automatic.last_semester_number().unwrap_or(0);
        let plan = manual_copy(&automatic);
        Self {
            courses,
            validator: PlacementValidator::new().with_rules(rules),
            automatic,
            base_semesters,
            plan,
        }
    }

    /// The catalog the session edits against.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// The plan as the engine produced it.
    pub fn automatic_plan(&self) -> &Plan {
        &self.automatic
    }

    /// Number of semesters in the automatic plan, fixed for the session.
    pub fn base_semesters(&self) -> u32 {
        self.base_semesters
    }

    /// The plan being edited.
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Ends the session, returning the edited plan.
    pub fn into_plan(self) -> Plan {
        self.plan
    }

    /// Moves `code` from semester `from` to semester `to`.
    pub fn move_course(&mut self, code: &str, from: u32, to: u32) -> Result<(), EditError> {
        let from_idx = self.index_of(from)?;
        if !self.plan.semesters[from_idx].contains(code) {
            return Err(EditError::CourseNotInSemester {
                code: code.to_string(),
                semester: from,
            });
        }
        if from == to {
            return Ok(());
        }
        let to_idx = self.index_of(to)?;
        let credits = self.credits_of(code)?;

        self.validate(code, to_idx)?;

        self.plan.semesters[from_idx].remove(code, credits);
        self.plan.semesters[to_idx].push(code, credits);
        Ok(())
    }

    /// Places a course that is not in the plan yet.
    pub fn add_course(&mut self, code: &str, to: u32) -> Result<(), EditError> {
        let to_idx = self.index_of(to)?;
        let credits = self.credits_of(code)?;

        if let Some(semester) = self.plan.semester_of(code) {
            return Err(Rejection::DuplicateInSemester {
                code: code.to_string(),
                semester,
            }
            .into());
        }

        self.validate(code, to_idx)?;
        self.plan.semesters[to_idx].push(code, credits);
        Ok(())
    }

    /// Takes a course out of the plan.
    ///
    /// While a capstone is placed, every other pending course must stay
    /// scheduled before it, so removing one is refused.
    pub fn remove_course(&mut self, code: &str, from: u32) -> Result<(), EditError> {
        let from_idx = self.index_of(from)?;
        let credits = self.credits_of(code)?;
        if !self.plan.semesters[from_idx].contains(code) {
            return Err(EditError::CourseNotInSemester {
                code: code.to_string(),
                semester: from,
            });
        }
        if let Some(capstone) = self.placed_capstone(code) {
            let rejection = Rejection::NeededBeforeCapstone {
                code: code.to_string(),
                capstone: capstone.to_string(),
            };
            debug!(course = code, semester = from, %rejection, "removal rejected");
            return Err(rejection.into());
        }
        if self.plan.semesters[from_idx].remove(code, credits) {
            Ok(())
        } else {
            Err(EditError::CourseNotInSemester {
                code: code.to_string(),
                semester: from,
            })
        }
    }

    /// Appends an empty semester and returns its number.
    pub fn add_semester(&mut self) -> u32 {
        let number = self.plan.last_semester_number().unwrap_or(0) + 1;
        self.plan.semesters.push(SemesterPlan::new(number));
        number
    }

    /// Removes semester `number`.
    ///
    /// A capstone-only semester hands its capstone to the empty semester
    /// before it. Later semesters are renumbered down by one.
    pub fn remove_semester(&mut self, number: u32) -> Result<(), EditError> {
        if number <= self.base_semesters {
            return Err(RemovalRejection::Protected { semester: number }.into());
        }
        can_remove_semester(number, &self.plan.semesters, &self.courses)?;

        let idx = self.index_of(number)?;
        let removed = self.plan.semesters.remove(idx);
        if let Some(capstone) = removed.courses.first() {
            let prev_idx = self.index_of(number - 1)?;
            self.plan.semesters[prev_idx].push(capstone.clone(), removed.total_credits);
            debug!(course = %capstone, from = number, to = number - 1, "capstone moved back");
        }

        for semester in self.plan.semesters.iter_mut() {
            if semester.number > number {
                semester.number -= 1;
            }
        }
        Ok(())
    }

    /// Pending courses that are not placed anywhere.
    pub fn unplaced_courses(&self) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| c.is_pending() && self.plan.semester_of(&c.code).is_none())
            .collect()
    }

    /// Discards all edits.
    pub fn reset(&mut self) {
        self.plan = manual_copy(&self.automatic);
    }

    /// The placed capstone that depends on `code` being scheduled, if any.
    fn placed_capstone(&self, code: &str) -> Option<&str> {
        let course = self.courses.iter().find(|c| c.code == code)?;
        if course.capstone || !course.is_pending() {
            return None;
        }
        self.courses
            .iter()
            .filter(|c| c.capstone)
            .find(|c| self.plan.semester_of(&c.code).is_some())
            .map(|c| c.code.as_str())
    }

    fn index_of(&self, number: u32) -> Result<usize, EditError> {
        self.plan
            .semesters
            .iter()
            .position(|s| s.number == number)
            .ok_or(EditError::SemesterNotFound(number))
    }

    fn credits_of(&self, code: &str) -> Result<u32, EditError> {
        self.courses
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.credits)
            .ok_or_else(|| EditError::UnknownCourse(code.to_string()))
    }

    fn validate(&self, code: &str, to_idx: usize) -> Result<(), EditError> {
        let target = &self.plan.semesters[to_idx];
        self.validator
            .can_place(code, target, &self.courses, &self.plan.semesters)
            .map_err(|rejection| {
                debug!(course = code, semester = target.number, %rejection, "placement rejected");
                EditError::from(rejection)
            })
    }
}

fn manual_copy(automatic: &Plan) -> Plan {
    Plan {
        semesters: automatic.semesters.clone(),
        violations: Vec::new(),
    }
}
