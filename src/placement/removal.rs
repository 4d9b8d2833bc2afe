//! Semester removal.
//!
//! A semester may be deleted when it is empty, or when it holds only the
//! capstone and the semester right before it is empty (the capstone slides
//! back). Protection of the automatic plan's semesters is the caller's job.

use crate::models::{Course, SemesterPlan};

/// Why a semester cannot be removed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemovalRejection {
    /// The plan has no semester with this number.
    #[error("semester {0} does not exist")]
    UnknownSemester(u32),

    /// The semester still holds courses.
    #[error("semester {semester} is not empty")]
    NotEmpty {
        /// Semester number.
        semester: u32,
    },

    /// The capstone has no empty semester to slide back into.
    #[error("the capstone in semester {semester} needs an empty semester before it")]
    CapstoneCannotSlide {
        /// Semester number.
        semester: u32,
    },

    /// The semester belongs to the automatic plan.
    #[error("semester {semester} is part of the automatic plan")]
    Protected {
        /// Semester number.
        semester: u32,
    },
}

/// Decides whether semester `number` may be removed from `plan`.
pub fn can_remove_semester(
    number: u32,
    plan: &[SemesterPlan],
    courses: &[Course],
) -> Result<(), RemovalRejection> {
    let semester = plan
        .iter()
        .find(|s| s.number == number)
        .ok_or(RemovalRejection::UnknownSemester(number))?;

    if semester.is_empty() {
        return Ok(());
    }

    let capstone_only = match semester.courses.as_slice() {
        [only] => courses.iter().any(|c| &c.code == only && c.capstone),
        _ => false,
    };
    if !capstone_only {
        return Err(RemovalRejection::NotEmpty { semester: number });
    }

    let previous_empty = number
        .checked_sub(1)
        .and_then(|prev| plan.iter().find(|s| s.number == prev))
        .is_some_and(SemesterPlan::is_empty);
    if previous_empty {
        Ok(())
    } else {
        Err(RemovalRejection::CapstoneCannotSlide { semester: number })
    }
}
