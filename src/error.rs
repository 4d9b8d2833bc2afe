//! Hard errors.
//!
//! Expected domain outcomes (a rejected placement, a semester that cannot be
//! removed) are returned as [`Rejection`](crate::placement::Rejection) and
//! [`RemovalRejection`](crate::placement::RemovalRejection) values. The
//! types here cover caller contract violations and configuration failures.

use crate::placement::{Rejection, RemovalRejection};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// JSON deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rules are structurally unusable.
    #[error("invalid planning rules: {0}")]
    InvalidRules(String),
}

/// Errors from a manual editing session.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// The edit breaks a placement rule.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The semester cannot be removed.
    #[error(transparent)]
    NotRemovable(#[from] RemovalRejection),

    /// The plan has no semester with this number.
    #[error("semester {0} does not exist")]
    SemesterNotFound(u32),

    /// The course is not in the named origin semester.
    #[error("course {code} is not in semester {semester}")]
    CourseNotInSemester {
        /// Course code.
        code: String,
        /// Origin semester number.
        semester: u32,
    },

    /// The code is not in the catalog.
    #[error("course {0} not found")]
    UnknownCourse(String),
}

impl EditError {
    /// Whether this is a user-facing rule violation rather than a
    /// contract violation.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::NotRemovable(_))
    }
}
