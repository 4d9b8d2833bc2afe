//! Course (curriculum entry) model.
//!
//! A course is one node of the curriculum's prerequisite graph, annotated
//! with the student's standing on it.

use serde::{Deserialize, Serialize};

/// A student's standing on a course, already collapsed from the raw
/// enrollment vocabulary (see [`crate::ingest`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    /// Passed. Never planned again.
    Approved,
    /// Most recent attempt failed.
    Failed,
    /// Never attempted.
    #[default]
    NotTaken,
    /// Currently being taken. Treated as done for planning purposes.
    Enrolled,
}

impl CourseStatus {
    /// Collapses an upstream status string into a status.
    ///
    /// Case and surrounding whitespace are ignored; inner spaces and dashes
    /// read as underscores (`"NO CURSADA"`, `"not-taken"`). Returns `None`
    /// for unrecognized values.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match key.as_str() {
            "APROBADO" | "APPROVED" | "PASSED" => Some(Self::Approved),
            "REPROBADO" | "FAILED" => Some(Self::Failed),
            "NO_CURSADA" | "NOT_TAKEN" | "PENDING" => Some(Self::NotTaken),
            "INSCRITO" | "CURSANDO" | "ENROLLED" | "IN_PROGRESS" => Some(Self::Enrolled),
            _ => None,
        }
    }

    /// Whether the course counts as done (approved or currently enrolled).
    #[inline]
    pub fn is_satisfied(self) -> bool {
        matches!(self, Self::Approved | Self::Enrolled)
    }

    /// Whether the course still has to be planned.
    #[inline]
    pub fn is_pending(self) -> bool {
        !self.is_satisfied()
    }
}

/// A course in a curriculum.
///
/// # Prerequisites
/// `prerequisites` holds course codes. Codes that do not exist in the
/// curriculum are tolerated: the planner and the validator ignore them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique code within the curriculum.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Credit weight.
    pub credits: u32,
    /// Tier in the reference curriculum (year/semester).
    pub level: u32,
    /// Codes that must be satisfied before this course.
    pub prerequisites: Vec<String>,
    /// Student's standing.
    pub status: CourseStatus,
    /// Number of non-excluded enrollment records.
    pub attempt_count: u32,
    /// Terminal course that must be taken alone, last.
    pub capstone: bool,
}

impl Course {
    /// Creates a not-taken course with the given code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            credits: 0,
            level: 1,
            prerequisites: Vec::new(),
            status: CourseStatus::NotTaken,
            attempt_count: 0,
            capstone: false,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the credit weight.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the curriculum level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Adds a prerequisite code.
    pub fn with_prerequisite(mut self, code: impl Into<String>) -> Self {
        self.prerequisites.push(code.into());
        self
    }

    /// Replaces the prerequisite list.
    pub fn with_prerequisites<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: CourseStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the attempt count.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempt_count = attempts;
        self
    }

    /// Marks the course as the capstone.
    pub fn as_capstone(mut self) -> Self {
        self.capstone = true;
        self
    }

    /// Whether the course is approved.
    #[inline]
    pub fn is_approved(&self) -> bool {
        self.status == CourseStatus::Approved
    }

    /// Whether the course still has to be planned.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Whether `code` is listed as a prerequisite.
    pub fn requires(&self, code: &str) -> bool {
        self.prerequisites.iter().any(|p| p == code)
    }
}
