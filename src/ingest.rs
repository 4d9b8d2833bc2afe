//! Upstream normalization.
//!
//! Turns the raw catalog and enrollment history delivered by the
//! university systems into the [`Course`] list the planner consumes:
//!
//! - the prerequisite string is split on commas;
//! - each course's status comes from its most recent non-excluded
//!   enrollment record (on equal periods, the first one listed);
//! - the attempt count is the number of non-excluded records;
//! - the capstone flag is set once, here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Course, CourseStatus};

/// Default name fragment identifying the capstone course.
pub const DEFAULT_CAPSTONE_PATTERN: &str = "capstone project";

/// One catalog row as delivered upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Course code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Credit weight.
    pub credits: u32,
    /// Curriculum level.
    pub level: u32,
    /// Comma-separated prerequisite codes (may be empty).
    #[serde(default)]
    pub prerequisites: String,
}

/// One enrollment record from the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// Course code.
    pub course: String,
    /// Academic period, e.g. `"202410"`. Compared as text.
    pub period: String,
    /// Raw status string.
    pub status: String,
    /// Excluded records (annulled, homologated away) are ignored.
    #[serde(default)]
    pub excluded: bool,
}

/// Decides which catalog entries are capstones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapstoneMatcher {
    /// Codes that are always capstones.
    pub codes: Vec<String>,
    /// Case-insensitive name fragment.
    pub name_pattern: String,
}

impl Default for CapstoneMatcher {
    fn default() -> Self {
        Self {
            codes: Vec::new(),
            name_pattern: DEFAULT_CAPSTONE_PATTERN.to_string(),
        }
    }
}

impl CapstoneMatcher {
    /// Adds a capstone code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.codes.push(code.into());
        self
    }

    /// Replaces the name fragment. An empty pattern matches nothing.
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = pattern.into();
        self
    }

    /// Whether `entry` is a capstone.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if self.codes.iter().any(|c| c == &entry.code) {
            return true;
        }
        !self.name_pattern.is_empty()
            && entry
                .name
                .to_lowercase()
                .contains(&self.name_pattern.to_lowercase())
    }
}

/// Splits a comma-separated prerequisite string.
///
/// Codes are trimmed; empty fragments and repeats are dropped.
///
/// ```
/// use u_curriculum::ingest::parse_prerequisites;
///
/// assert_eq!(parse_prerequisites("MAT-100, FIS-100,,MAT-100"), vec!["MAT-100", "FIS-100"]);
/// assert!(parse_prerequisites("").is_empty());
/// ```
pub fn parse_prerequisites(raw: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if !codes.iter().any(|c| c == code) {
            codes.push(code.to_string());
        }
    }
    codes
}

/// Builds the planner's course list from catalog and transcript.
///
/// Output order follows `catalog`. Records for codes outside the catalog
/// are ignored.
pub fn normalize(
    catalog: &[CatalogEntry],
    records: &[EnrollmentRecord],
    matcher: &CapstoneMatcher,
) -> Vec<Course> {
    let mut latest: HashMap<&str, &EnrollmentRecord> = HashMap::new();
    let mut attempts: HashMap<&str, u32> = HashMap::new();

    for record in records.iter().filter(|r| !r.excluded) {
        *attempts.entry(record.course.as_str()).or_insert(0) += 1;
        let newer = latest
            .get(record.course.as_str())
            .map_or(true, |current| record.period > current.period);
        if newer {
            latest.insert(record.course.as_str(), record);
        }
    }

    catalog
        .iter()
        .map(|entry| {
            let status = match latest.get(entry.code.as_str()) {
                Some(record) => CourseStatus::from_raw(&record.status).unwrap_or_else(|| {
                    warn!(
                        course = %entry.code,
                        status = %record.status,
                        "unknown enrollment status, treating as not taken"
                    );
                    CourseStatus::NotTaken
                }),
                None => CourseStatus::NotTaken,
            };

            let mut course = Course::new(entry.code.clone())
                .with_name(entry.name.clone())
                .with_credits(entry.credits)
                .with_level(entry.level)
                .with_prerequisites(parse_prerequisites(&entry.prerequisites))
                .with_status(status)
                .with_attempts(attempts.get(entry.code.as_str()).copied().unwrap_or(0));
            if matcher.matches(entry) {
                course = course.as_capstone();
            }
            course
        })
        .collect()
}
