//! Curriculum planning domain models.
//!
//! Provides the data types for describing a student's curriculum standing
//! and the semester-by-semester plans built from it.
//!
//! | Type | Meaning |
//! |------|---------|
//! | `Course` | Curriculum entry plus the student's standing |
//! | `SemesterPlan` | One slot of a projection |
//! | `Plan` | Ordered semesters plus recorded violations |
//! | `PlanRow` | Flattened storage shape |

mod course;
mod plan;

pub use course::{Course, CourseStatus};
pub use plan::{Plan, PlanRow, SemesterPlan, Violation, ViolationType};
