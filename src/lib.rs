//! Curriculum projection for the U-Engine ecosystem.
//!
//! Given a student's course history, projects the remaining courses into
//! future semesters under prerequisite, credit-cap and level-dispersion
//! rules, and validates the manual edits a student makes to that plan.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `CourseStatus`, `SemesterPlan`,
//!   `Plan`, `PlanRow`, `Violation`
//! - **`rules`**: `PlanningRules` shared by the planner and the validators
//! - **`dispatching`**: Priority rules and the `RuleEngine` ordering eligible courses
//! - **`projection`**: `ProjectionEngine` (greedy semester planner) and `PlanSummary`
//! - **`placement`**: `PlacementValidator`, semester removal, and the `PlanEditor` session
//! - **`validation`**: Catalog integrity checks (duplicates, dangling refs, cycles) and plan audits
//! - **`ingest`**: Normalization of raw catalog and transcript data into `Course` lists
//! - **`error`**: Hard errors for configuration and editing contract violations
//!
//! # Example
//!
//! ```
//! use u_curriculum::models::{Course, CourseStatus};
//! use u_curriculum::projection::project;
//!
//! let courses = vec![
//!     Course::new("MAT-100").with_credits(10).with_status(CourseStatus::Approved),
//!     Course::new("FIS-100").with_credits(10).with_prerequisite("MAT-100"),
//!     Course::new("FIS-200").with_credits(10).with_level(2).with_prerequisite("FIS-100"),
//! ];
//!
//! let plan = project(&courses);
//! assert_eq!(plan.semester_count(), 2);
//! assert!(plan.is_clean());
//! ```
//!
//! # Logging
//!
//! Degradations (forced placements, dropped prerequisites, unplaceable
//! courses) are emitted through `tracing` at `warn` level. The crate never
//! installs a subscriber.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4 (priority dispatching)
//! - Coffman, Garey & Johnson (1996), "Approximation Algorithms for Bin Packing: A Survey"

pub mod dispatching;
pub mod error;
pub mod ingest;
pub mod models;
pub mod placement;
pub mod projection;
pub mod rules;
pub mod validation;

pub use error::{EditError, Error};
pub use models::{Course, CourseStatus, Plan, SemesterPlan};
pub use placement::{PlacementValidator, PlanEditor, Rejection};
pub use projection::ProjectionEngine;
pub use rules::PlanningRules;
