//! Manual plan editing: placement checks, semester removal, and the
//! editing session that applies them.
//!
//! Rule violations are ordinary return values ([`Rejection`],
//! [`RemovalRejection`]) so callers can show them inline. Only contract
//! violations (unknown semester numbers, a course not where the caller
//! said it was) surface as [`EditError`](crate::error::EditError) variants
//! of their own.

mod editor;
mod removal;
mod validator;

pub use editor::PlanEditor;
pub use removal::{can_remove_semester, RemovalRejection};
pub use validator::{can_place, PlacementValidator, Rejection, RejectionKind};
