//! Service layer: business logic orchestration.
//!
//! [`StudentService`] validates requests and coordinates the
//! [`crate::persistence::StudentStore`] for every student operation.

pub mod student_service;

pub use student_service::{GeneralAverage, StudentService};
