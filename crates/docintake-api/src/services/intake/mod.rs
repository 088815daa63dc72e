//! Document intake pipeline
//!
//! ownership guard → classify → store → record (compensated) → dispatch → notify

mod service;
mod types;

pub use service::{DocumentIntakeService, IntakeDependencies};
pub use types::{IntakeOutcome, IntakeSubmission};
