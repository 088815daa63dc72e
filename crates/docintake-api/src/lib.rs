//! Document Intake API Library
//!
//! HTTP handlers, the intake pipeline services, and application setup.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use error::ErrorResponse;
pub use services::{DocumentIntakeService, IntakeOutcome, IntakeSubmission};
pub use state::AppState;
