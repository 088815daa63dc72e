//! Request-path services: the intake pipeline and its side effects.

pub mod dispatch;
pub mod intake;
pub mod notification;

pub use dispatch::{AnalysisDispatcher, DispatchError};
pub use intake::{DocumentIntakeService, IntakeOutcome, IntakeSubmission};
pub use notification::{NotificationError, Notifier, UploadNotification};
