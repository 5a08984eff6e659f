pub mod controller;
pub mod session;

pub use controller::{VerificationSummary, WorkflowController};
pub use session::{ImageKind, ImageRef, Outcome, Session, Stage};
