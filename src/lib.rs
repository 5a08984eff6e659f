pub mod classify;
pub mod config;
pub mod contract;
pub mod events;
pub mod present;
pub mod progress;
pub mod workflow;

pub use classify::{Classifier, RandomClassifier};
pub use config::WorkflowConfig;
pub use contract::{CaptureContext, VerificationRecord};
pub use events::WorkflowEvent;
pub use present::{card_for, ResultCard, Severity};
pub use workflow::{
    ImageKind, ImageRef, Outcome, Session, Stage, VerificationSummary, WorkflowController,
};
