//! Events published by the workflow controller for UI consumption.

use serde::Serialize;

use crate::workflow::session::{Outcome, Stage};

/// One externally observable change to the active session. Every event
/// carries the session id so consumers can discard anything from a
/// superseded attempt.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkflowEvent {
    #[serde(rename_all = "camelCase")]
    StageChanged { session_id: String, stage: Stage },
    #[serde(rename_all = "camelCase")]
    UploadProgress { session_id: String, percent: u8 },
    #[serde(rename_all = "camelCase")]
    VerifyProgress { session_id: String, percent: u8 },
    #[serde(rename_all = "camelCase")]
    ResultReady {
        session_id: String,
        outcome: Outcome,
    },
}

impl WorkflowEvent {
    pub fn session_id(&self) -> &str {
        match self {
            WorkflowEvent::StageChanged { session_id, .. }
            | WorkflowEvent::UploadProgress { session_id, .. }
            | WorkflowEvent::VerifyProgress { session_id, .. }
            | WorkflowEvent::ResultReady { session_id, .. } => session_id,
        }
    }
}
