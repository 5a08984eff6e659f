use serde::Serialize;

use crate::workflow::session::Outcome;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Positive,
    Caution,
    Critical,
}

impl Severity {
    /// Display color used by the result banner.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Positive => "#22c55e",
            Severity::Caution => "#f59e0b",
            Severity::Critical => "#ef4444",
        }
    }
}

/// Presentation metadata for one outcome category. Static copy, never
/// mutated at runtime.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultCard {
    pub title: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub action_label: &'static str,
}

static AUTHENTIC: ResultCard = ResultCard {
    title: "Likely Authentic",
    severity: Severity::Positive,
    message: "No signs of editing or AI generation were detected in this image.",
    action_label: "Generate proof (~20 min)",
};

static AI_GENERATED: ResultCard = ResultCard {
    title: "AI-Generated",
    severity: Severity::Critical,
    message: "This image was most likely produced by a generative model.",
    action_label: "Verify another image",
};

static EDITED: ResultCard = ResultCard {
    title: "Edited",
    severity: Severity::Caution,
    message: "This image appears to have been modified after capture.",
    action_label: "Verify another image",
};

/// Maps an outcome to its display card. Total over the category set; a new
/// variant fails to compile until it gets a card here.
pub fn card_for(outcome: Outcome) -> &'static ResultCard {
    match outcome {
        Outcome::Authentic => &AUTHENTIC,
        Outcome::AiGenerated => &AI_GENERATED,
        Outcome::Edited => &EDITED,
    }
}
