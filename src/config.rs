use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::progress::ProgressPhase;

/// Tunable timing for the staged progress simulation.
///
/// The defaults mimic a short upload and a slightly slower verification
/// pass; they are presentation pacing, not a contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowConfig {
    /// Percent added to upload progress per tick
    pub upload_step: u8,
    pub upload_tick_ms: u64,

    /// Percent added to verify progress per tick
    pub verify_step: u8,
    pub verify_tick_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            upload_step: 10,
            upload_tick_ms: 200,
            verify_step: 10,
            verify_tick_ms: 300,
        }
    }
}

impl WorkflowConfig {
    /// Reads settings from a JSON file, falling back to defaults when the
    /// file is missing or unparseable.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Ok(serde_json::from_str(&contents).unwrap_or_default())
    }

    /// Step and tick interval for one phase. A zero step would loop forever,
    /// so it is bumped to 1.
    pub(crate) fn params(&self, phase: ProgressPhase) -> (u8, Duration) {
        match phase {
            ProgressPhase::Upload => (
                self.upload_step.max(1),
                Duration::from_millis(self.upload_tick_ms),
            ),
            ProgressPhase::Verify => (
                self.verify_step.max(1),
                Duration::from_millis(self.verify_tick_ms),
            ),
        }
    }
}
