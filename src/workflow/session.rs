use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp;

use crate::contract::CaptureContext;

/// Progress values are percentages; a stage cannot advance until its
/// progress counter has reached this value.
pub const PROGRESS_COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Idle,
    Selected,
    Uploading,
    Uploaded,
    Verifying,
    Verified,
    ResultShown,
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Idle
    }
}

/// Image MIME types accepted at the selection boundary. Anything else never
/// becomes an [`ImageRef`], so the core only ever sees supported inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ImageKind {
    Png,
    Jpeg,
    Webp,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(ImageKind::Png),
            "image/jpeg" => Some(ImageKind::Jpeg),
            "image/webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Webp => "image/webp",
        }
    }
}

/// Opaque reference to the selected image resource. The session owns it
/// exclusively; re-selection replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub file_name: String,
    pub kind: ImageKind,
    pub byte_size: u64,
}

/// Final classification category assigned to a verified image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Authentic,
    AiGenerated,
    Edited,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Authentic, Outcome::AiGenerated, Outcome::Edited];
}

/// Mutable record of one image's journey through the workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub stage: Stage,
    pub session_id: Option<String>,
    pub image: Option<ImageRef>,
    pub context: CaptureContext,
    pub upload_progress: u8,
    pub verify_progress: u8,
    pub outcome: Option<Outcome>,
    pub selected_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            stage: Stage::Idle,
            session_id: None,
            image: None,
            context: CaptureContext::default(),
            upload_progress: 0,
            verify_progress: 0,
            outcome: None,
            selected_at: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole session for a freshly selected image. Nothing from
    /// the previous attempt survives.
    pub fn begin(
        &mut self,
        session_id: String,
        image: ImageRef,
        context: CaptureContext,
        selected_at: DateTime<Utc>,
    ) {
        *self = Self {
            stage: Stage::Selected,
            session_id: Some(session_id),
            image: Some(image),
            context,
            upload_progress: 0,
            verify_progress: 0,
            outcome: None,
            selected_at: Some(selected_at),
        };
    }

    pub fn start_upload(&mut self) {
        self.upload_progress = 0;
        self.stage = Stage::Uploading;
    }

    /// Advances upload progress by `step`, clamped to 100. Only meaningful
    /// while uploading; any other stage leaves the session untouched.
    pub fn apply_upload_tick(&mut self, step: u8) -> u8 {
        if self.stage != Stage::Uploading {
            return self.upload_progress;
        }
        self.upload_progress = cmp::min(self.upload_progress.saturating_add(step), PROGRESS_COMPLETE);
        if self.upload_progress == PROGRESS_COMPLETE {
            self.stage = Stage::Uploaded;
        }
        self.upload_progress
    }

    pub fn start_verify(&mut self) {
        self.verify_progress = 0;
        self.stage = Stage::Verifying;
    }

    pub fn apply_verify_tick(&mut self, step: u8) -> u8 {
        if self.stage != Stage::Verifying {
            return self.verify_progress;
        }
        self.verify_progress = cmp::min(self.verify_progress.saturating_add(step), PROGRESS_COMPLETE);
        if self.verify_progress == PROGRESS_COMPLETE {
            self.stage = Stage::Verified;
        }
        self.verify_progress
    }

    /// Records the terminal classification. Set exactly once per attempt;
    /// `begin` is the only way to clear it again.
    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.stage = Stage::ResultShown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> ImageRef {
        ImageRef {
            file_name: "sunset.png".into(),
            kind: ImageKind::Png,
            byte_size: 204_800,
        }
    }

    fn uploading_session() -> Session {
        let mut session = Session::new();
        session.begin(
            "s-1".into(),
            sample_image(),
            CaptureContext::default(),
            Utc::now(),
        );
        session.start_upload();
        session
    }

    #[test]
    fn upload_ticks_are_monotonic_and_gate_the_stage() {
        let mut session = uploading_session();

        for expected in [10, 20, 30, 40, 50] {
            assert_eq!(session.apply_upload_tick(10), expected);
        }
        assert_eq!(session.stage, Stage::Uploading);

        for _ in 0..5 {
            session.apply_upload_tick(10);
        }
        assert_eq!(session.upload_progress, 100);
        assert_eq!(session.stage, Stage::Uploaded);
    }

    #[test]
    fn upload_progress_clamps_at_100() {
        let mut session = uploading_session();

        // 7 does not divide 100; the final tick must clamp, not overflow.
        let mut previous = 0;
        while session.stage == Stage::Uploading {
            let value = session.apply_upload_tick(7);
            assert!(value >= previous);
            assert!(value <= 100);
            previous = value;
        }
        assert_eq!(session.upload_progress, 100);
    }

    #[test]
    fn ticks_outside_their_stage_do_nothing() {
        let mut session = uploading_session();
        assert_eq!(session.apply_verify_tick(10), 0);
        assert_eq!(session.stage, Stage::Uploading);

        while session.stage == Stage::Uploading {
            session.apply_upload_tick(10);
        }
        assert_eq!(session.apply_upload_tick(10), 100);
        assert_eq!(session.stage, Stage::Uploaded);
    }

    #[test]
    fn verify_ticks_complete_the_stage() {
        let mut session = uploading_session();
        while session.stage == Stage::Uploading {
            session.apply_upload_tick(10);
        }
        session.start_verify();
        assert_eq!(session.verify_progress, 0);

        for _ in 0..10 {
            session.apply_verify_tick(10);
        }
        assert_eq!(session.verify_progress, 100);
        assert_eq!(session.stage, Stage::Verified);
    }

    #[test]
    fn begin_discards_every_field_of_the_old_attempt() {
        let mut session = uploading_session();
        for _ in 0..4 {
            session.apply_upload_tick(10);
        }
        session.record_outcome(Outcome::Edited);

        session.begin(
            "s-2".into(),
            ImageRef {
                file_name: "portrait.jpg".into(),
                kind: ImageKind::Jpeg,
                byte_size: 91_002,
            },
            CaptureContext::default(),
            Utc::now(),
        );

        assert_eq!(session.stage, Stage::Selected);
        assert_eq!(session.session_id.as_deref(), Some("s-2"));
        assert_eq!(session.upload_progress, 0);
        assert_eq!(session.verify_progress, 0);
        assert!(session.outcome.is_none());
    }

    #[test]
    fn image_kind_accepts_only_supported_mime_types() {
        assert_eq!(ImageKind::from_mime("image/png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime("image/jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("image/webp"), Some(ImageKind::Webp));
        assert_eq!(ImageKind::from_mime("image/gif"), None);
        assert_eq!(ImageKind::from_mime("application/pdf"), None);
    }
}
