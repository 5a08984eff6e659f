use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info};
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::classify::{Classifier, RandomClassifier};
use crate::config::WorkflowConfig;
use crate::contract::CaptureContext;
use crate::events::WorkflowEvent;
use crate::present::{card_for, ResultCard};
use crate::progress::{ProgressPhase, ProgressTask};

use super::session::{ImageRef, Outcome, Session, Stage};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Terminal classification plus its display card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSummary {
    pub outcome: Outcome,
    pub card: &'static ResultCard,
}

/// Drives one image through the staged verification workflow.
///
/// All state lives in a single [`Session`] behind a mutex; the controller
/// and the currently live progress task are the only writers. At most one
/// progress task is alive at a time, and starting or replacing one always
/// cancels and joins its predecessor first, so a tick from a superseded
/// stage can never mutate a newer session.
#[derive(Clone)]
pub struct WorkflowController {
    session: Arc<Mutex<Session>>,
    progress: Arc<Mutex<Option<ProgressTask>>>,
    classifier: Arc<Mutex<Box<dyn Classifier>>>,
    events: broadcast::Sender<WorkflowEvent>,
    config: WorkflowConfig,
}

impl WorkflowController {
    pub fn new(config: WorkflowConfig) -> Self {
        Self::with_classifier(config, Box::new(RandomClassifier::new()))
    }

    /// Swaps in a different decision procedure, e.g. a seeded classifier in
    /// tests or, eventually, a real detector.
    pub fn with_classifier(config: WorkflowConfig, classifier: Box<dyn Classifier>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            progress: Arc::new(Mutex::new(None)),
            classifier: Arc::new(Mutex::new(classifier)),
            events,
            config,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Accepts a newly selected image, valid from any stage. Any in-flight
    /// progress task is cancelled and joined before the session is
    /// replaced; the new session then starts uploading immediately.
    pub async fn select_file(&self, image: ImageRef, context: CaptureContext) -> Session {
        self.cancel_progress().await;

        let session_id = Uuid::new_v4().to_string();
        info!(
            "selected {} ({}), session {}",
            image.file_name,
            image.kind.mime(),
            session_id
        );

        let snapshot = {
            let mut state = self.session.lock().await;
            state.begin(session_id.clone(), image, context, Utc::now());
            // `Selected` is transient; the first observable stage is `Uploading`.
            state.start_upload();
            let _ = self.events.send(WorkflowEvent::StageChanged {
                session_id,
                stage: state.stage,
            });
            state.clone()
        };

        self.spawn_progress(ProgressPhase::Upload).await;
        snapshot
    }

    /// Moves an uploaded session into verification. Ignored in any other
    /// stage.
    pub async fn request_verify(&self) -> Session {
        let snapshot = {
            let mut state = self.session.lock().await;
            if state.stage != Stage::Uploaded {
                debug!("request_verify ignored in stage {:?}", state.stage);
                return state.clone();
            }
            let Some(session_id) = state.session_id.clone() else {
                return state.clone();
            };

            state.start_verify();
            let _ = self.events.send(WorkflowEvent::StageChanged {
                session_id,
                stage: state.stage,
            });
            state.clone()
        };

        self.spawn_progress(ProgressPhase::Verify).await;
        snapshot
    }

    /// Classifies a verified session and surfaces the result. Ignored in
    /// any other stage, so the outcome is set exactly once per attempt.
    pub async fn request_results(&self) -> Option<VerificationSummary> {
        let mut state = self.session.lock().await;
        if state.stage != Stage::Verified {
            debug!("request_results ignored in stage {:?}", state.stage);
            return None;
        }
        let (session_id, image) = match (state.session_id.clone(), state.image.clone()) {
            (Some(session_id), Some(image)) => (session_id, image),
            _ => return None,
        };

        let outcome = self
            .classifier
            .lock()
            .await
            .classify(&image, &state.context);
        state.record_outcome(outcome);
        info!("session {session_id} classified as {outcome:?}");

        let _ = self.events.send(WorkflowEvent::StageChanged {
            session_id: session_id.clone(),
            stage: state.stage,
        });
        let _ = self.events.send(WorkflowEvent::ResultReady {
            session_id,
            outcome,
        });

        Some(VerificationSummary {
            outcome,
            card: card_for(outcome),
        })
    }

    async fn spawn_progress(&self, phase: ProgressPhase) {
        let mut guard = self.progress.lock().await;
        if let Some(task) = guard.take() {
            if let Err(err) = task.cancel().await {
                error!("failed to join previous progress task: {err:?}");
            }
        }

        let (step, tick_interval) = self.config.params(phase);
        *guard = Some(ProgressTask::spawn(
            phase,
            step,
            tick_interval,
            self.session.clone(),
            self.events.clone(),
        ));
    }

    async fn cancel_progress(&self) {
        let task = self.progress.lock().await.take();
        if let Some(task) = task {
            if let Err(err) = task.cancel().await {
                error!("failed to join progress task: {err:?}");
            }
        }
    }
}
