use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::events::WorkflowEvent;
use crate::workflow::session::{Session, Stage, PROGRESS_COMPLETE};

/// Which progress counter a simulator task drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Upload,
    Verify,
}

impl ProgressPhase {
    /// Stage during which ticks for this phase are valid.
    pub fn active_stage(&self) -> Stage {
        match self {
            ProgressPhase::Upload => Stage::Uploading,
            ProgressPhase::Verify => Stage::Verifying,
        }
    }

    fn apply(&self, session: &mut Session, step: u8) -> u8 {
        match self {
            ProgressPhase::Upload => session.apply_upload_tick(step),
            ProgressPhase::Verify => session.apply_verify_tick(step),
        }
    }

    fn progress_event(&self, session_id: String, percent: u8) -> WorkflowEvent {
        match self {
            ProgressPhase::Upload => WorkflowEvent::UploadProgress { session_id, percent },
            ProgressPhase::Verify => WorkflowEvent::VerifyProgress { session_id, percent },
        }
    }
}

/// A running progress simulator. One exists per active stage; cancelling it
/// joins the underlying task, so after [`ProgressTask::cancel`] returns no
/// further tick can touch the session.
pub struct ProgressTask {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl ProgressTask {
    pub fn spawn(
        phase: ProgressPhase,
        step: u8,
        tick_interval: Duration,
        session: Arc<Mutex<Session>>,
        events: broadcast::Sender<WorkflowEvent>,
    ) -> Self {
        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let handle = tokio::spawn(progress_loop(
            phase,
            step,
            tick_interval,
            session,
            events,
            token_clone,
        ));

        Self {
            handle,
            cancel_token,
        }
    }

    pub async fn cancel(self) -> Result<()> {
        self.cancel_token.cancel();
        self.handle.await.context("progress task failed to join")
    }
}

async fn progress_loop(
    phase: ProgressPhase,
    step: u8,
    tick_interval: Duration,
    session: Arc<Mutex<Session>>,
    events: broadcast::Sender<WorkflowEvent>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                debug!("{phase:?} progress loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                let done = {
                    let mut guard = session.lock().await;
                    if guard.stage != phase.active_stage() {
                        break;
                    }
                    let Some(session_id) = guard.session_id.clone() else {
                        break;
                    };

                    let percent = phase.apply(&mut guard, step);
                    let _ = events.send(phase.progress_event(session_id.clone(), percent));

                    let done = percent >= PROGRESS_COMPLETE;
                    if done {
                        // apply() moved the stage past the progress gate
                        let _ = events.send(WorkflowEvent::StageChanged {
                            session_id,
                            stage: guard.stage,
                        });
                    }
                    done
                };

                if done {
                    debug!("{phase:?} progress complete");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CaptureContext;
    use crate::workflow::session::{ImageKind, ImageRef};
    use chrono::Utc;

    fn uploading_session() -> Session {
        let mut session = Session::new();
        session.begin(
            "s-1".into(),
            ImageRef {
                file_name: "sunset.png".into(),
                kind: ImageKind::Png,
                byte_size: 204_800,
            },
            CaptureContext::default(),
            Utc::now(),
        );
        session.start_upload();
        session
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_ticks() {
        let session = Arc::new(Mutex::new(uploading_session()));
        let (events, _rx) = broadcast::channel(16);

        let task = ProgressTask::spawn(
            ProgressPhase::Upload,
            10,
            Duration::from_millis(200),
            session.clone(),
            events,
        );
        task.cancel().await.unwrap();

        let guard = session.lock().await;
        assert_eq!(guard.upload_progress, 0);
        assert_eq!(guard.stage, Stage::Uploading);
    }

    #[tokio::test(start_paused = true)]
    async fn task_stops_itself_at_100() {
        let session = Arc::new(Mutex::new(uploading_session()));
        let (events, mut rx) = broadcast::channel(64);

        let task = ProgressTask::spawn(
            ProgressPhase::Upload,
            10,
            Duration::from_millis(200),
            session.clone(),
            events,
        );

        // Joining without cancelling only returns because the loop breaks
        // on completion.
        task.handle.await.unwrap();

        let guard = session.lock().await;
        assert_eq!(guard.upload_progress, 100);
        assert_eq!(guard.stage, Stage::Uploaded);
        drop(guard);

        let mut last = 0;
        while let Ok(event) = rx.try_recv() {
            if let WorkflowEvent::UploadProgress { percent, .. } = event {
                assert!(percent > last);
                last = percent;
            }
        }
        assert_eq!(last, 100);
    }
}
