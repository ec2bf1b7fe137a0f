//! Drives one analysis attempt end to end.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use scribe_core::{AnalysisResult, FileInfo, MediaPayload, ScribeError, ScribeResult};
use scribe_llm::AnalysisClient;
use scribe_media::{encode_file, payload_from_encoded};
use scribe_session::{PhaseId, PhaseStatus, SessionSnapshot, SessionState};

use crate::config::OrchestratorConfig;

/// The attempt orchestrator.
///
/// Owns the session state and the per-attempt cancellation token. All state
/// mutation goes through here; everything else observes via
/// [`Orchestrator::subscribe`].
pub struct Orchestrator {
    client: Arc<dyn AnalysisClient>,
    config: OrchestratorConfig,
    // Lock order: `attempt` before `state`, everywhere.
    attempt: Mutex<CancellationToken>,
    state: Mutex<SessionState>,
    tx: watch::Sender<SessionSnapshot>,
}

impl Orchestrator {
    /// Build an orchestrator around an analysis client.
    #[must_use]
    pub fn new(client: Arc<dyn AnalysisClient>, config: OrchestratorConfig) -> Self {
        let (tx, _rx) = watch::channel(SessionState::Idle.snapshot());
        Self {
            client,
            config,
            attempt: Mutex::new(CancellationToken::new()),
            state: Mutex::new(SessionState::Idle),
            tx,
        }
    }

    /// Observe every session state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// The current session snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Run one file attempt to completion.
    ///
    /// Returns `Busy` without touching the session when an attempt is
    /// already in flight. Every other failure is recorded in the session
    /// (active phase errored, state Failed with the user-facing message)
    /// and also returned.
    pub async fn analyze_file(
        &self,
        path: &Path,
        declared_mime: Option<&str>,
    ) -> ScribeResult<AnalysisResult> {
        let cancel = {
            let mut attempt = self.attempt.lock().await;
            let mut state = self.state.lock().await;
            if state.is_busy() {
                return Err(ScribeError::Busy);
            }

            // Size validation runs before the session enters Uploading, so
            // an oversized file goes straight to Failed with every phase
            // still pending.
            let file = match file_info_for(path).await {
                Ok(file) => file,
                Err(err) => {
                    warn!(code = err.code(), "media file not readable");
                    *state = std::mem::take(&mut *state).fail(err.user_message());
                    self.publish(&state);
                    return Err(err);
                }
            };
            if file.size_bytes > self.config.max_media_bytes {
                let err = ScribeError::SizeLimit {
                    size_bytes: file.size_bytes,
                    limit_bytes: self.config.max_media_bytes,
                };
                warn!(size_bytes = file.size_bytes, "media file over the size limit");
                *state = std::mem::take(&mut *state)
                    .begin_upload(file)
                    .fail(err.user_message());
                self.publish(&state);
                return Err(err);
            }

            info!(name = %file.name, size_bytes = file.size_bytes, "starting analysis attempt");

            let token = CancellationToken::new();
            *attempt = token.clone();

            let mut next = std::mem::take(&mut *state).begin_upload(file);
            if let Some(phases) = next.phases_mut() {
                phases.set(PhaseId::Read, PhaseStatus::Active);
            }
            *state = next;
            self.publish(&state);
            token
        };

        match self.run_attempt(path, declared_mime, &cancel).await {
            Ok(result) => {
                info!("analysis attempt completed");
                Ok(result)
            }
            Err(err) => {
                warn!(code = err.code(), "analysis attempt failed");
                self.fail_with(&err).await;
                Err(err)
            }
        }
    }

    /// Run one attempt from content that is already base64 encoded (the
    /// browser submission path). The content is decoded and checked against
    /// the size limit before the session leaves its terminal state.
    pub async fn analyze_data(
        &self,
        name: &str,
        mime_type: &str,
        data: &str,
    ) -> ScribeResult<AnalysisResult> {
        let (payload, cancel) = {
            let mut attempt = self.attempt.lock().await;
            let mut state = self.state.lock().await;
            if state.is_busy() {
                return Err(ScribeError::Busy);
            }

            let payload =
                match payload_from_encoded(name, mime_type, data, self.config.max_media_bytes) {
                    Ok(payload) => payload,
                    Err(err) => {
                        let err = ScribeError::from(err);
                        warn!(code = err.code(), "inline media rejected");
                        *state = std::mem::take(&mut *state).fail(err.user_message());
                        self.publish(&state);
                        return Err(err);
                    }
                };

            info!(name = %payload.name, size_bytes = payload.size_bytes, "starting analysis attempt");

            let token = CancellationToken::new();
            *attempt = token.clone();

            let mut next = std::mem::take(&mut *state).begin_upload(payload.file_info());
            if let Some(phases) = next.phases_mut() {
                phases.set(PhaseId::Read, PhaseStatus::Active);
            }
            *state = next;
            self.publish(&state);
            (payload, token)
        };

        match self.run_call(&payload, &cancel).await {
            Ok(result) => {
                info!("analysis attempt completed");
                Ok(result)
            }
            Err(err) => {
                warn!(code = err.code(), "analysis attempt failed");
                self.fail_with(&err).await;
                Err(err)
            }
        }
    }

    /// URL ingestion: accepted at the interface, unconditionally rejected.
    /// The client is never invoked and no fetch is attempted.
    pub async fn analyze_url(&self, url: &str) -> ScribeResult<()> {
        let _attempt = self.attempt.lock().await;
        let mut state = self.state.lock().await;
        if state.is_busy() {
            return Err(ScribeError::Busy);
        }
        warn!(%url, "url submission rejected");
        *state = std::mem::take(&mut *state).fail(ScribeError::Restricted.user_message());
        self.publish(&state);
        Err(ScribeError::Restricted)
    }

    /// Cancel the attempt in flight, if any. The attempt ends Failed with
    /// the cancellation message.
    pub async fn cancel(&self) {
        self.attempt.lock().await.cancel();
    }

    /// Back to Idle. An attempt still in flight is cancelled first; its
    /// late failure is discarded rather than resurrecting the session.
    pub async fn reset(&self) {
        let attempt = self.attempt.lock().await;
        attempt.cancel();
        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reset();
        self.publish(&state);
    }

    async fn run_attempt(
        &self,
        path: &Path,
        declared_mime: Option<&str>,
        cancel: &CancellationToken,
    ) -> ScribeResult<AnalysisResult> {
        let payload = encode_file(path, declared_mime, self.config.max_media_bytes, cancel)
            .await
            .map_err(ScribeError::from)?;
        self.run_call(&payload, cancel).await
    }

    async fn run_call(
        &self,
        payload: &MediaPayload,
        cancel: &CancellationToken,
    ) -> ScribeResult<AnalysisResult> {
        self.update(|mut state| {
            if let Some(phases) = state.phases_mut() {
                phases.set(PhaseId::Read, PhaseStatus::Completed);
                phases.set(PhaseId::Upload, PhaseStatus::Active);
            }
            state.begin_transcribing()
        })
        .await;

        // The call and the upload-settle timer run together. The timer only
        // moves the timeline; the call decides the outcome.
        let call = self.client.analyze(payload, cancel);
        tokio::pin!(call);
        let settle = tokio::time::sleep(self.config.pacing.upload_settle);
        tokio::pin!(settle);
        let mut settled = false;

        let result = loop {
            tokio::select! {
                () = &mut settle, if !settled => {
                    settled = true;
                    self.update(|mut state| {
                        if let Some(phases) = state.phases_mut() {
                            phases.set(PhaseId::Upload, PhaseStatus::Completed);
                            phases.set(PhaseId::Analyze, PhaseStatus::Active);
                        }
                        state
                    })
                    .await;
                }
                result = &mut call => break result,
            }
        };
        let result = result.map_err(ScribeError::from)?;

        self.update(|mut state| {
            if let Some(phases) = state.phases_mut() {
                phases.set(PhaseId::Upload, PhaseStatus::Completed);
                phases.set(PhaseId::Analyze, PhaseStatus::Completed);
                phases.set(PhaseId::Finalize, PhaseStatus::Active);
            }
            state.begin_summarizing()
        })
        .await;

        tokio::select! {
            () = cancel.cancelled() => return Err(ScribeError::Cancelled),
            () = tokio::time::sleep(self.config.pacing.finalize_hold) => {}
        }

        self.update(|mut state| {
            if let Some(phases) = state.phases_mut() {
                phases.set(PhaseId::Finalize, PhaseStatus::Completed);
            }
            state.complete(result.clone())
        })
        .await;

        Ok(result)
    }

    async fn update(&self, f: impl FnOnce(SessionState) -> SessionState) {
        let mut state = self.state.lock().await;
        *state = f(std::mem::take(&mut *state));
        self.publish(&state);
    }

    async fn fail_with(&self, err: &ScribeError) {
        let mut state = self.state.lock().await;
        // A reset that raced the cancellation already cleared the session;
        // do not resurrect it as a failure.
        if matches!(*state, SessionState::Idle) && matches!(err, ScribeError::Cancelled) {
            return;
        }
        *state = std::mem::take(&mut *state).fail(err.user_message());
        self.publish(&state);
    }

    fn publish(&self, state: &SessionState) {
        let _ = self.tx.send_replace(state.snapshot());
    }
}

async fn file_info_for(path: &Path) -> ScribeResult<FileInfo> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ScribeError::Read {
            message: e.to_string(),
        })?;
    Ok(FileInfo {
        name: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("media")
            .to_string(),
        size_bytes: metadata.len(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
