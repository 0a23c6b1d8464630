//! Analysis page controller
//!
//! Owns the selected manifest, the transcript, and the page phase:
//!
//! ```text
//! Idle ──start──► Submitting ──first fragment──► Streaming ──end──► Done
//!                      │                              │
//!                      └──────────── error ───────────┴──────────► Error
//! ```
//!
//! Selecting a file, starting a new analysis, or reloading the page resets
//! the transcript. A reset bumps the generation counter; an in-flight
//! submission from an older generation is no longer consumed and never
//! touches the new transcript.
//!
//! Subscribers get [`AnalysisEvent`]s: a status for every change other than
//! transcript growth, and each fragment on its own. No event carries the
//! whole transcript.

use futures::StreamExt;
use licscan_common::validation::validate_file;
use licscan_common::{CandidateFile, FileRejection};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::Backend;
use crate::error::ClientError;

/// Buffered events per subscriber before it starts lagging
const EVENT_CAPACITY: usize = 256;

/// Analysis page state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisPhase {
    #[default]
    Idle,
    /// Request sent, no fragment yet
    Submitting,
    /// At least one fragment received
    Streaming,
    Done,
    Error,
}

impl AnalysisPhase {
    /// A request is in flight
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Submitting | Self::Streaming)
    }
}

/// Accepted file as shown on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
}

/// What the analysis page renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisView {
    pub phase: AnalysisPhase,
    pub project_name: String,
    /// Accumulated report text, in arrival order
    pub transcript: String,
    /// Request, stream, or local submission error (shown verbatim)
    pub error: Option<String>,
    pub file: Option<SelectedFile>,
    /// Why the last selected file was rejected
    pub file_error: Option<String>,
}

impl AnalysisView {
    /// Submission is disabled while a request is in flight
    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn status(&self) -> AnalysisStatus {
        AnalysisStatus {
            phase: self.phase,
            project_name: self.project_name.clone(),
            transcript_len: self.transcript.len(),
            error: self.error.clone(),
            file: self.file.clone(),
            file_error: self.file_error.clone(),
        }
    }
}

/// Everything in [`AnalysisView`] except the transcript text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStatus {
    pub phase: AnalysisPhase,
    pub project_name: String,
    /// Transcript length in bytes; zero after a reset
    pub transcript_len: usize,
    pub error: Option<String>,
    pub file: Option<SelectedFile>,
    pub file_error: Option<String>,
}

/// Published after every state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    /// Phase, selection, errors, or a transcript reset
    Status(AnalysisStatus),
    /// Text appended to the transcript
    Fragment(String),
}

/// Why a submission was not started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartRejection {
    #[error("An analysis is already running.")]
    Busy,

    #[error("Please select a requirements file first.")]
    NoFile,

    #[error("Please enter a project name.")]
    MissingProjectName,
}

/// A started submission, consumed by [`AnalysisController::run`]
#[derive(Debug)]
pub struct Submission {
    pub id: Uuid,
    generation: u64,
    project_name: String,
    file: CandidateFile,
}

struct AnalysisState {
    view: AnalysisView,
    selection: Option<CandidateFile>,
    generation: u64,
}

pub struct AnalysisController {
    backend: Arc<dyn Backend>,
    state: RwLock<AnalysisState>,
    events: broadcast::Sender<AnalysisEvent>,
}

impl AnalysisController {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            state: RwLock::new(AnalysisState {
                view: AnalysisView::default(),
                selection: None,
                generation: 0,
            }),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> AnalysisView {
        self.state.read().await.view.clone()
    }

    /// Page reload: drop selection, transcript, and errors
    pub async fn mount(&self) -> AnalysisView {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.selection = None;
        state.view = AnalysisView::default();
        self.publish(&state.view);
        state.view.clone()
    }

    /// Apply a new file selection
    ///
    /// Transcript, error, and phase are reset first, whatever the prior
    /// state; then the validation outcome is applied. `None` means the user
    /// cleared the picker.
    pub async fn select_file(&self, candidate: Option<CandidateFile>) -> AnalysisView {
        let outcome = candidate.map(|file| match validate_file(&file) {
            Ok(()) => Ok(file),
            Err(rejection) => {
                info!(file = %file.name, "File rejected: {}", rejection);
                Err(rejection)
            }
        });
        self.apply_selection(outcome).await
    }

    /// Reject a selection that could not be read, with the same reset as
    /// [`select_file`](Self::select_file)
    pub async fn reject_file(&self, rejection: FileRejection) -> AnalysisView {
        info!("Unreadable file rejected: {}", rejection);
        self.apply_selection(Some(Err(rejection))).await
    }

    async fn apply_selection(
        &self,
        outcome: Option<Result<CandidateFile, FileRejection>>,
    ) -> AnalysisView {
        let mut state = self.state.write().await;

        state.generation += 1;
        state.view.transcript.clear();
        state.view.error = None;
        state.view.file_error = None;
        state.view.phase = AnalysisPhase::Idle;
        self.publish(&state.view);

        match outcome {
            Some(Ok(file)) => {
                info!(file = %file.name, size = file.size, "File accepted");
                state.view.file = Some(SelectedFile {
                    name: file.name.clone(),
                    size: file.size,
                });
                state.selection = Some(file);
            }
            Some(Err(rejection)) => {
                state.view.file = None;
                state.view.file_error = Some(rejection.to_string());
                state.selection = None;
            }
            None => {
                state.view.file = None;
                state.selection = None;
            }
        }

        self.publish(&state.view);
        state.view.clone()
    }

    /// Begin a submission
    ///
    /// Local checks run first and never reach the network. On success the
    /// transcript is reset and the page enters `Submitting`.
    pub async fn start(&self, project_name: &str) -> Result<Submission, StartRejection> {
        let mut state = self.state.write().await;

        if state.view.is_busy() {
            return Err(StartRejection::Busy);
        }

        let project_name = project_name.trim().to_string();
        state.view.project_name = project_name.clone();

        let rejection = match &state.selection {
            None => Some(StartRejection::NoFile),
            Some(_) if project_name.is_empty() => Some(StartRejection::MissingProjectName),
            Some(_) => None,
        };
        if let Some(rejection) = rejection {
            state.view.phase = AnalysisPhase::Error;
            state.view.error = Some(rejection.to_string());
            self.publish(&state.view);
            return Err(rejection);
        }

        let file = match state.selection.clone() {
            Some(file) => file,
            None => return Err(StartRejection::NoFile),
        };

        state.generation += 1;
        state.view.transcript.clear();
        state.view.error = None;
        state.view.phase = AnalysisPhase::Submitting;
        self.publish(&state.view);

        Ok(Submission {
            id: Uuid::new_v4(),
            generation: state.generation,
            project_name,
            file,
        })
    }

    /// Consume the report stream for a submission until it ends or fails
    ///
    /// Fragments already appended are kept when the stream fails.
    pub async fn run(&self, submission: Submission) -> AnalysisView {
        let Submission {
            id,
            generation,
            project_name,
            file,
        } = submission;

        info!(submission_id = %id, project = %project_name, file = %file.name, "Analysis started");

        let mut stream = match self.backend.stream_analysis(&project_name, &file).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(submission_id = %id, "Analysis request failed: {}", e);
                self.fail(generation, &e).await;
                return self.snapshot().await;
            }
        };

        let mut fragments = 0usize;
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    fragments += 1;
                    debug!(submission_id = %id, bytes = fragment.len(), "Fragment received");
                    if !self.append(generation, fragment).await {
                        info!(submission_id = %id, fragments, "Submission superseded, stream dropped");
                        return self.snapshot().await;
                    }
                }
                Err(e) => {
                    warn!(submission_id = %id, fragments, "Analysis stream failed: {}", e);
                    self.fail(generation, &e).await;
                    return self.snapshot().await;
                }
            }
        }

        info!(submission_id = %id, fragments, "Analysis complete");
        self.apply(generation, |view| view.phase = AnalysisPhase::Done)
            .await;
        self.snapshot().await
    }

    /// Start and run to completion
    pub async fn submit(&self, project_name: &str) -> Result<AnalysisView, StartRejection> {
        let submission = self.start(project_name).await?;
        Ok(self.run(submission).await)
    }

    async fn fail(&self, generation: u64, error: &ClientError) {
        let message = error.to_string();
        self.apply(generation, move |view| {
            view.phase = AnalysisPhase::Error;
            view.error = Some(message);
        })
        .await;
    }

    /// Append a fragment if `generation` is still current; false when superseded
    ///
    /// The fragment is published before the status, so a subscriber folding
    /// events sees the text before the phase that announces it.
    async fn append(&self, generation: u64, fragment: String) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        state.view.transcript.push_str(&fragment);
        let _ = self.events.send(AnalysisEvent::Fragment(fragment));
        if state.view.phase != AnalysisPhase::Streaming {
            state.view.phase = AnalysisPhase::Streaming;
            self.publish(&state.view);
        }
        true
    }

    /// Mutate the view if `generation` is still current; false when superseded
    async fn apply<F>(&self, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut AnalysisView),
    {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        update(&mut state.view);
        self.publish(&state.view);
        true
    }

    fn publish(&self, view: &AnalysisView) {
        // No subscribers is fine: nobody has the page open
        let _ = self.events.send(AnalysisEvent::Status(view.status()));
    }
}
