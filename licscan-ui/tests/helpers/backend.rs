//! Scripted in-process backend
//!
//! Stands in for the authentication and analysis services. Report streams
//! are fed by the test through an mpsc sender, so a test decides exactly
//! when each fragment (or error) arrives.

use async_trait::async_trait;
use licscan_common::CandidateFile;
use licscan_ui::client::{Backend, Credentials, FragmentStream};
use licscan_ui::error::ClientError;
use licscan_ui::session::SessionStore;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

type FragmentSender = mpsc::UnboundedSender<Result<String, ClientError>>;
type FragmentReceiver = mpsc::UnboundedReceiver<Result<String, ClientError>>;

/// Last analysis request seen by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub project_name: String,
    pub file_name: String,
}

pub struct ScriptedBackend {
    /// Token issued on authenticate; `None` rejects every login
    token: Option<String>,
    register_ok: bool,
    /// When set, stream_analysis requires a token like the real client
    session: Option<SessionStore>,
    streams: Mutex<VecDeque<Result<FragmentReceiver, ClientError>>>,
    submissions: Mutex<Vec<RecordedSubmission>>,
    authenticate_calls: AtomicUsize,
    register_calls: AtomicUsize,
    stream_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            token: None,
            register_ok: false,
            session: None,
            streams: Mutex::new(VecDeque::new()),
            submissions: Mutex::new(Vec::new()),
            authenticate_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_registration(mut self, ok: bool) -> Self {
        self.register_ok = ok;
        self
    }

    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    /// Queue a report stream; the returned sender feeds it
    pub fn push_stream(&self) -> FragmentSender {
        let (tx, rx) = mpsc::unbounded_channel();
        self.streams.lock().unwrap().push_back(Ok(rx));
        tx
    }

    /// Queue a report stream that is already complete
    pub fn push_fragments(&self, items: Vec<Result<String, ClientError>>) {
        let tx = self.push_stream();
        for item in items {
            tx.send(item).unwrap();
        }
    }

    /// Queue a failure before any fragment
    pub fn push_failure(&self, error: ClientError) {
        self.streams.lock().unwrap().push_back(Err(error));
    }

    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<String, ClientError> {
        self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        self.token.clone().ok_or(ClientError::AuthenticationFailed)
    }

    async fn register(&self, credentials: &Credentials) -> Result<serde_json::Value, ClientError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        if self.register_ok {
            Ok(serde_json::json!({ "username": credentials.username }))
        } else {
            Err(ClientError::RegistrationFailed)
        }
    }

    async fn stream_analysis(
        &self,
        project_name: &str,
        file: &CandidateFile,
    ) -> Result<FragmentStream, ClientError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(session) = &self.session {
            if session.token().is_none() {
                return Err(ClientError::MissingSession);
            }
        }

        self.submissions.lock().unwrap().push(RecordedSubmission {
            project_name: project_name.to_string(),
            file_name: file.name.clone(),
        });

        let next = self.streams.lock().unwrap().pop_front();
        let mut rx = match next {
            Some(Ok(rx)) => rx,
            Some(Err(error)) => return Err(error),
            None => return Err(ClientError::Network("no scripted stream".to_string())),
        };

        Ok(Box::pin(async_stream::stream! {
            while let Some(item) = rx.recv().await {
                yield item;
            }
        }))
    }
}
