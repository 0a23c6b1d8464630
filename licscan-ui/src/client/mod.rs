//! Backend client
//!
//! Thin request/response mapping to the two external services:
//! - Authentication service: `POST /users/token`, `POST /users`
//! - Analysis service: `POST /generate/report` (streamed text/plain body)
//!
//! Controllers depend on the [`Backend`] trait, not on [`HttpBackend`], so
//! they can be exercised without a network.

pub mod decoder;

use async_trait::async_trait;
use futures::stream::Stream;
use licscan_common::CandidateFile;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::session::SessionStore;

pub use decoder::{text_fragments, Utf8ChunkDecoder};

const USER_AGENT: &str = concat!("licscan-ui/", env!("CARGO_PKG_VERSION"));

/// Lazy, finite, non-restartable sequence of report text fragments
///
/// Items arrive in receipt order; the next read is only issued when the
/// consumer polls again.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>;

/// Username/password pair sent to the authentication service
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /users/token` response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Base URLs of the external services
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub auth_url: String,
    pub analysis_url: String,
}

impl ServiceEndpoints {
    pub fn new(auth_url: impl Into<String>, analysis_url: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into(),
            analysis_url: analysis_url.into(),
        }
    }

    fn token_url(&self) -> String {
        format!("{}/users/token", self.auth_url.trim_end_matches('/'))
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.auth_url.trim_end_matches('/'))
    }

    fn report_url(&self) -> String {
        format!("{}/generate/report", self.analysis_url.trim_end_matches('/'))
    }
}

/// Operations the page controllers need from the outside world
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn authenticate(&self, credentials: &Credentials) -> Result<String, ClientError>;

    /// Create a user; returns the service's confirmation payload
    async fn register(&self, credentials: &Credentials) -> Result<serde_json::Value, ClientError>;

    /// Submit a manifest for analysis and stream the report back
    ///
    /// Fails with [`ClientError::MissingSession`] without any request when
    /// no session token is held.
    async fn stream_analysis(
        &self,
        project_name: &str,
        file: &CandidateFile,
    ) -> Result<FragmentStream, ClientError>;
}

/// reqwest implementation of [`Backend`]
///
/// No request timeout is configured: long reports stream for as long as the
/// analysis service keeps the connection open.
pub struct HttpBackend {
    http_client: reqwest::Client,
    endpoints: ServiceEndpoints,
    session: SessionStore,
}

impl HttpBackend {
    pub fn new(endpoints: ServiceEndpoints, session: SessionStore) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoints,
            session,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn authenticate(&self, credentials: &Credentials) -> Result<String, ClientError> {
        let params = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        debug!(username = %credentials.username, "Requesting access token");

        let response = self
            .http_client
            .post(self.endpoints.token_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Token request rejected");
            return Err(ClientError::AuthenticationFailed);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        info!(username = %credentials.username, "Access token issued");
        Ok(token.access_token)
    }

    async fn register(&self, credentials: &Credentials) -> Result<serde_json::Value, ClientError> {
        debug!(username = %credentials.username, "Creating user");

        let response = self
            .http_client
            .post(self.endpoints.users_url())
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "User creation rejected");
            return Err(ClientError::RegistrationFailed);
        }

        let confirmation = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        info!(username = %credentials.username, "User created");
        Ok(confirmation)
    }

    async fn stream_analysis(
        &self,
        project_name: &str,
        file: &CandidateFile,
    ) -> Result<FragmentStream, ClientError> {
        let token = self.session.token().ok_or(ClientError::MissingSession)?;

        let part = Part::bytes(file.content.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let form = Form::new()
            .text("project_name", project_name.to_string())
            .part("requirements_file", part);

        info!(
            project = %project_name,
            file = %file.name,
            size = file.size,
            "Requesting analysis report"
        );

        let response = self
            .http_client
            .post(self.endpoints.report_url())
            .bearer_auth(token)
            .header(ACCEPT, "text/plain")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message = if message.trim().is_empty() {
                format!("Analysis request failed with status {}", status)
            } else {
                message
            };
            warn!(status = status.as_u16(), "Analysis request rejected");
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        debug!(
            content_type = ?response.headers().get(CONTENT_TYPE),
            "Analysis report stream opened"
        );
        Ok(text_fragments(response.bytes_stream()))
    }
}
