//! Page controllers
//!
//! Each page owns a small state machine:
//! - [`LoginController`] / [`SignupController`]: idle → submitting → success | error
//! - [`AnalysisController`]: idle → submitting → streaming → done | error
//!
//! Controllers validate locally first and only then call the [`Backend`](crate::client::Backend).
//! Failures are caught here and turned into a display string; nothing
//! propagates past this layer.

pub mod analysis;
pub mod login;
pub mod signup;

pub use analysis::{
    AnalysisController, AnalysisEvent, AnalysisPhase, AnalysisStatus, AnalysisView, SelectedFile,
    StartRejection, Submission,
};
pub use login::{LoginController, LOGIN_FAILED_MESSAGE};
pub use signup::{SignupController, REGISTRATION_FAILED_MESSAGE};

use licscan_common::FormError;

/// Credential form state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// What a credential form page renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    pub phase: FormPhase,
    /// Last submitted username, echoed back into the field
    pub username: String,
    /// Local validation message from the latest attempt
    pub validation_error: Option<String>,
    /// Generic message from the latest failed network call
    pub request_error: Option<String>,
}

impl FormView {
    /// The single message to show; local validation wins over a stale request error
    pub fn message(&self) -> Option<&str> {
        self.validation_error
            .as_deref()
            .or(self.request_error.as_deref())
    }

    /// Submit button is disabled while a request is in flight
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Gate a submission: refuse while busy, record local validation
    ///
    /// On local failure the previous request error stays in place. On local
    /// success both messages are cleared and the form moves to `Submitting`.
    pub(crate) fn begin_submit(
        &mut self,
        username: &str,
        validation: Result<(), FormError>,
    ) -> Result<(), SubmitOutcome> {
        if self.is_submitting() {
            return Err(SubmitOutcome::Busy);
        }

        self.username = username.to_string();

        if let Err(e) = validation {
            self.validation_error = Some(e.to_string());
            return Err(SubmitOutcome::Invalid(e));
        }

        self.validation_error = None;
        self.request_error = None;
        self.phase = FormPhase::Submitting;
        Ok(())
    }
}

/// Result of a credential form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Backend accepted; the page should navigate on
    Succeeded,
    /// Local validation failed; no network call was made
    Invalid(FormError),
    /// Backend call failed; the view holds the generic message
    Failed,
    /// A submission is already in flight
    Busy,
}
