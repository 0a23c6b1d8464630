//! Registration page controller
//!
//! A successful registration does not log the user in.

use licscan_common::validation::{validate_registration, RegistrationForm};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{FormPhase, FormView, SubmitOutcome};
use crate::client::{Backend, Credentials};

/// Shown for every failed registration, whatever the cause
pub const REGISTRATION_FAILED_MESSAGE: &str =
    "Registration failed. The username may already be taken; please try again.";

pub struct SignupController {
    backend: Arc<dyn Backend>,
    view: RwLock<FormView>,
}

impl SignupController {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            view: RwLock::new(FormView::default()),
        }
    }

    /// Page load: start from a clean form
    pub async fn mount(&self) -> FormView {
        let mut view = self.view.write().await;
        if !view.is_submitting() {
            *view = FormView::default();
        }
        view.clone()
    }

    pub async fn view(&self) -> FormView {
        self.view.read().await.clone()
    }

    pub async fn submit(&self, form: RegistrationForm) -> SubmitOutcome {
        {
            let mut view = self.view.write().await;
            if let Err(outcome) = view.begin_submit(&form.username, validate_registration(&form)) {
                return outcome;
            }
        }

        let credentials = Credentials::new(form.username, form.password);
        let result = self.backend.register(&credentials).await;

        let mut view = self.view.write().await;
        match result {
            Ok(_confirmation) => {
                info!(username = %credentials.username, "Registered");
                view.phase = FormPhase::Success;
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                warn!(username = %credentials.username, "Registration failed: {}", e);
                view.phase = FormPhase::Error;
                view.request_error = Some(REGISTRATION_FAILED_MESSAGE.to_string());
                SubmitOutcome::Failed
            }
        }
    }
}
