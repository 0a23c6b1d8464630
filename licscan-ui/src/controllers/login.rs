//! Login page controller

use licscan_common::validation::{validate_login, LoginForm};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{FormPhase, FormView, SubmitOutcome};
use crate::client::{Backend, Credentials};
use crate::session::SessionStore;

/// Shown for every failed login, whatever the cause
pub const LOGIN_FAILED_MESSAGE: &str =
    "Login failed. Please check your username and password and try again.";

pub struct LoginController {
    backend: Arc<dyn Backend>,
    session: SessionStore,
    view: RwLock<FormView>,
}

impl LoginController {
    pub fn new(backend: Arc<dyn Backend>, session: SessionStore) -> Self {
        Self {
            backend,
            session,
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

    /// Validate, authenticate, and establish the session
    pub async fn submit(&self, form: LoginForm) -> SubmitOutcome {
        {
            let mut view = self.view.write().await;
            if let Err(outcome) = view.begin_submit(&form.username, validate_login(&form)) {
                return outcome;
            }
        }

        let credentials = Credentials::new(form.username, form.password);
        let established = match self.backend.authenticate(&credentials).await {
            Ok(token) => match self.session.login(token) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Could not persist session token: {}", e);
                    false
                }
            },
            Err(e) => {
                warn!(username = %credentials.username, "Login failed: {}", e);
                false
            }
        };

        let mut view = self.view.write().await;
        if established {
            info!(username = %credentials.username, "Logged in");
            view.phase = FormPhase::Success;
            SubmitOutcome::Succeeded
        } else {
            view.phase = FormPhase::Error;
            view.request_error = Some(LOGIN_FAILED_MESSAGE.to_string());
            SubmitOutcome::Failed
        }
    }
}
