//! Route guard
//!
//! Two states, derived from the session store on every request with no
//! caching: an unauthenticated request for a guarded view is redirected to
//! the login page immediately. The attempted path is not remembered.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::session::SessionStore;
use crate::AppState;

/// Path every unauthenticated guarded request is sent to
pub const LOGIN_PATH: &str = "/login";

/// Guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Unauthenticated,
}

/// Evaluates access against the current session
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn evaluate(&self) -> Access {
        if self.session.is_authenticated() {
            Access::Authenticated
        } else {
            Access::Unauthenticated
        }
    }
}

/// Middleware applied to guarded routes
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match RouteGuard::new(state.session.clone()).evaluate() {
        Access::Authenticated => next.run(request).await,
        Access::Unauthenticated => {
            debug!(path = %request.uri().path(), "Unauthenticated, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
