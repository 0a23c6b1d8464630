//! licscan-ui library - web UI for dependency-license analysis
//!
//! Local single-user service: log in against the authentication service,
//! pick a `requirements.txt`, and watch the analysis report stream in.

use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod client;
pub mod config;
pub mod controllers;
pub mod error;
pub mod guard;
pub mod session;

use client::Backend;
use controllers::{AnalysisController, LoginController, SignupController};
use session::SessionStore;

/// Upper bound on request bodies; uploads past the 1 MiB file limit still
/// reach the validator so the user sees the size reason.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub login: Arc<LoginController>,
    pub signup: Arc<SignupController>,
    pub analysis: Arc<AnalysisController>,
}

impl AppState {
    /// Wire the page controllers to one backend and one session
    pub fn new(session: SessionStore, backend: Arc<dyn Backend>) -> Self {
        Self {
            login: Arc::new(LoginController::new(backend.clone(), session.clone())),
            signup: Arc::new(SignupController::new(backend.clone())),
            analysis: Arc::new(AnalysisController::new(backend)),
            session,
        }
    }
}

/// Build application router
///
/// `/` and `/api/*` (except build info) require a session; everything
/// else is public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require a session)
    let protected = Router::new()
        .route("/", get(api::index_page))
        .route("/api/file", post(api::select_file))
        .route(
            "/api/analysis",
            get(api::get_analysis).post(api::start_analysis),
        )
        .route("/api/analysis/events", get(api::analysis_events))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_session,
        ));

    // Public routes
    let public = Router::new()
        .route("/login", get(api::login_page).post(api::login_submit))
        .route(
            "/register",
            get(api::register_page).post(api::register_submit),
        )
        .route("/logout", post(api::logout))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .merge(api::static_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
