//! Page handlers: login, registration, logout, analysis page

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use licscan_common::validation::{LoginForm, RegistrationForm};
use tracing::warn;

use crate::api::ui::{render_analysis_page, render_login_page, render_register_page};
use crate::controllers::SubmitOutcome;
use crate::guard::LOGIN_PATH;
use crate::AppState;

/// Main view, where login lands
pub const HOME_PATH: &str = "/";

/// GET /login
pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    let view = state.login.mount().await;
    Html(render_login_page(&view))
}

/// POST /login
///
/// Success goes to the main view; anything else shows the form again with
/// its single message.
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.login.submit(form).await {
        SubmitOutcome::Succeeded => Redirect::to(HOME_PATH).into_response(),
        _ => {
            let view = state.login.view().await;
            Html(render_login_page(&view)).into_response()
        }
    }
}

/// GET /register
pub async fn register_page(State(state): State<AppState>) -> Html<String> {
    let view = state.signup.mount().await;
    Html(render_register_page(&view))
}

/// POST /register
///
/// Success goes to the login view; no session is created.
pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    match state.signup.submit(form).await {
        SubmitOutcome::Succeeded => Redirect::to(LOGIN_PATH).into_response(),
        _ => {
            let view = state.signup.view().await;
            Html(render_register_page(&view)).into_response()
        }
    }
}

/// POST /logout
pub async fn logout(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.session.logout() {
        warn!("Persisted token could not be removed: {}", e);
    }
    Redirect::to(LOGIN_PATH)
}

/// GET /
///
/// A page load is a reload: selection and transcript start empty.
pub async fn index_page(State(state): State<AppState>) -> Html<String> {
    let view = state.analysis.mount().await;
    Html(render_analysis_page(&view))
}
