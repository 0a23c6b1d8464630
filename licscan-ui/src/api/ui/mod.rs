//! UI Routes - server-rendered HTML pages for licscan-ui
//!
//! Pages are plain HTML with one stylesheet; the analysis page adds a
//! vanilla ES6 script that talks to `/api/*` and listens on the event
//! stream. No frontend framework.
//!
//! - **Static Assets** (`static_assets`): CSS/JS file serving
//! - **Layout** (`layout`): shared page shell and HTML escaping
//! - **Forms** (`forms`): login and registration pages
//! - **Analysis** (`analysis`): main page
//! - **Markdown** (`markdown`): transcript rendering

use axum::{routing::get, Router};

use crate::AppState;

mod analysis;
mod forms;
mod layout;
mod markdown;
mod static_assets;

pub use analysis::render_analysis_page;
pub use forms::{render_login_page, render_register_page};
pub use layout::escape_html;
pub use markdown::render_markdown;

use static_assets::{serve_analysis_js, serve_licscan_css};

/// Build static asset routes
pub fn static_routes() -> Router<AppState> {
    Router::new()
        .route("/static/analysis.js", get(serve_analysis_js))
        .route("/static/licscan.css", get(serve_licscan_css))
}
