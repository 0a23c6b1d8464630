//! Static asset handlers for licscan-ui
//!
//! Embeds and serves CSS/JS files at compile time

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const ANALYSIS_JS: &str = include_str!("../../../ui/analysis.js");
const LICSCAN_CSS: &str = include_str!("../../../ui/licscan.css");

/// GET /static/analysis.js
///
/// Analysis page script: file upload, submission, live transcript
pub async fn serve_analysis_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        ANALYSIS_JS,
    )
        .into_response()
}

/// GET /static/licscan.css
pub async fn serve_licscan_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        LICSCAN_CSS,
    )
        .into_response()
}
