//! Analysis API: file selection, submission, state snapshot

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use licscan_common::validation::MAX_FILE_SIZE_BYTES;
use licscan_common::{CandidateFile, FileRejection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::ui::render_markdown;
use crate::controllers::{AnalysisStatus, AnalysisView, StartRejection};
use crate::error::{UiError, UiResult};
use crate::{AppState, MAX_REQUEST_BODY_BYTES};

/// Multipart field carrying the manifest
pub const FILE_FIELD: &str = "requirements_file";

/// MIME type assumed when the browser sends none
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Analysis state as sent to the page
///
/// The transcript goes out rendered only; the markdown source stays here.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSnapshot {
    #[serde(flatten)]
    pub status: AnalysisStatus,
    /// Submission is disabled
    pub busy: bool,
    /// Transcript rendered from markdown
    pub transcript_html: String,
}

impl From<AnalysisView> for AnalysisSnapshot {
    fn from(view: AnalysisView) -> Self {
        Self {
            status: view.status(),
            busy: view.is_busy(),
            transcript_html: render_markdown(&view.transcript),
        }
    }
}

/// POST /api/analysis request body
#[derive(Debug, Deserialize)]
pub struct StartAnalysisRequest {
    #[serde(default)]
    pub project_name: String,
}

/// GET /api/analysis
pub async fn get_analysis(State(state): State<AppState>) -> Json<AnalysisSnapshot> {
    Json(state.analysis.snapshot().await.into())
}

/// Size to report for an upload the body limit cut short
///
/// The bytes counted are a lower bound; the declared request length, when
/// present, is closer to the real file size.
fn cut_short_size(declared_length: Option<u64>, counted: u64) -> u64 {
    counted.max(declared_length.unwrap_or(MAX_REQUEST_BODY_BYTES as u64))
}

/// POST /api/file
///
/// Multipart upload of `requirements_file`. A missing part or an empty
/// file name means the picker was cleared.
///
/// Content past [`MAX_FILE_SIZE_BYTES`] is counted, not stored. An upload
/// that runs into the request body limit is still a file selection: it is
/// rejected as too large and replaces the previous one.
pub async fn select_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> UiResult<Json<AnalysisSnapshot>> {
    let declared_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    let mut candidate = None;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                // Limit reached before the file part headers were read
                let rejection = FileRejection::TooLarge {
                    size: cut_short_size(declared_length, 0),
                    max: MAX_FILE_SIZE_BYTES,
                };
                let view = state.analysis.reject_file(rejection).await;
                return Ok(Json(view.into()));
            }
            Err(e) => return Err(UiError::BadRequest(format!("Malformed upload: {}", e))),
        };

        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Ignoring upload field");
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field
            .content_type()
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();

        let mut content = Vec::new();
        let mut size: u64 = 0;
        let mut cut_short = false;
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    size += chunk.len() as u64;
                    if size <= MAX_FILE_SIZE_BYTES {
                        content.extend_from_slice(&chunk);
                    }
                }
                Ok(None) => break,
                Err(e)
                    if size > MAX_FILE_SIZE_BYTES
                        || e.status() == StatusCode::PAYLOAD_TOO_LARGE =>
                {
                    debug!(file = %name, size, "Oversized upload cut short: {}", e);
                    size = cut_short_size(declared_length, size);
                    cut_short = true;
                    break;
                }
                Err(e) => {
                    return Err(UiError::BadRequest(format!("Upload interrupted: {}", e)));
                }
            }
        }

        if !name.is_empty() {
            candidate = Some(if size > MAX_FILE_SIZE_BYTES {
                CandidateFile::without_content(name, mime_type, size)
            } else {
                CandidateFile::new(name, mime_type, content)
            });
        }

        // The rest of the body is past the limit and cannot be read
        if cut_short {
            break;
        }
    }

    let view = state.analysis.select_file(candidate).await;
    Ok(Json(view.into()))
}

/// POST /api/analysis
///
/// Starts the report stream in the background and answers immediately with
/// the `Submitting` snapshot; progress arrives on the event stream.
pub async fn start_analysis(
    State(state): State<AppState>,
    Json(request): Json<StartAnalysisRequest>,
) -> UiResult<(StatusCode, Json<AnalysisSnapshot>)> {
    let submission = state
        .analysis
        .start(&request.project_name)
        .await
        .map_err(|rejection| match rejection {
            StartRejection::Busy => UiError::Conflict(rejection.to_string()),
            StartRejection::NoFile | StartRejection::MissingProjectName => {
                UiError::Unprocessable(rejection.to_string())
            }
        })?;

    info!(submission_id = %submission.id, "Analysis submitted");

    let snapshot = state.analysis.snapshot().await;
    let controller = state.analysis.clone();
    tokio::spawn(async move {
        controller.run(submission).await;
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::AnalysisPhase;

    #[test]
    fn test_cut_short_size_prefers_larger_estimate() {
        let limit = MAX_REQUEST_BODY_BYTES as u64;
        assert_eq!(cut_short_size(None, 0), limit);
        assert_eq!(cut_short_size(Some(limit + 500), 0), limit + 500);
        assert_eq!(cut_short_size(Some(10), limit + 1), limit + 1);
    }

    #[test]
    fn test_snapshot_serializes_flat_with_rendered_transcript() {
        let view = AnalysisView {
            phase: AnalysisPhase::Streaming,
            transcript: "## Report\n".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(AnalysisSnapshot::from(view)).unwrap();

        assert_eq!(json["phase"], "streaming");
        assert_eq!(json["busy"], true);
        assert_eq!(json["transcript_len"], 10);
        assert!(json.get("transcript").is_none());
        assert_eq!(json["transcript_html"], "<h2>Report</h2>\n");
        assert!(json["error"].is_null());
    }
}
