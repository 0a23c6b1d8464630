//! Analysis page
//!
//! Rendered once per page load; `/static/analysis.js` keeps it current
//! from the event stream afterwards.

use super::layout::{escape_html, page};
use super::markdown::render_markdown;
use crate::controllers::{AnalysisPhase, AnalysisView};
use licscan_common::validation::MAX_FILE_SIZE_BYTES;

/// Label shown next to the submit button
fn phase_label(phase: AnalysisPhase) -> &'static str {
    match phase {
        AnalysisPhase::Idle => "",
        AnalysisPhase::Submitting => "Submitting...",
        AnalysisPhase::Streaming => "Receiving report...",
        AnalysisPhase::Done => "Report complete",
        AnalysisPhase::Error => "Failed",
    }
}

/// GET /
pub fn render_analysis_page(view: &AnalysisView) -> String {
    let file_status = match (&view.file, &view.file_error) {
        (_, Some(reason)) => format!(r#"<span class="error">{}</span>"#, escape_html(reason)),
        (Some(file), None) => format!("{} ({} bytes)", escape_html(&file.name), file.size),
        (None, None) => String::new(),
    };
    let error = view
        .error
        .as_deref()
        .map(escape_html)
        .unwrap_or_default();

    let body = format!(
        r#"        <div class="toolbar">
            <form method="post" action="/logout">
                <button type="submit" class="secondary">Log out</button>
            </form>
        </div>
        <section class="card">
            <h2>Analyze dependencies</h2>
            <form id="analysis-form">
                <label for="project-name">Project name</label>
                <input id="project-name" name="project_name" type="text" value="{project_name}" required>
                <label for="requirements-file">Requirements file (.txt, max {max_kib} KiB)</label>
                <input id="requirements-file" name="requirements_file" type="file" accept=".txt,text/plain">
                <div id="file-status" class="file-status">{file_status}</div>
                <button id="analyze-button" type="submit"{disabled}>Analyze</button>
                <span id="phase" class="phase" data-phase="{phase_key}">{phase_label}</span>
            </form>
            <div id="analysis-error" class="message error"{error_hidden}>{error}</div>
        </section>
        <section class="card">
            <h2>Report</h2>
            <div id="transcript" class="transcript">{transcript}</div>
        </section>"#,
        project_name = escape_html(&view.project_name),
        max_kib = MAX_FILE_SIZE_BYTES / 1024,
        file_status = file_status,
        disabled = if view.is_busy() { " disabled" } else { "" },
        phase_key = phase_key(view.phase),
        phase_label = phase_label(view.phase),
        error_hidden = if view.error.is_some() { "" } else { " hidden" },
        error = error,
        transcript = render_markdown(&view.transcript),
    );
    page("Analysis", &body, &["/static/analysis.js"])
}

fn phase_key(phase: AnalysisPhase) -> &'static str {
    match phase {
        AnalysisPhase::Idle => "idle",
        AnalysisPhase::Submitting => "submitting",
        AnalysisPhase::Streaming => "streaming",
        AnalysisPhase::Done => "done",
        AnalysisPhase::Error => "error",
    }
}
