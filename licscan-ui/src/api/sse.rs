//! Server-Sent Events for the live analysis transcript
//!
//! Events:
//! - `Snapshot`: full [`AnalysisSnapshot`]. Sent on connect, after every
//!   status change, and at most once per [`TRANSCRIPT_REFRESH`] while
//!   fragments arrive
//! - `SessionEnded`: the session was logged out; the page should go to
//!   the login view. The stream ends after it.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::analysis::AnalysisSnapshot;
use crate::controllers::{AnalysisEvent, AnalysisView};
use crate::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Fragments arriving within one interval share a single snapshot
pub const TRANSCRIPT_REFRESH: Duration = Duration::from_millis(250);

fn snapshot_event(view: AnalysisView) -> Option<Event> {
    let snapshot = AnalysisSnapshot::from(view);
    match serde_json::to_string(&snapshot) {
        Ok(json) => Some(Event::default().event("Snapshot").data(json)),
        Err(e) => {
            warn!("SSE: Failed to serialize snapshot: {}", e);
            None
        }
    }
}

/// GET /api/analysis/events
pub async fn analysis_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to analysis events");

    // Subscribe before reading the snapshot so no change falls in between
    let mut events = state.analysis.subscribe();
    let mut session = state.session.subscribe();
    let analysis = state.analysis.clone();
    let initial = analysis.snapshot().await;

    let stream = async_stream::stream! {
        if let Some(event) = snapshot_event(initial) {
            yield Ok(event);
        }

        let mut refresh = tokio::time::interval(TRANSCRIPT_REFRESH);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut pending_fragments = 0usize;

        loop {
            tokio::select! {
                received = events.recv() => match received {
                    Ok(AnalysisEvent::Fragment(_)) => {
                        pending_fragments += 1;
                    }
                    Ok(AnalysisEvent::Status(status)) => {
                        debug!(phase = ?status.phase, "SSE: Sending snapshot");
                        pending_fragments = 0;
                        if let Some(event) = snapshot_event(analysis.snapshot().await) {
                            yield Ok(event);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Snapshots are complete, so the latest one catches the client up
                        debug!(skipped, "SSE: Client lagged, resending current state");
                        pending_fragments = 0;
                        if let Some(event) = snapshot_event(analysis.snapshot().await) {
                            yield Ok(event);
                        }
                    }
                    Err(RecvError::Closed) => break,
                },

                _ = refresh.tick(), if pending_fragments > 0 => {
                    debug!(fragments = pending_fragments, "SSE: Sending transcript update");
                    pending_fragments = 0;
                    if let Some(event) = snapshot_event(analysis.snapshot().await) {
                        yield Ok(event);
                    }
                }

                changed = session.changed() => {
                    let ended = changed.is_err() || session.borrow().is_none();
                    if ended {
                        info!("SSE: Session ended, closing analysis events");
                        yield Ok(Event::default().event("SessionEnded").data("{}"));
                        break;
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(HEARTBEAT_INTERVAL)
            .text("heartbeat"),
    )
}
