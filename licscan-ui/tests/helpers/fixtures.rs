//! Test fixtures

use licscan_common::CandidateFile;
use licscan_ui::controllers::{AnalysisEvent, AnalysisStatus};
use std::time::Duration;
use tokio::sync::broadcast;

/// Valid manifest with the given name
pub fn requirements_file(name: &str) -> CandidateFile {
    CandidateFile::new(name, "text/plain", b"flask==3.0.0\nrequests==2.31.0\n".to_vec())
}

/// Receive events until one matches, failing after five seconds
pub async fn wait_for<F>(rx: &mut broadcast::Receiver<AnalysisEvent>, predicate: F) -> AnalysisEvent
where
    F: Fn(&AnalysisEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("analysis events closed");
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for analysis event")
}

/// Receive events until a status matches
pub async fn wait_for_status<F>(
    rx: &mut broadcast::Receiver<AnalysisEvent>,
    predicate: F,
) -> AnalysisStatus
where
    F: Fn(&AnalysisStatus) -> bool,
{
    let event = wait_for(rx, |event| {
        matches!(event, AnalysisEvent::Status(status) if predicate(status))
    })
    .await;
    match event {
        AnalysisEvent::Status(status) => status,
        other => panic!("expected a status, got {:?}", other),
    }
}
