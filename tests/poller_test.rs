mod common;

use std::sync::Arc;

use common::{wait_intervals, ScriptedBackend, POLL_INTERVAL};
use proof_grade_client::services::{PollEvent, StatusPoller};
use proof_grade_client::{JobId, JobPhase};

#[tokio::test]
async fn test_poller_reports_progress_then_stops_at_terminal() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .status("p", JobPhase::Queued, 0, "Queued")
            .status("p", JobPhase::Processing, 55, "Grading")
            .status("p", JobPhase::Done, 100, "Complete"),
    );
    let poller = StatusPoller::new(backend.clone(), POLL_INTERVAL);
    let mut handle = poller.spawn(JobId::new("p"));
    assert_eq!(handle.job_id().as_str(), "p");

    match handle.next_event().await {
        Some(PollEvent::Progress(status)) => assert_eq!(status.phase, JobPhase::Queued),
        other => panic!("unexpected event {:?}", other),
    }
    match handle.next_event().await {
        Some(PollEvent::Progress(status)) => {
            assert_eq!(status.progress, 55);
            assert_eq!(status.message, "Grading");
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(matches!(handle.next_event().await, Some(PollEvent::Done(_))));

    // 终态之后循环退出，通道关闭
    assert!(handle.next_event().await.is_none());
    assert_eq!(backend.poll_count("p"), 3);
}

#[tokio::test]
async fn test_poller_waits_one_interval_before_first_request() {
    let backend = Arc::new(ScriptedBackend::new());
    let poller = StatusPoller::new(backend.clone(), POLL_INTERVAL * 20);
    let handle = poller.spawn(JobId::new("idle"));

    wait_intervals(5).await;
    assert_eq!(backend.poll_count("idle"), 0);
    handle.cancel();
}

#[tokio::test]
async fn test_poller_stops_on_request_error() {
    let backend = Arc::new(ScriptedBackend::new().status_err("e", 502, "bad gateway"));
    let poller = StatusPoller::new(backend.clone(), POLL_INTERVAL);
    let mut handle = poller.spawn(JobId::new("e"));

    match handle.next_event().await {
        Some(PollEvent::Error(e)) => assert_eq!(e.status(), Some(502)),
        other => panic!("unexpected event {:?}", other),
    }
    assert!(handle.next_event().await.is_none());

    wait_intervals(5).await;
    assert_eq!(backend.poll_count("e"), 1);
}

#[tokio::test]
async fn test_cancel_stops_requests() {
    let backend = Arc::new(ScriptedBackend::new());
    let poller = StatusPoller::new(backend.clone(), POLL_INTERVAL);
    let mut handle = poller.spawn(JobId::new("c"));

    assert!(matches!(handle.next_event().await, Some(PollEvent::Progress(_))));
    handle.cancel();

    let polls = backend.poll_count("c");
    wait_intervals(10).await;
    assert_eq!(backend.poll_count("c"), polls);
}
