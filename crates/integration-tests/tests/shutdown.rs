// Supervisor shutdown semantics

use dreambot_core::application::{SubmissionService, SubmitRequest, Supervisor};
use dreambot_core::domain::RequesterToken;
use dreambot_core::port::chat_interaction::mocks::RecordingChat;
use dreambot_core::port::clock::mocks::SteppingClock;
use dreambot_core::port::generation_client::mocks::MockGenerationClient;
use dreambot_core::port::id_provider::mocks::SequentialIdProvider;
use dreambot_core::AppError;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    supervisor: Supervisor,
    submissions: SubmissionService,
    backend: Arc<MockGenerationClient>,
    chat: Arc<RecordingChat>,
}

fn harness(backend: MockGenerationClient) -> Harness {
    let backend = Arc::new(backend);
    let chat = Arc::new(RecordingChat::new());
    let supervisor = Supervisor::start(backend.clone(), chat.clone());
    let submissions = SubmissionService::new(
        supervisor.queue(),
        chat.clone(),
        Arc::new(SequentialIdProvider::new()),
        Arc::new(SteppingClock::new(1000, 1000)),
    );
    Harness {
        supervisor,
        submissions,
        backend,
        chat,
    }
}

fn submit_req(prompt: &str, token: &str) -> SubmitRequest {
    SubmitRequest {
        prompt: prompt.to_string(),
        requester_token: RequesterToken::new(token),
    }
}

#[tokio::test]
async fn shutdown_with_an_idle_worker_is_clean() {
    let h = harness(MockGenerationClient::new_success());

    h.supervisor.shutdown().await.unwrap();
    assert_eq!(h.backend.call_count(), 0);
}

#[tokio::test]
async fn submissions_after_shutdown_fail_and_never_reach_the_backend() {
    let h = harness(MockGenerationClient::new_success());
    h.supervisor.shutdown().await.unwrap();

    let result = h.submissions.submit(submit_req("a cat", "t1")).await;
    assert!(
        matches!(result, Err(AppError::Submission(_))),
        "Submit after shutdown must fail with QueueUnavailable"
    );
    assert_eq!(
        h.backend.call_count(),
        0,
        "Generate must never be invoked for rejected submissions"
    );
    assert!(h.chat.acks().is_empty(), "No ack for a rejected submission");
}

#[tokio::test]
async fn in_flight_request_completes_and_pending_requests_are_abandoned() {
    let h = harness(MockGenerationClient::new_success().with_latency(Duration::from_millis(150)));

    h.submissions.submit(submit_req("a cat", "t1")).await.unwrap();
    h.submissions.submit(submit_req("a dog", "t2")).await.unwrap();
    h.submissions.submit(submit_req("a fox", "t3")).await.unwrap();
    assert_eq!(h.chat.acks().len(), 3);

    // Let the worker take "a cat" into flight, then shut down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.backend.call_count(), 1);

    h.supervisor.shutdown().await.unwrap();

    // The in-flight request was allowed to finish and deliver; the two
    // still-pending requests were dropped without delivery.
    let edits = h.chat.edits();
    assert_eq!(edits.len(), 1, "Only the in-flight request delivers");
    assert_eq!(edits[0].token, "t1");
    assert_eq!(
        h.backend.call_count(),
        1,
        "Pending requests must not reach the backend after shutdown"
    );
}
