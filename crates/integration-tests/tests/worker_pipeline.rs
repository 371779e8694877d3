// Worker pipeline: serialization, ordering and delivery semantics

use dreambot_core::application::{SubmissionService, SubmitRequest, Supervisor};
use dreambot_core::domain::RequesterToken;
use dreambot_core::port::chat_interaction::mocks::RecordingChat;
use dreambot_core::port::clock::mocks::SteppingClock;
use dreambot_core::port::generation_client::mocks::{MockBehavior, MockGenerationClient};
use dreambot_core::port::id_provider::mocks::SequentialIdProvider;
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

/// Poll until the chat mock has recorded `count` edits (the pipeline's
/// terminal events) or the deadline passes.
async fn wait_for_edits(chat: &RecordingChat, count: usize) {
    let deadline = Duration::from_secs(5);
    let poll = Duration::from_millis(10);
    let waited = tokio::time::timeout(deadline, async {
        while chat.edits().len() < count {
            tokio::time::sleep(poll).await;
        }
    })
    .await;
    assert!(
        waited.is_ok(),
        "Timed out waiting for {count} edits, saw {}",
        chat.edits().len()
    );
}

#[tokio::test]
async fn single_request_flows_from_submit_to_result_edit() {
    // Scenario: queue empty; submit "a cat" -> position 1, ack with
    // position 1, Generate("a cat"), edit with the result content.
    let h = harness(MockGenerationClient::new_success().with_latency(Duration::from_millis(30)));

    let position = h.submissions.submit(submit_req("a cat", "t1")).await.unwrap();
    assert_eq!(position, 1);

    wait_for_edits(&h.chat, 1).await;

    let acks = h.chat.acks_for("t1");
    assert_eq!(acks.len(), 1, "Expected exactly one ack");
    assert_eq!(acks[0].position, 1);

    assert_eq!(h.backend.prompts(), vec!["a cat".to_string()]);

    let edits = h.chat.edits_for("t1");
    assert_eq!(edits.len(), 1, "Expected exactly one edit");
    assert!(edits[0].content.text.contains("a cat"));
    assert!(
        !edits[0].content.images.is_empty(),
        "Success edit should carry the rendered images"
    );

    h.supervisor.shutdown().await.unwrap();
}

#[tokio::test]
async fn second_submission_waits_for_the_first_and_reports_position_two() {
    // Scenario: while "a cat" is still processing, submit "a dog" ->
    // position 2; "a dog" is not dequeued until "a cat" is terminal.
    let h = harness(MockGenerationClient::new_success().with_latency(Duration::from_millis(120)));

    let first = h.submissions.submit(submit_req("a cat", "t1")).await.unwrap();
    assert_eq!(first, 1);

    // Let the worker pick up "a cat".
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(h.backend.call_count(), 1, "\"a cat\" should be in flight");

    let second = h.submissions.submit(submit_req("a dog", "t2")).await.unwrap();
    assert_eq!(second, 2, "In-flight request still counts toward position");
    assert_eq!(
        h.backend.call_count(),
        1,
        "\"a dog\" must not be dequeued while \"a cat\" is processing"
    );

    wait_for_edits(&h.chat, 2).await;
    assert_eq!(
        h.backend.prompts(),
        vec!["a cat".to_string(), "a dog".to_string()],
        "Requests must be processed in submission order"
    );

    h.supervisor.shutdown().await.unwrap();
}

#[tokio::test]
async fn at_most_one_generate_call_is_ever_outstanding() {
    let h = harness(MockGenerationClient::new_success().with_latency(Duration::from_millis(20)));

    for i in 0..5 {
        h.submissions
            .submit(submit_req(&format!("prompt {i}"), &format!("t{i}")))
            .await
            .unwrap();
    }

    wait_for_edits(&h.chat, 5).await;
    assert_eq!(
        h.backend.max_in_flight(),
        1,
        "Generate calls must be strictly serialized"
    );

    h.supervisor.shutdown().await.unwrap();
}

#[tokio::test]
async fn every_submission_gets_one_ack_strictly_before_its_one_edit() {
    let h = harness(MockGenerationClient::new_success().with_latency(Duration::from_millis(15)));

    for i in 0..3 {
        h.submissions
            .submit(submit_req(&format!("prompt {i}"), &format!("t{i}")))
            .await
            .unwrap();
    }

    wait_for_edits(&h.chat, 3).await;

    for i in 0..3 {
        let token = format!("t{i}");
        let acks = h.chat.acks_for(&token);
        let edits = h.chat.edits_for(&token);
        assert_eq!(acks.len(), 1, "Exactly one ack for {token}");
        assert_eq!(edits.len(), 1, "Exactly one edit for {token}");
        assert!(
            acks[0].seq < edits[0].seq,
            "Ack must precede the edit for {token}"
        );
    }

    h.supervisor.shutdown().await.unwrap();
}

#[tokio::test]
async fn a_failed_generation_is_reported_and_the_loop_continues() {
    // Scenario: Generate returns an error -> the item is failed, the edit
    // carries a failure payload, and the worker moves on without delay.
    let h = harness(
        MockGenerationClient::new(MockBehavior::FailForPrompt("a bug".to_string()))
            .with_latency(Duration::from_millis(15)),
    );

    h.submissions.submit(submit_req("a bug", "t1")).await.unwrap();
    h.submissions.submit(submit_req("a cat", "t2")).await.unwrap();

    wait_for_edits(&h.chat, 2).await;

    let failed = h.chat.edits_for("t1");
    assert_eq!(failed.len(), 1);
    assert!(failed[0].content.text.contains("could not imagine"));
    assert!(failed[0].content.images.is_empty());

    let succeeded = h.chat.edits_for("t2");
    assert_eq!(succeeded.len(), 1);
    assert!(!succeeded[0].content.images.is_empty());

    h.supervisor.shutdown().await.unwrap();
}

#[tokio::test]
async fn delivery_failures_never_stall_the_worker() {
    let h = harness(MockGenerationClient::new_success().with_latency(Duration::from_millis(15)));
    h.chat.fail_deliveries(true);

    h.submissions.submit(submit_req("a cat", "t1")).await.unwrap();
    h.submissions.submit(submit_req("a dog", "t2")).await.unwrap();

    // Both edits are attempted (and fail) without halting the loop.
    wait_for_edits(&h.chat, 2).await;
    assert_eq!(h.backend.call_count(), 2);

    // A later, healthy delivery still works.
    h.chat.fail_deliveries(false);
    h.submissions.submit(submit_req("a fox", "t3")).await.unwrap();
    wait_for_edits(&h.chat, 3).await;

    h.supervisor.shutdown().await.unwrap();
}
