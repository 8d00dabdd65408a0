//! Presence rotator integration tests
//! Run with: cargo test --test presence_test

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use krypton_bot::application::context::BotContext;
use krypton_bot::application::services::presence::DEFAULT_STATUSES;
use krypton_bot::application::services::PresenceRotator;

const TICK: Duration = Duration::from_millis(20);

async fn wait_for_activity(session: &RecordingSession) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while session.activities().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("no status update after ready");
}

#[tokio::test]
async fn test_no_status_before_ready() {
    ensure_init();
    let context = BotContext::new("!");
    let session = RecordingSession::new();
    let task = PresenceRotator::new()
        .with_interval(TICK)
        .spawn(Arc::new(session.clone()), &context);

    tokio::time::sleep(TICK * 5).await;
    assert!(session.activities().is_empty());

    session.note("ready");
    context.mark_ready(bot_user());
    wait_for_activity(&session).await;

    let sent = session.sent();
    assert_eq!(sent.first(), Some(&Sent::Note("ready")));
    for status in session.activities() {
        assert!(DEFAULT_STATUSES.contains(&status.as_str()), "unexpected status {}", status);
    }

    context.request_shutdown();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("rotator did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_keeps_rotating() {
    let context = BotContext::new("!");
    context.mark_ready(bot_user());
    let session = RecordingSession::new();
    let task = PresenceRotator::new()
        .with_interval(TICK)
        .with_statuses(vec!["with tests!".to_string()])
        .spawn(Arc::new(session.clone()), &context);

    tokio::time::timeout(Duration::from_secs(2), async {
        while session.activities().len() < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("rotator stalled");
    assert!(session.activities().iter().all(|s| s == "with tests!"));

    context.request_shutdown();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("rotator did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_shutdown_before_ready_stops_quietly() {
    let context = BotContext::new("!");
    let session = RecordingSession::new();
    let task = PresenceRotator::new()
        .with_interval(TICK)
        .spawn(Arc::new(session.clone()), &context);

    context.request_shutdown();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("rotator did not stop")
        .unwrap();
    assert!(session.activities().is_empty());
}
