use std::sync::atomic::Ordering;
use dioxus::prelude::ReadableExt;

use assess_core::model::{ActivityKind, ActivityRecord, Difficulty, SessionConfig, SessionKind};
use assess_core::time::fixed_now;
use chrono::Duration;
use services::{SessionEvent, SessionPhase};

use super::test_harness::{
    ViewKind, mount, sample_result, setup_view_harness, test_services,
};

async fn seed_activity(storage: &storage::repository::Storage) {
    let now = fixed_now();
    for (offset, kind, language, score) in [
        (3, ActivityKind::Quiz, "Rust", 50),
        (2, ActivityKind::Assessment, "Rust", 70),
        (1, ActivityKind::Quiz, "Go", 90),
    ] {
        storage
            .activities
            .append_activity(&ActivityRecord::new(
                kind,
                language,
                score,
                now - Duration::days(offset),
            ))
            .await
            .expect("append activity");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_config_form() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Start a session"), "missing title in {html}");
    assert!(html.contains("Programming questions"), "missing counts in {html}");
    assert!(html.contains("Topic (optional)"), "missing topic in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_renders_score_and_breakdown() {
    let (services, storage, _client) = test_services();
    let config = SessionConfig::new(SessionKind::Quiz, "Python", Difficulty::Intermediate)
        .with_counts(3, 0);
    let id = services
        .assessments()
        .persist_result(&config, &sample_result())
        .await
        .expect("persist result");

    let mut harness = mount(ViewKind::Result(id.value()), services, storage);
    harness.rebuild();
    let html = harness.drive_until("Breakdown").await;
    assert!(html.contains("67%"), "missing score in {html}");
    assert!(html.contains("2 of 3 correct"), "missing count in {html}");
    assert_eq!(html.matches("breakdown-row ").count(), 3, "{html}");
    assert!(html.contains("<strong>book</strong>"), "markdown not rendered in {html}");
    assert!(html.contains("Quiz · Python · Intermediate"), "missing heading in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_renders_not_found() {
    let mut harness = setup_view_harness(ViewKind::Result(404));
    harness.rebuild();
    let html = harness.drive_until("could not be found").await;
    assert!(html.contains("That result could not be found"), "{html}");
    assert!(!html.contains("Retry"), "not-found must not offer retry: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_smoke_lists_newest_first() {
    let (services, storage, _client) = test_services();
    seed_activity(&storage).await;

    let mut harness = mount(ViewKind::History, services, storage);
    harness.rebuild();
    let html = harness.drive_until("history-row").await;
    assert_eq!(html.matches("history-row").count(), 3, "{html}");
    let go = html.find("Go").expect("go row");
    let rust = html.find("Rust").expect("rust row");
    assert!(go < rust, "newest row should come first: {html}");
    assert!(html.contains("<polyline"), "missing trend in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn analytics_view_smoke_shows_inline_insights_error_with_retry() {
    let (services, storage, client) = test_services();
    seed_activity(&storage).await;
    client.insights_fail.store(true, Ordering::SeqCst);

    let mut harness = mount(ViewKind::Analytics, services, storage);
    harness.rebuild();
    let html = harness.drive_until("Could not generate insights").await;
    assert!(html.contains("Sessions by language"), "missing pie in {html}");
    assert!(html.contains("Rust (67%)"), "missing legend in {html}");
    assert!(
        html.contains("Could not generate insights right now. Please try again."),
        "missing inline error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn analytics_view_smoke_without_activity_prompts_for_a_session() {
    let mut harness = setup_view_harness(ViewKind::Analytics);
    harness.rebuild();
    let html = harness.drive_until("unlock insights").await;
    assert!(html.contains("Complete an assessment or quiz to unlock insights."), "{html}");
    assert!(html.contains("No data yet."), "missing empty chart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_without_config_links_home() {
    let mut harness = setup_view_harness(ViewKind::Session(None));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("No session is configured."), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_runs_a_quiz_to_completion() {
    let config =
        SessionConfig::new(SessionKind::Quiz, "Rust", Difficulty::Beginner).with_counts(2, 0);
    let mut harness = setup_view_harness(ViewKind::Session(Some(config)));
    harness.rebuild();

    let html = harness.drive_until("Question 1 of 2").await;
    assert!(html.contains("Question 1 of 2"), "{html}");
    assert!(html.contains("01:00"), "missing countdown in {html}");

    let handles = harness.session_handles.clone();
    handles.send(SessionEvent::Next);
    let html = harness.drive_until("Select an answer").await;
    assert!(html.contains("Select an answer to continue."), "{html}");

    handles.send(SessionEvent::SelectOption(1));
    handles.send(SessionEvent::Next);
    let html = harness.drive_until("Question 2 of 2").await;
    assert!(html.contains("Submit"), "{html}");

    handles.send(SessionEvent::SelectOption(1));
    handles.send(SessionEvent::Submit);
    let html = harness.drive_until("View saved result").await;
    assert!(html.contains("67%"), "missing score in {html}");

    let phase = harness
        .dom
        .in_runtime(|| handles.vm().peek().as_ref().map(|vm| vm.phase()));
    assert_eq!(phase, Some(SessionPhase::Completed));

    let recent = harness
        .storage
        .activities
        .list_recent_activities(10)
        .await
        .expect("list activity");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].kind, ActivityKind::Quiz);
    assert_eq!(recent[0].score, 67);
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_smoke_completion_trend_includes_history() {
    let (services, storage, _client) = test_services();
    seed_activity(&storage).await;
    let config =
        SessionConfig::new(SessionKind::Quiz, "Rust", Difficulty::Beginner).with_counts(2, 0);
    let mut harness = mount(ViewKind::Session(Some(config)), services, storage);
    harness.rebuild();

    harness.drive_until("Question 1 of 2").await;
    let handles = harness.session_handles.clone();
    handles.send(SessionEvent::SelectOption(0));
    handles.send(SessionEvent::Next);
    harness.drive_until("Question 2 of 2").await;
    handles.send(SessionEvent::SelectOption(1));
    handles.send(SessionEvent::Submit);
    harness.drive_until("View saved result").await;

    let html = harness.drive_until("<polyline").await;
    assert!(html.contains("<polyline"), "missing trend in {html}");
    assert!(!html.contains("No scored sessions yet."), "{html}");
}
