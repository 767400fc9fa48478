use assess_core::model::{
    ActivityKind, ActivityRecord, DetailedResult, Difficulty, EvaluationResult, NewStoredResult,
    ProgrammingRubric, ResultId, SessionConfig, SessionKind,
};
use assess_core::time::fixed_now;
use chrono::Duration;
use storage::repository::{ActivityRepository, ResultRepository};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_activity_log_returns_most_recent_last() {
    let repo = connect("memdb_activity_log").await;
    let now = fixed_now();

    for (days_ago, kind, score) in [
        (3, ActivityKind::Assessment, 55),
        (1, ActivityKind::Quiz, 80),
        (2, ActivityKind::Other, 0),
    ] {
        let record = ActivityRecord::new(kind, "Rust", score, now - Duration::days(days_ago));
        repo.append_activity(&record).await.expect("append");
    }

    let recent = repo.list_recent_activities(10).await.expect("list");
    let kinds: Vec<_> = recent.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![ActivityKind::Assessment, ActivityKind::Other, ActivityKind::Quiz]
    );

    let limited = repo.list_recent_activities(1).await.expect("list");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].score, 80);
}

#[tokio::test]
async fn sqlite_result_store_round_trips_payload() {
    let repo = connect("memdb_result_store").await;
    let config = SessionConfig::new(SessionKind::Assessment, "Python", Difficulty::Advanced)
        .with_topic("Generators")
        .with_counts(2, 1);
    let result = EvaluationResult::new(
        50,
        "Solid start",
        vec![DetailedResult {
            question: "Write a generator".into(),
            user_answer: "def gen(): yield 1".into(),
            is_correct: true,
            explanation: "Uses yield".into(),
            correct_answer: None,
            model_solution: Some("def gen():\n    yield 1".into()),
            rubric: Some(ProgrammingRubric::new(4, 3, 4, 2, 3).unwrap()),
        }],
    );

    let id = repo
        .save_result(&NewStoredResult {
            config: config.clone(),
            result: result.clone(),
            completed_at: fixed_now(),
        })
        .await
        .expect("save");

    let stored = repo.get_result(id).await.expect("get").expect("present");
    assert_eq!(stored.config, config);
    assert_eq!(stored.result, result);
    assert_eq!(stored.completed_at, fixed_now());

    let missing = repo.get_result(ResultId::new(id.value() + 100)).await.expect("get");
    assert!(missing.is_none());
}

#[tokio::test]
async fn migrations_can_run_twice_without_losing_rows() {
    let repo = connect("memdb_migrate_twice").await;
    let record = ActivityRecord::new(ActivityKind::Quiz, "Go", 70, fixed_now());
    repo.append_activity(&record).await.expect("append");

    repo.migrate().await.expect("second migrate");

    let recent = repo.list_recent_activities(10).await.expect("list");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].language, "Go");
}
