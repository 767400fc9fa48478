use std::time::Duration;

use assess_core::model::{
    Answer, Difficulty, IndexedAnswer, Question, SessionConfig, SessionKind, TestCase, UserProfile,
};
use mockito::{Matcher, Server};
use serde_json::json;
use services::{EvaluationClient, EvaluationClientConfig, EvaluationClientError, HttpEvaluationClient};

fn client_for(server: &Server) -> HttpEvaluationClient {
    let mut config = EvaluationClientConfig::new(server.url()).with_api_key("test-key");
    config.timeout = Duration::from_secs(5);
    HttpEvaluationClient::new(Some(config))
}

fn quiz_config() -> SessionConfig {
    SessionConfig::new(SessionKind::Quiz, "Python", Difficulty::Intermediate).with_counts(3, 0)
}

#[tokio::test]
async fn quiz_questions_are_posted_with_bearer_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/questions/quiz")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "language": "Python",
            "numberOfQuestions": 3
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "questions": [
                    {"type": "multiple_choice", "question": "Which keyword defines a function?", "options": ["def", "fn", "func"]},
                    {"type": "programming", "question": "Reverse a string", "starterCode": "def rev(s):\n    pass",
                     "testCases": [{"input": "abc", "expectedOutput": "cba"}, {"input": "", "expectedOutput": "", "isHidden": true}]}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let questions = client.generate_questions(&quiz_config()).await.unwrap();
    mock.assert_async().await;

    assert_eq!(questions.len(), 2);
    assert!(!questions[0].is_programming());
    let programming = questions[1].as_programming().unwrap();
    assert_eq!(programming.test_cases.len(), 2);
    assert_eq!(programming.sample_cases().count(), 1);
}

#[tokio::test]
async fn evaluation_decodes_result_and_clamps_score() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/evaluations")
        .match_body(Matcher::PartialJson(json!({
            "answers": [{"questionIndex": 0, "answer": {"type": "choice", "selected": 1}}]
        })))
        .with_status(200)
        .with_body(
            json!({
                "score": 66.7,
                "overallFeedback": "Good effort",
                "detailedResults": [
                    {"question": "Q1", "userAnswer": "fn", "isCorrect": false, "explanation": "Python uses def", "correctAnswer": "def"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let questions = vec![Question::multiple_choice("Q1", ["def", "fn"])];
    let answers = vec![IndexedAnswer {
        question_index: 0,
        answer: Answer::choice(1),
    }];
    let result = client
        .evaluate_assessment(&questions, &answers, &quiz_config())
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(result.score(), 67);
    assert_eq!(result.detailed_results.len(), 1);
    assert_eq!(result.detailed_results[0].correct_answer.as_deref(), Some("def"));
}

#[tokio::test]
async fn code_run_sends_all_test_cases() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/code/run")
        .match_body(Matcher::PartialJson(json!({
            "code": "print(input())",
            "language": "Python",
            "testCases": [
                {"input": "1", "expectedOutput": "1", "isHidden": false},
                {"input": "2", "expectedOutput": "2", "isHidden": true}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"success": true, "testResults": [{"passed": true}, {"passed": true}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let report = client
        .evaluate_code_against_test_cases(
            "print(input())",
            "Python",
            &[TestCase::sample("1", "1"), TestCase::hidden("2", "2")],
        )
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(report.passed_count(), 2);
}

#[tokio::test]
async fn non_success_status_and_empty_bodies_are_errors() {
    let mut server = Server::new_async().await;
    let _unavailable = server
        .mock("POST", "/insights")
        .with_status(503)
        .create_async()
        .await;
    let _empty = server
        .mock("POST", "/explanations")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .generate_user_progress_insights(&UserProfile::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EvaluationClientError::HttpStatus(status) if status.as_u16() == 503));

    let err = client.get_concept_explanation("What is a closure?").await.unwrap_err();
    assert!(matches!(err, EvaluationClientError::EmptyResponse));
}

#[tokio::test]
async fn blank_explanation_is_empty_and_garbage_is_decode_error() {
    let mut server = Server::new_async().await;
    let _blank = server
        .mock("POST", "/explanations")
        .with_status(200)
        .with_body(r#"{"explanation": "   "}"#)
        .create_async()
        .await;
    let _garbage = server
        .mock("POST", "/questions/assessment")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.get_concept_explanation("x").await,
        Err(EvaluationClientError::EmptyResponse)
    ));

    let config = SessionConfig::new(SessionKind::Assessment, "Rust", Difficulty::Beginner);
    assert!(matches!(
        client.generate_questions(&config).await,
        Err(EvaluationClientError::Decode(_))
    ));
}

#[tokio::test]
async fn unconfigured_client_is_disabled() {
    let client = HttpEvaluationClient::new(None);
    assert!(!client.enabled());
    assert!(matches!(
        client.get_concept_explanation("x").await,
        Err(EvaluationClientError::Disabled)
    ));
}
