use askbox_core::settings::ClientSettings;
use askbox_types::{Mode, Phase, TaskStatus};
use askboxctl::cli::{AskCommand, OutputFormat, StatusCommand};
use askboxctl::commands::ask::{ask, track_query};
use askboxctl::commands::status::task_status;
use askboxctl::context::AppContext;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context_for(server: &MockServer) -> AppContext {
    let settings = ClientSettings::default()
        .with_server(server.uri())
        .with_poll_interval_ms(10)
        .unwrap()
        .with_request_timeout_secs(2);
    AppContext::new(settings)
}

async fn mount_submission(server: &MockServer, task_id: &str) {
    Mock::given(method("POST"))
        .and(path("/debug/get-mode"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "task_id": task_id })),
        )
        .mount(server)
        .await;
}

/// A task that is pending once and then succeeds ends in `success`
#[tokio::test]
async fn test_track_query_follows_task_until_success() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, "task-1").await;

    Mock::given(method("GET"))
        .and(path("/debug/tasks/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "task-1",
            "status": "pending"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/debug/tasks/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "task-1",
            "status": "succeeded",
            "result": "# Answer\n\n- one\n- two",
            "details": {
                "mode": "simple",
                "thoughts": "Classifying query\n\n  Answering directly  \n"
            }
        })))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server);
    let snapshot = track_query(&context, "What is Rust?", Mode::Auto)
        .await
        .unwrap();

    assert_eq!(snapshot.phase, Phase::Success);
    assert_eq!(snapshot.task_id.as_deref(), Some("task-1"));
    assert_eq!(snapshot.task_status, Some(TaskStatus::Succeeded));
    assert_eq!(snapshot.resolved_mode.as_deref(), Some("simple"));
    assert_eq!(
        snapshot.result_html.as_deref(),
        Some("<h1>Answer</h1>\n\n<ul><li>one</li><li>two</li></ul>")
    );
    assert_eq!(
        snapshot.detail_lines,
        vec!["Classifying query".to_string(), "Answering directly".to_string()]
    );
    assert!(snapshot.elapsed_seconds.unwrap() >= 0.01);
}

/// An explicit mode is sent with the query
#[tokio::test]
async fn test_track_query_sends_explicit_mode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/debug/get-mode"))
        .and(body_json(serde_json::json!({ "query": "Explain lifetimes", "mode": "pro" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "task_id": "task-2" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/debug/tasks/task-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "task-2",
            "status": "succeeded",
            "result": "Done"
        })))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server);
    let snapshot = track_query(&context, "  Explain lifetimes ", Mode::Pro)
        .await
        .unwrap();

    assert_eq!(snapshot.phase, Phase::Success);
    assert_eq!(snapshot.result_html.as_deref(), Some("<p>Done</p>"));
}

/// A failed job ends in `error` and `ask` reports it as a failure
#[tokio::test]
async fn test_ask_fails_when_job_fails() {
    let mock_server = MockServer::start().await;
    mount_submission(&mock_server, "task-3").await;

    Mock::given(method("GET"))
        .and(path("/debug/tasks/task-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "task-3",
            "status": "failed",
            "error": "model unavailable"
        })))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server);
    let snapshot = track_query(&context, "Why?", Mode::Auto).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Error);
    assert_eq!(snapshot.task_status, Some(TaskStatus::Failed));
    assert_eq!(snapshot.message, context.settings().messages.job_failed);

    let cmd = AskCommand {
        query: vec!["Why?".to_string()],
        mode: Mode::Auto,
        format: OutputFormat::Html,
        details: false,
    };
    let result = ask(&context, &cmd).await;
    assert_eq!(
        result.unwrap_err().to_string(),
        context.settings().messages.job_failed
    );
}

/// A rejected submission ends in `error` without polling
#[tokio::test]
async fn test_track_query_submission_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/debug/get-mode"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "detail": "backend down"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server);
    let snapshot = track_query(&context, "Hello", Mode::Simple).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Error);
    assert_eq!(snapshot.message, context.settings().messages.submit_failed);
    assert_eq!(snapshot.task_id, None);
}

/// Blank queries are refused before anything is sent
#[tokio::test]
async fn test_track_query_rejects_blank_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server);
    assert!(track_query(&context, "   ", Mode::Auto).await.is_err());
}

#[tokio::test]
async fn test_status_of_unknown_task_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/debug/tasks/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "Task not found"
        })))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server);
    let cmd = StatusCommand {
        task_id: "nope".to_string(),
    };
    let error = task_status(&context, &cmd).await.unwrap_err();
    let message = error.to_string();
    assert!(message.contains("nope"));
    assert!(message.contains("unknown to the job system"));
}

#[tokio::test]
async fn test_status_server_error_keeps_server_reason() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/debug/tasks/t9"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "detail": "database offline"
        })))
        .mount(&mock_server)
        .await;

    let context = context_for(&mock_server);
    let cmd = StatusCommand {
        task_id: "t9".to_string(),
    };
    let error = task_status(&context, &cmd).await.unwrap_err();
    assert_eq!(error.to_string(), "HTTP 500: database offline");
}
