use askbox_types::{SubmitRequest, TaskCreated, TaskStatusResponse};
use async_trait::async_trait;
use tracing::info;

use super::JobSystem;
use crate::http::{HttpClient, HttpError};
use crate::settings::ClientSettings;

/// Joins a base url and a path without doubling or dropping slashes
pub fn normalize_url(base_url: &str, path: &str) -> String {
    let mut normalized_base = base_url.trim_end_matches('/').to_string();
    let normalized_path = path.trim_start_matches('/');

    normalized_base.push('/');
    normalized_base.push_str(normalized_path);
    normalized_base
}

/// Job system reached over HTTP.
///
/// Submissions go to `POST {prefix}/get-mode`, status queries to
/// `GET {prefix}/tasks/{task_id}`.
#[derive(Debug, Clone)]
pub struct HttpJobSystem {
    client: HttpClient,
    base_url: String,
}

impl HttpJobSystem {
    pub fn new(client: HttpClient, server: &str, api_prefix: &str) -> Self {
        let prefix = api_prefix.trim_matches('/');
        let base_url = if prefix.is_empty() {
            server.trim_end_matches('/').to_string()
        } else {
            normalize_url(server, prefix)
        };
        Self { client, base_url }
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        let client = HttpClient::with_timeout(settings.request_timeout())?;
        Ok(Self::new(client, &settings.server, &settings.api_prefix))
    }

    fn submit_url(&self) -> String {
        normalize_url(&self.base_url, "get-mode")
    }

    /// The task id is sent as a single path segment
    fn status_url(&self, task_id: &str) -> Result<String, HttpError> {
        if matches!(task_id, "" | "." | "..") {
            return Err(HttpError::InvalidRequest(format!(
                "'{}' is not a valid task id",
                task_id
            )));
        }
        Ok(normalize_url(
            &self.base_url,
            &format!("tasks/{}", urlencoding::encode(task_id)),
        ))
    }
}

#[async_trait]
impl JobSystem for HttpJobSystem {
    async fn submit(&self, request: &SubmitRequest) -> Result<TaskCreated, HttpError> {
        info!(
            "Submitting query to {} (mode: {})",
            self.base_url,
            request
                .mode
                .map(|m| m.to_string())
                .unwrap_or_else(|| "auto".to_string())
        );
        self.client.post_json(&self.submit_url(), request).await
    }

    async fn status(&self, task_id: &str) -> Result<TaskStatusResponse, HttpError> {
        let url = self.status_url(task_id)?;
        self.client.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askbox_types::{Mode, TaskStatus};
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn test_url_normalization_with_trailing_slash() {
        assert_eq!(
            normalize_url("http://answers/", "debug/get-mode"),
            "http://answers/debug/get-mode"
        );
        assert_eq!(
            normalize_url("http://answers", "/debug/get-mode"),
            "http://answers/debug/get-mode"
        );
        assert_eq!(
            normalize_url("http://answers///", "///debug/get-mode"),
            "http://answers/debug/get-mode"
        );
    }

    #[test]
    fn test_endpoint_urls() {
        let client = HttpClient::new().unwrap();
        let jobs = HttpJobSystem::new(client.clone(), "http://answers:8000/", "/debug/");
        assert_eq!(jobs.submit_url(), "http://answers:8000/debug/get-mode");
        assert_eq!(
            jobs.status_url("abc").unwrap(),
            "http://answers:8000/debug/tasks/abc"
        );

        let jobs = HttpJobSystem::new(client, "http://answers:8000/", "");
        assert_eq!(
            jobs.status_url("abc").unwrap(),
            "http://answers:8000/tasks/abc"
        );
    }

    #[test]
    fn test_task_id_stays_one_path_segment() {
        let jobs = HttpJobSystem::new(HttpClient::new().unwrap(), "http://answers", "debug");
        assert_eq!(
            jobs.status_url("a/../b?x=1#f").unwrap(),
            "http://answers/debug/tasks/a%2F..%2Fb%3Fx%3D1%23f"
        );
        assert_eq!(
            jobs.status_url("task 1").unwrap(),
            "http://answers/debug/tasks/task%201"
        );
        for task_id in ["", ".", ".."] {
            assert!(matches!(
                jobs.status_url(task_id),
                Err(HttpError::InvalidRequest(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_status_of_task_id_with_slash_hits_the_status_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/debug/tasks/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "a/b",
                "status": "pending"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let jobs = HttpJobSystem::new(HttpClient::new().unwrap(), &mock_server.uri(), "debug");
        let status = jobs.status("a/b").await.unwrap();
        assert_eq!(status.task_id, "a/b");
        assert_eq!(status.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_submit_and_status_against_mock_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/debug/get-mode"))
            .and(body_json(serde_json::json!({ "query": "capital of France?", "mode": "simple" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "task_id": "f00" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/debug/tasks/f00"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "f00",
                "status": "running",
                "details": null,
                "result": null,
                "error": null,
                "created_at": "2025-01-02T03:04:05Z"
            })))
            .mount(&mock_server)
            .await;

        let jobs = HttpJobSystem::new(HttpClient::new().unwrap(), &mock_server.uri(), "debug");
        let created = jobs
            .submit(&SubmitRequest::new("capital of France?", Mode::Simple))
            .await
            .unwrap();
        assert_eq!(created.task_id, "f00");

        let status = jobs.status(&created.task_id).await.unwrap();
        assert_eq!(status.status, TaskStatus::Running);
        assert!(status.result.is_none());
    }
}
