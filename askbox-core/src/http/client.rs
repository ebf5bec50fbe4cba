use super::error::HttpError;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Thin JSON client over reqwest.
///
/// Every request is attempted exactly once; failures are reported to the
/// caller as [`HttpError`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    default_timeout: Duration,
}

pub struct HttpClientBuilder {
    timeout: Option<Duration>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> anyhow::Result<HttpClient> {
        let mut client_builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(HttpClient {
            client,
            default_timeout: self.timeout.unwrap_or(Duration::from_secs(10)),
        })
    }
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    pub fn new() -> anyhow::Result<Self> {
        Self::builder().build()
    }

    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        Self::builder().with_timeout(timeout).build()
    }

    /// Turn a non-success response into an [`HttpError`], keeping the
    /// server supplied reason when there is one.
    async fn error_from_response(response: Response) -> HttpError {
        let status = response.status();

        let body = match response.text().await {
            Ok(body) => body,
            Err(_) => return HttpError::from_status(status, status.to_string()),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            // FastAPI style backends answer with `detail`, others with `message`
            let reason = json
                .get("message")
                .or_else(|| json.get("detail"))
                .and_then(|m| m.as_str());
            if let Some(reason) = reason {
                return HttpError::from_status(status, reason);
            }
        }

        if !body.is_empty() && body.len() < 500 {
            return HttpError::from_status(status, body);
        }

        HttpError::from_status(status, status.to_string())
    }

    async fn read_json<T>(response: Response) -> Result<T, HttpError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<T>(&body).map_err(|e| HttpError::ParseError(e.to_string()))
    }

    /// GET `url` and deserialize the JSON body
    pub async fn get_json<T>(&self, url: &str) -> Result<T, HttpError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!("GET request to {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.default_timeout)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// POST `body` as JSON to `url` and deserialize the JSON answer
    pub async fn post_json<T, R>(&self, url: &str, body: &T) -> Result<R, HttpError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        info!("POST request to {}", url);
        let response = self
            .client
            .post(url)
            .timeout(self.default_timeout)
            .json(body)
            .send()
            .await?;

        Self::read_json(response).await
    }
}
