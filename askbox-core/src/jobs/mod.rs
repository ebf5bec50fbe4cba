//! Access to the external job system.
//!
//! The tracker only talks to the [`JobSystem`] trait so that tests can drive
//! it with scripted responses; [`HttpJobSystem`] is the production
//! implementation.

mod remote;

pub use remote::{normalize_url, HttpJobSystem};

use askbox_types::{SubmitRequest, TaskCreated, TaskStatusResponse};
use async_trait::async_trait;

use crate::http::HttpError;

#[async_trait]
pub trait JobSystem: Send + Sync {
    /// Hand a query to the job system, returning the id of the new task
    async fn submit(&self, request: &SubmitRequest) -> Result<TaskCreated, HttpError>;

    /// Current status of a task
    async fn status(&self, task_id: &str) -> Result<TaskStatusResponse, HttpError>;
}
