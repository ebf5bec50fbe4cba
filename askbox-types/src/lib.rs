/*!
 * Types shared between the askbox crates
 *
 * This crate contains the wire types of the answering job system and the
 * client-facing state snapshot, without any of the transport dependencies
 * required by askbox-core.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export core types for easier access
pub use chrono;
pub use serde;

/// Answering mode requested by the user.
///
/// `Auto` lets the job system decide and is never sent over the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Auto,
    Simple,
    Pro,
}

impl Mode {
    /// The mode to put into a submission payload, `None` for auto-detection.
    pub fn requested(self) -> Option<Mode> {
        match self {
            Mode::Auto => None,
            mode => Some(mode),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Auto => write!(f, "Auto"),
            Mode::Simple => write!(f, "Simple"),
            Mode::Pro => write!(f, "Pro"),
        }
    }
}

/// Body of a task submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
}

impl SubmitRequest {
    pub fn new(query: impl Into<String>, mode: Mode) -> Self {
        Self {
            query: query.into(),
            mode: mode.requested(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskCreated {
    pub task_id: String,
}

/// Status of a task as reported by the job system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Error,
    /// Any status this client does not know about, treated as still running
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Error
        )
    }

    pub fn is_failure(self) -> bool {
        matches!(self, TaskStatus::Failed | TaskStatus::Error)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Succeeded => write!(f, "succeeded"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Error => write!(f, "error"),
            TaskStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One recorded step of an answering attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThoughtStep {
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(default)]
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThoughtAttempt {
    pub number: u32,
    pub status: String,
    #[serde(default)]
    pub steps: Vec<ThoughtStep>,
}

/// Structured trace of the attempts the job system made for a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ThoughtsData {
    #[serde(default)]
    pub current_attempt: u32,
    #[serde(default)]
    pub attempts: Vec<ThoughtAttempt>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TaskDetails {
    pub mode: Option<String>,
    /// Free text trace, one thought per line
    pub thoughts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thoughts_data: Option<ThoughtsData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatusResponse {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<TaskDetails>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Display-facing phase of the client, distinct from [`TaskStatus`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Success | Phase::Error)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "loading"),
            Phase::Success => write!(f, "success"),
            Phase::Error => write!(f, "error"),
        }
    }
}

/// State of the task client as seen by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Snapshot {
    pub phase: Phase,
    pub message: String,
    pub task_id: Option<String>,
    pub task_status: Option<TaskStatus>,
    pub resolved_mode: Option<String>,
    pub result_text: Option<String>,
    pub result_html: Option<String>,
    pub elapsed_seconds: Option<f64>,
    pub detail_lines: Vec<String>,
}

/// Splits a multi-line trace into trimmed, non-empty lines.
pub fn detail_lines(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
