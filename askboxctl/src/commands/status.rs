use askbox_core::jobs::{HttpJobSystem, JobSystem};
use askbox_types::{TaskStatusResponse, ThoughtsData};
use owo_colors::OwoColorize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Style, Width},
};

use crate::cli::StatusCommand;
use crate::context::AppContext;
use crate::utils::formatting::{colored_by_status, format_created_at};

pub async fn task_status(context: &AppContext, cmd: &StatusCommand) -> anyhow::Result<()> {
    let ui = context.ui();
    ui.new_status_line(format!("Getting status of task {}...", cmd.task_id.yellow()));
    ui.run(async || {
        let jobs = HttpJobSystem::from_settings(context.settings())?;
        let response = jobs.status(&cmd.task_id).await.map_err(|e| {
            if e.is_not_found() {
                anyhow::anyhow!("Task {} is unknown to the job system", cmd.task_id.yellow())
            } else {
                e.into()
            }
        })?;

        ui.success(format!(
            "Task {} is {}",
            response.task_id.yellow(),
            colored_by_status(response.status)
        ));
        Ok(format_status(&response))
    })
    .await
}

pub fn format_status(response: &TaskStatusResponse) -> String {
    let details = response.details.clone().unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(vec!["Task", &response.task_id]);
    builder.push_record(vec!["Status", &colored_by_status(response.status)]);
    builder.push_record(vec!["Mode", details.mode.as_deref().unwrap_or("N/A")]);
    builder.push_record(vec!["Created", &format_created_at(&response.created_at)]);
    if let Some(result) = &response.result {
        builder.push_record(vec!["Result", result]);
    }
    if let Some(error) = &response.error {
        builder.push_record(vec!["Error", error]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::one(1), Width::wrap(80).keep_words(true));

    let mut output = table.to_string();
    if let Some(thoughts) = &details.thoughts_data {
        if !thoughts.attempts.is_empty() {
            output.push_str("\n\n");
            output.push_str(&format_attempts(thoughts));
        }
    }
    output
}

fn format_attempts(thoughts: &ThoughtsData) -> String {
    let mut output = String::new();
    for (i, attempt) in thoughts.attempts.iter().enumerate() {
        if i > 0 {
            output.push_str("\n\n");
        }
        let mut header = format!("Attempt {} ({})", attempt.number, attempt.status);
        if attempt.number == thoughts.current_attempt {
            header.push_str(" current");
        }
        output.push_str(&format!("{}:", header.blue().bold()));

        for step in &attempt.steps {
            output.push_str(&format!("\n  [{}] {}", step.step_type.cyan(), step.message));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use askbox_types::{TaskStatus, ThoughtAttempt, ThoughtStep, TaskDetails};

    fn step(step_type: &str, message: &str) -> ThoughtStep {
        ThoughtStep {
            step_type: step_type.into(),
            message: message.into(),
            timestamp: None,
            data: None,
        }
    }

    #[test]
    fn test_format_status_contains_fields_and_attempts() {
        let response = TaskStatusResponse {
            task_id: "abc-123".into(),
            status: TaskStatus::Failed,
            result: None,
            error: Some("model unavailable".into()),
            details: Some(TaskDetails {
                mode: Some("pro".into()),
                thoughts: None,
                thoughts_data: Some(ThoughtsData {
                    current_attempt: 2,
                    attempts: vec![
                        ThoughtAttempt {
                            number: 1,
                            status: "failed".into(),
                            steps: vec![step("start", "Starting"), step("error", "Timed out")],
                        },
                        ThoughtAttempt {
                            number: 2,
                            status: "failed".into(),
                            steps: vec![step("error", "model unavailable")],
                        },
                    ],
                }),
            }),
            created_at: None,
        };

        let output = format_status(&response);
        assert!(output.contains("abc-123"));
        assert!(output.contains("model unavailable"));
        assert!(output.contains("pro"));
        assert!(output.contains("Timed out"));
        assert!(output.contains("Attempt 1"));
        assert!(output.contains("Attempt 2"));
    }

    #[test]
    fn test_format_status_without_details() {
        let response = TaskStatusResponse {
            task_id: "t1".into(),
            status: TaskStatus::Pending,
            result: None,
            error: None,
            details: None,
            created_at: None,
        };

        let output = format_status(&response);
        assert!(output.contains("t1"));
        assert!(output.contains("N/A"));
        assert!(!output.contains("Attempt"));
    }
}
