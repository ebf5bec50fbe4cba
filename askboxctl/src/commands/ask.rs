use std::sync::Arc;

use anyhow::Context;
use askbox_core::jobs::HttpJobSystem;
use askbox_core::tasks::TaskTracker;
use askbox_types::{Mode, Phase, Snapshot};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::cli::{AskCommand, OutputFormat};
use crate::context::AppContext;
use crate::utils::formatting::{colored_by_phase, colored_by_status, format_elapsed};
use crate::utils::ui::Ui;

/// Submits `query` and follows the task until it reaches a terminal phase.
///
/// Ctrl-C tears the tracker down; the task itself keeps running on the
/// job system.
pub async fn track_query(
    context: &AppContext,
    query: &str,
    mode: Mode,
) -> anyhow::Result<Snapshot> {
    let jobs = HttpJobSystem::from_settings(context.settings())?;
    let tracker = TaskTracker::from_settings(Arc::new(jobs), context.settings());

    let mut updates = tracker.subscribe();
    if tracker.submit(query, mode).is_none() {
        anyhow::bail!("Query must not be empty");
    }

    let ui = context.ui();
    loop {
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.phase.is_terminal() {
            return Ok(snapshot);
        }
        report_progress(ui, &snapshot);

        tokio::select! {
            changed = updates.changed() => {
                changed.context("Task tracker stopped publishing updates")?;
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted while waiting for task {:?}", snapshot.task_id);
                tracker.dispose();
                anyhow::bail!("Interrupted, stopped waiting for the answer");
            }
        }
    }
}

fn report_progress(ui: &Ui, snapshot: &Snapshot) {
    if snapshot.phase != Phase::Loading {
        return;
    }
    let line = match (&snapshot.task_id, snapshot.task_status) {
        (Some(task_id), Some(status)) => format!(
            "{} (task {}, {})",
            snapshot.message,
            task_id.yellow(),
            colored_by_status(status)
        ),
        (Some(task_id), None) => format!("{} (task {})", snapshot.message, task_id.yellow()),
        _ => format!("{}...", snapshot.message),
    };
    ui.new_status_line(line);
}

/// Output of a finished `ask` in the requested format. It goes to stdout,
/// so it carries no terminal styling.
pub fn format_answer(
    snapshot: &Snapshot,
    format: OutputFormat,
    with_details: bool,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(snapshot)?);
    }

    let mut output = match format {
        OutputFormat::Text => snapshot.result_text.clone(),
        _ => snapshot.result_html.clone(),
    }
    .unwrap_or_default();

    if with_details {
        if let Some(mode) = &snapshot.resolved_mode {
            output.push_str(&format!("\n\nMode: {}", mode));
        }
        if !snapshot.detail_lines.is_empty() {
            output.push_str("\n\nDetails:");
            for line in &snapshot.detail_lines {
                output.push_str(&format!("\n  - {}", line));
            }
        }
    }

    Ok(output)
}

pub async fn ask(context: &AppContext, cmd: &AskCommand) -> anyhow::Result<()> {
    let ui = context.ui();
    let query = cmd.query();
    ui.new_status_line(format!("Asking in {} mode...", cmd.mode.yellow()));
    ui.run(async || {
        let snapshot = track_query(context, &query, cmd.mode).await?;
        if snapshot.phase == Phase::Error {
            anyhow::bail!(snapshot.message);
        }

        ui.success(format!(
            "{} after {}",
            colored_by_phase(&snapshot.message, snapshot.phase),
            format_elapsed(snapshot.elapsed_seconds)
        ));
        format_answer(&snapshot, cmd.format, cmd.details)
    })
    .await
}
