use askbox_types::{Phase, TaskStatus};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

pub fn format_elapsed(elapsed_seconds: Option<f64>) -> String {
    match elapsed_seconds {
        Some(seconds) => format!("{:.2}s", seconds),
        None => "N/A".to_string(),
    }
}

pub fn format_created_at(created_at: &Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(created_at) => created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "N/A".to_string(),
    }
}

pub fn colored_by_status(status: TaskStatus) -> String {
    let name = status.to_string();
    match status {
        TaskStatus::Pending | TaskStatus::Running => name.yellow().to_string(),
        TaskStatus::Succeeded => name.green().to_string(),
        TaskStatus::Failed | TaskStatus::Error => name.bright_red().to_string(),
        TaskStatus::Unknown => name.white().to_string(),
    }
}

pub fn colored_by_phase(text: &str, phase: Phase) -> String {
    match phase {
        Phase::Idle => text.white().to_string(),
        Phase::Loading => text.yellow().to_string(),
        Phase::Success => text.green().to_string(),
        Phase::Error => text.bright_red().to_string(),
    }
}
