use crate::utils::ui::Ui;
use chrono::Local;
use owo_colors::OwoColorize;
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// A tracing layer that writes log events through the [`Ui`], so they do
/// not interleave with the answer printed on stdout.
pub struct UiLayer {
    ui: Arc<Ui>,
}

impl UiLayer {
    pub fn new(ui: Arc<Ui>) -> Self {
        UiLayer { ui }
    }
}

fn colorize_level(level: &Level) -> String {
    match *level {
        Level::ERROR => level.to_string().bright_red().to_string(),
        Level::WARN => level.to_string().yellow().to_string(),
        Level::INFO => level.to_string().green().to_string(),
        Level::DEBUG => level.to_string().bright_blue().to_string(),
        Level::TRACE => level.to_string().dimmed().to_string(),
    }
}

impl<S> Layer<S> for UiLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        let mut visitor = MessageVisitor(&mut message);
        event.record(&mut visitor);

        let level = event.metadata().level();
        let target = event.metadata().target();
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        // Logs always go to stderr, stdout is reserved for command output
        self.ui.eprintln(format!(
            "{} {} [{}] {}",
            timestamp.to_string().dimmed(),
            colorize_level(level),
            target.cyan(),
            message
        ));
    }
}

/// Collects the `message` field of an event
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{value:?}"));
        } else {
            self.0.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        } else {
            self.0.push_str(&format!(" {}={}", field.name(), value));
        }
    }

    fn record_error(
        &mut self,
        field: &tracing::field::Field,
        value: &(dyn std::error::Error + 'static),
    ) {
        self.0.push_str(&format!(" {}={}", field.name(), value));
    }
}
