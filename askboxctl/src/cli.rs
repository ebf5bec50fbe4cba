use askbox_types::Mode;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "askboxctl")]
#[command(about = "Ask questions to an answering backend and follow the resulting tasks")]
#[command(version)]
pub struct Cli {
    /// Base URL of the job system, overrides the configured one
    #[arg(long, env = "ASKBOX_SERVER")]
    pub server: Option<String>,

    /// Settings file to load instead of ./askbox.{toml,yaml}
    #[arg(long, env = "ASKBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Delay between two status polls in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Timeout of a single request to the job system in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a query and wait for its answer
    #[command(name = "ask")]
    Ask(AskCommand),
    /// Show the current status of a task
    #[command(name = "status")]
    Status(StatusCommand),
    /// Render markdown from a file or stdin as HTML
    #[command(name = "render")]
    Render(RenderCommand),
    /// Generate completion scripts
    #[command(name = "completion")]
    Completion(CompletionCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Answer rendered as HTML
    #[default]
    Html,
    /// Answer as returned by the job system
    Text,
    /// Final snapshot as JSON
    Json,
}

#[derive(Debug, Parser)]
pub struct AskCommand {
    /// The question, multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Answering mode requested from the job system
    #[arg(long, value_enum, default_value_t = Mode::Auto)]
    pub mode: Mode,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Also print the thought trace of the task
    #[arg(long, default_value = "false")]
    pub details: bool,
}

impl AskCommand {
    pub fn query(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Debug, Parser)]
pub struct StatusCommand {
    /// Id of the task as returned on submission
    pub task_id: String,
}

#[derive(Debug, Parser)]
pub struct RenderCommand {
    /// Markdown file, stdin is read when omitted or `-`
    pub file: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct CompletionCommand {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn print_completions<G: clap_complete::Generator>(gen: G, cmd: &mut clap::Command) {
    clap_complete::generate(gen, cmd, cmd.get_name().to_string(), &mut std::io::stdout());
}
