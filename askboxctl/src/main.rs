mod cli;
mod commands;
mod context;
mod utils;

use anyhow::Context;
use askbox_core::settings::ClientSettings;
use clap::{CommandFactory, Parser};
use cli::print_completions;
use cli::{Cli, Commands};
use context::AppContext;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use utils::tracing_layer::UiLayer;

fn load_settings(cli: &Cli) -> anyhow::Result<ClientSettings> {
    let mut settings =
        ClientSettings::new(cli.config.as_deref()).context("Failed to load settings")?;

    if let Some(server) = &cli.server {
        settings = settings.with_server(server);
    }
    if let Some(poll_interval_ms) = cli.poll_interval_ms {
        settings = settings
            .with_poll_interval_ms(poll_interval_ms)
            .context("Invalid --poll-interval-ms")?;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings = settings.with_request_timeout_secs(timeout_secs);
    }

    Ok(settings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Completion does not need any settings
    if let Commands::Completion(cmd) = &cli.command {
        let mut cli_cmd = Cli::command();
        print_completions(cmd.shell, &mut cli_cmd);
        return Ok(());
    }

    let app_context = AppContext::new(load_settings(&cli)?);

    // Initialize tracing with our custom layer
    tracing_subscriber::registry()
        .with(UiLayer::new(app_context.ui().clone()))
        .with(EnvFilter::from_default_env())
        .init();

    info!("Running command {:?} ...", &cli.command);

    match &cli.command {
        Commands::Ask(cmd) => commands::ask::ask(&app_context, cmd).await,
        Commands::Status(cmd) => commands::status::task_status(&app_context, cmd).await,
        Commands::Render(cmd) => commands::render::render_markdown(&app_context, cmd).await,
        Commands::Completion(_) => Ok(()),
    }
}
