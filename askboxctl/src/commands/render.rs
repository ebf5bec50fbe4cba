use std::io::Read;
use std::path::Path;

use anyhow::Context;
use askbox_core::markdown;

use crate::cli::RenderCommand;
use crate::context::AppContext;

/// Reads markdown from `path`, or stdin for `None` and `-`
pub fn read_markdown(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read markdown from stdin")?;
            Ok(input)
        }
    }
}

pub async fn render_markdown(context: &AppContext, cmd: &RenderCommand) -> anyhow::Result<()> {
    let input = read_markdown(cmd.file.as_deref())?;
    context.ui().println(markdown::render(&input));
    Ok(())
}
