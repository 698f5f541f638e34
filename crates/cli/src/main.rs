mod cli;
mod terminal;

use std::future::Future;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use pakar_pipeline::{Pipeline, PipelineError, PipelineState};

use crate::cli::CliArgs;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    pakar_core::config::load_dotenv();

    let args = CliArgs::parse();
    let config = args.config();
    config.log_summary();

    let pipeline = Pipeline::from_config(&config).context("failed to set up the answering pipeline")?;
    let terminal = Terminal::new();

    if args.eager {
        build(&pipeline, &terminal).await?;
    }

    // One-shot mode
    if let Some(question) = args.question.as_deref() {
        return ask(&pipeline, &terminal, question, args.show_context)
            .await
            .with_context(|| format!("failed to answer '{}'", question));
    }

    terminal.print_banner(config.profile_label(), &config.corpus.docs_dir.display().to_string())?;

    loop {
        let input = match terminal.read_input()? {
            Some(text) => text,
            None => {
                terminal.print_info("Goodbye.")?;
                break;
            }
        };

        if input.is_empty() {
            continue;
        }

        if let Err(e) = ask(&pipeline, &terminal, &input, args.show_context).await {
            error!(error = %e, "query failed");
            terminal.print_error(&format!("{:#}", e))?;

            // Build failures are permanent; per-query failures are not.
            if let PipelineState::Failed(reason) = pipeline.state() {
                bail!("pipeline unavailable: {}", reason);
            }
        }
    }

    Ok(())
}

async fn build(pipeline: &Pipeline, terminal: &Terminal) -> Result<()> {
    let spinner = terminal.start_spinner("Building indices...")?;
    let result = pipeline.build().await;
    spinner.stop();

    let stats = result.context("failed to build indices")?;
    info!(chunks = stats.chunks, qa_records = stats.qa_records, "indices built");
    terminal.print_stats(&stats)?;
    Ok(())
}

async fn ask(pipeline: &Pipeline, terminal: &Terminal, question: &str, show_context: bool) -> Result<()> {
    if show_context {
        let context = with_spinner(terminal, pipeline.context(question)).await?;
        terminal.print_context(&context.render())?;
    }
    let answer = with_spinner(terminal, pipeline.answer(question)).await?;
    terminal.print_answer(&answer)?;
    Ok(())
}

async fn with_spinner<T>(
    terminal: &Terminal,
    work: impl Future<Output = Result<T, PipelineError>>,
) -> Result<T> {
    let spinner = terminal.start_spinner("Thinking...")?;
    let result = work.await;
    spinner.stop();
    Ok(result?)
}
